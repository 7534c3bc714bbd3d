//! Instance repository: creates required components exactly once.
//!
//! A [`Repository`] owns one [`Factory`] per component kind and the live
//! instances built from them. Requiring a set of requirements resolves it
//! into a [`Plan`](crate::resolver::Plan) and creates every instance that
//! does not exist yet, dependencies first.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rigging_common::config::FrameworkConfig;
use rigging_common::constants::NIL_LABEL;
use rigging_common::error::{Result, RiggingError};
use rigging_common::types::{ComponentId, EnvironmentKind, InstanceId, InstanceKey, Scope};
use rigging_component::configuration::{Configuration, downcast_config};
use rigging_component::identity::Identity;
use rigging_component::requirement::Requirement;
use serde::{Deserialize, Serialize};

use crate::resolver::{PlannedInstance, Resolver};

/// A type-erased live component.
#[derive(Debug, Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// Wraps a concrete component value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Concrete type name of the component.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the component as `T`, if that is its type.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }
}

/// Builds instances of one component kind.
pub trait Factory: Send + Sync {
    /// Component kind this factory builds.
    fn component_id(&self) -> ComponentId;

    /// Whether the component can run in `environment`.
    fn supports(&self, _environment: EnvironmentKind) -> bool {
        true
    }

    /// Creates one instance. Dependencies are already available through `ctx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has the wrong shape or the
    /// component cannot be built.
    fn create(&self, ctx: &CreateContext<'_>) -> Result<Instance>;
}

/// What a factory sees while creating an instance.
pub struct CreateContext<'a> {
    planned: &'a PlannedInstance,
    environment: EnvironmentKind,
    repository: &'a Repository,
}

impl<'a> CreateContext<'a> {
    /// Key of the instance being created.
    #[must_use]
    pub const fn key(&self) -> &'a InstanceKey {
        &self.planned.key
    }

    /// Instance name, empty when unnamed.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.planned.key.name
    }

    /// Identity the instance was requested through.
    #[must_use]
    pub const fn identity(&self) -> &'a Arc<dyn Identity> {
        &self.planned.identity
    }

    /// Environment the framework is configured for.
    #[must_use]
    pub const fn environment(&self) -> EnvironmentKind {
        self.environment
    }

    /// Effective configuration without type checking.
    #[must_use]
    pub fn raw_config(&self) -> Option<&'a dyn Configuration> {
        self.planned.config()
    }

    /// Effective configuration as `C`, or `None` if none was supplied.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::ConfigMismatch`] if a configuration of another
    /// type was supplied.
    pub fn config<C: Configuration>(&self) -> Result<Option<&'a C>> {
        let Some(config) = self.raw_config() else {
            return Ok(None);
        };
        downcast_config::<C>(config)
            .map(Some)
            .ok_or_else(|| RiggingError::ConfigMismatch {
                component: self.planned.key.to_string(),
                expected: std::any::type_name::<C>(),
                actual: config.type_name(),
            })
    }

    /// Like [`config`](Self::config), but a missing configuration is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration was supplied or it has another type.
    pub fn required_config<C: Configuration>(&self) -> Result<&'a C> {
        self.config::<C>()?.ok_or_else(|| RiggingError::Factory {
            component: self.planned.key.to_string(),
            message: format!("missing configuration of type {}", std::any::type_name::<C>()),
        })
    }

    /// Fetches an instance created earlier, typically a declared dependency.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance does not exist or has another type.
    pub fn dependency<T: Any + Send + Sync>(&self, req: &Requirement) -> Result<Arc<T>> {
        self.repository.get::<T>(req)
    }
}

/// Serializable summary of a live instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Unique id of the instance.
    pub id: InstanceId,
    /// Deduplication key.
    pub key: InstanceKey,
    /// Lifecycle scope.
    pub scope: Scope,
    /// Concrete component type.
    pub type_name: String,
    /// Label of the configuration the instance was built with.
    pub config: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

struct Entry {
    instance: Instance,
    record: InstanceRecord,
}

/// Registry of factories and live component instances.
pub struct Repository {
    config: FrameworkConfig,
    factories: HashMap<ComponentId, Arc<dyn Factory>>,
    instances: HashMap<InstanceKey, Entry>,
    order: Vec<InstanceKey>,
}

impl Repository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new(config: FrameworkConfig) -> Self {
        Self {
            config,
            factories: HashMap::new(),
            instances: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Framework configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    /// Registers a factory, replacing any previous one for the same kind.
    pub fn register(&mut self, factory: impl Factory + 'static) {
        let id = factory.component_id();
        if self
            .factories
            .insert(id.clone(), Arc::new(factory))
            .is_some()
        {
            tracing::warn!(component = %id, "replaced existing factory");
        }
    }

    /// Creates every instance `requirements` need that does not exist yet.
    ///
    /// Existing instances are reused; requiring one at [`Scope::Suite`] that
    /// was created at [`Scope::Test`] promotes it.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails, a factory is missing or does not
    /// support the environment, an existing instance was built with a
    /// different configuration, or a factory fails.
    pub fn require(&mut self, scope: Scope, requirements: &[Requirement]) -> Result<()> {
        let plan = Resolver::new(&self.config).resolve(requirements)?;

        for planned in plan.instances() {
            match self.instances.get(&planned.key) {
                Some(entry) => self.check_existing(entry, planned)?,
                None => {
                    let _ = self.factory_for(planned)?;
                }
            }
        }

        for planned in plan.instances() {
            if let Some(entry) = self.instances.get_mut(&planned.key) {
                if entry.record.scope != scope && scope.outlives(entry.record.scope) {
                    tracing::debug!(instance = %planned.key, %scope, "promoting instance");
                    entry.record.scope = scope;
                }
                continue;
            }
            self.create(scope, planned)?;
        }

        tracing::info!(
            %scope,
            required = requirements.len(),
            live = self.order.len(),
            "requirements satisfied"
        );
        Ok(())
    }

    /// Like [`require`](Self::require), but returns `Ok(false)` instead of
    /// failing when a component does not support the environment.
    ///
    /// # Errors
    ///
    /// Returns any error other than [`RiggingError::Unsupported`].
    pub fn require_or_skip(&mut self, scope: Scope, requirements: &[Requirement]) -> Result<bool> {
        match self.require(scope, requirements) {
            Ok(()) => Ok(true),
            Err(RiggingError::Unsupported {
                component,
                environment,
            }) => {
                tracing::info!(%component, %environment, "skipping: unsupported environment");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches the instance satisfying `req` as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::NotFound`] if the instance was never required,
    /// or [`RiggingError::KindMismatch`] if it is not a `T`.
    pub fn get<T: Any + Send + Sync>(&self, req: &Requirement) -> Result<Arc<T>> {
        let key = req.instance_key();
        let entry = self
            .instances
            .get(&key)
            .ok_or_else(|| RiggingError::NotFound {
                kind: "instance",
                id: key.to_string(),
            })?;
        entry
            .instance
            .downcast::<T>()
            .ok_or_else(|| RiggingError::KindMismatch {
                requirement: req.to_string(),
                expected: std::any::type_name::<T>(),
                actual: entry.instance.type_name(),
            })
    }

    /// Returns `true` if an instance satisfying `req` exists.
    #[must_use]
    pub fn contains(&self, req: &Requirement) -> bool {
        self.instances.contains_key(&req.instance_key())
    }

    /// Drops every instance at `scope`, most recent first. Returns how many were dropped.
    pub fn end_scope(&mut self, scope: Scope) -> usize {
        let (dropped, kept): (Vec<InstanceKey>, Vec<InstanceKey>) = self
            .order
            .drain(..)
            .partition(|key| {
                self.instances
                    .get(key)
                    .is_some_and(|entry| entry.record.scope == scope)
            });
        self.order = kept;

        for key in dropped.iter().rev() {
            if self.instances.remove(key).is_some() {
                tracing::debug!(instance = %key, %scope, "dropped instance");
            }
        }
        dropped.len()
    }

    /// Records of live instances in creation order.
    #[must_use]
    pub fn records(&self) -> Vec<InstanceRecord> {
        self.order
            .iter()
            .filter_map(|key| self.instances.get(key))
            .map(|entry| entry.record.clone())
            .collect()
    }

    fn factory_for(&self, planned: &PlannedInstance) -> Result<Arc<dyn Factory>> {
        let id = &planned.key.component.id;
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| RiggingError::NotFound {
                kind: "factory",
                id: id.to_string(),
            })?;
        if !factory.supports(self.config.environment) {
            return Err(RiggingError::Unsupported {
                component: id.to_string(),
                environment: self.config.environment.to_string(),
            });
        }
        Ok(Arc::clone(factory))
    }

    /// A live instance cannot be reconfigured: an explicit configuration
    /// must match the one it was built with. Identity defaults never compete.
    fn check_existing(&self, entry: &Entry, planned: &PlannedInstance) -> Result<()> {
        if !planned.explicit_config {
            return Ok(());
        }
        let Some(requested) = planned.config().map(ToString::to_string) else {
            return Ok(());
        };
        let existing = entry.record.config.as_deref().unwrap_or(NIL_LABEL);
        if existing == requested {
            return Ok(());
        }
        if self.config.strict_config {
            return Err(RiggingError::ConflictingConfig {
                instance: planned.key.to_string(),
                existing: existing.to_string(),
                requested,
            });
        }
        tracing::warn!(
            instance = %planned.key,
            kept = %existing,
            ignored = %requested,
            "instance already live with another configuration, reusing it"
        );
        Ok(())
    }

    fn create(&mut self, scope: Scope, planned: &PlannedInstance) -> Result<()> {
        let factory = self.factory_for(planned)?;
        let instance = {
            let ctx = CreateContext {
                planned,
                environment: self.config.environment,
                repository: self,
            };
            factory.create(&ctx).inspect_err(|e| {
                tracing::error!(instance = %planned.key, error = %e, "factory failed");
            })?
        };

        let record = InstanceRecord {
            id: InstanceId::generate(),
            key: planned.key.clone(),
            scope,
            type_name: instance.type_name().to_string(),
            config: planned.config().map(ToString::to_string),
            created_at: Utc::now(),
        };
        tracing::debug!(
            instance = %record.key,
            id = %record.id,
            kind = %record.type_name,
            "created instance"
        );

        let _ = self
            .instances
            .insert(planned.key.clone(), Entry { instance, record });
        self.order.push(planned.key.clone());
        Ok(())
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("config", &self.config)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("instances", &self.order)
            .finish()
    }
}
