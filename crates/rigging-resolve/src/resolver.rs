//! Turns a requirement set into an ordered, deduplicated plan.
//!
//! Requirements are deduplicated by [`InstanceKey`]: the identity's key plus
//! the requirement's name. Each identity's declared sub-requirements are
//! walked recursively and recorded as dependency edges, and the final plan
//! lists every instance after everything it depends on.

use std::collections::HashMap;
use std::sync::Arc;

use rigging_common::config::FrameworkConfig;
use rigging_common::error::{Result, RiggingError};
use rigging_common::types::InstanceKey;
use rigging_component::configuration::Configuration;
use rigging_component::identity::Identity;
use rigging_component::requirement::Requirement;

use crate::graph::DependencyGraph;

/// One instance the plan will create.
#[derive(Debug, Clone)]
pub struct PlannedInstance {
    /// Deduplication key of the instance.
    pub key: InstanceKey,
    /// Identity from the first request for this key.
    pub identity: Arc<dyn Identity>,
    /// Effective configuration, if any.
    pub config: Option<Arc<dyn Configuration>>,
    /// Whether `config` was supplied by a requirement rather than taken
    /// from the identity's default.
    pub explicit_config: bool,
    /// Instances this one depends on, in declaration order.
    pub dependencies: Vec<InstanceKey>,
}

impl PlannedInstance {
    /// Effective configuration as a trait object.
    #[must_use]
    pub fn config(&self) -> Option<&dyn Configuration> {
        self.config.as_deref()
    }
}

/// Resolved requirements in dependency order.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    instances: Vec<PlannedInstance>,
    roots: Vec<InstanceKey>,
}

impl Plan {
    /// Planned instances, dependencies first.
    #[must_use]
    pub fn instances(&self) -> &[PlannedInstance] {
        &self.instances
    }

    /// Keys of the directly requested instances, deduplicated, in request order.
    #[must_use]
    pub fn roots(&self) -> &[InstanceKey] {
        &self.roots
    }

    /// Planned keys, dependencies first.
    pub fn keys(&self) -> impl Iterator<Item = &InstanceKey> {
        self.instances.iter().map(|planned| &planned.key)
    }

    /// Looks up a planned instance by key.
    #[must_use]
    pub fn get(&self, key: &InstanceKey) -> Option<&PlannedInstance> {
        self.instances.iter().find(|planned| planned.key == *key)
    }

    /// Number of planned instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if nothing was required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Builds a [`Plan`] from requirements.
#[derive(Debug)]
pub struct Resolver {
    strict_config: bool,
    graph: DependencyGraph,
    entries: HashMap<InstanceKey, PlannedInstance>,
    roots: Vec<InstanceKey>,
}

impl Resolver {
    /// Creates a resolver honouring the framework's configuration policy.
    #[must_use]
    pub fn new(config: &FrameworkConfig) -> Self {
        Self {
            strict_config: config.strict_config,
            graph: DependencyGraph::new(),
            entries: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Resolves `requirements` and their transitive dependencies.
    ///
    /// # Errors
    ///
    /// Returns an error if one instance is requested with two different
    /// configurations in strict mode, or if the dependencies form a cycle.
    pub fn resolve(mut self, requirements: &[Requirement]) -> Result<Plan> {
        for req in requirements {
            let key = self.visit(req, None)?;
            if !self.roots.contains(&key) {
                self.roots.push(key);
            }
        }

        let order = self.graph.resolve_order()?;
        let instances: Vec<PlannedInstance> = order
            .iter()
            .filter_map(|key| self.entries.remove(key))
            .collect();

        tracing::debug!(
            requested = requirements.len(),
            planned = instances.len(),
            "resolved requirements"
        );

        Ok(Plan {
            instances,
            roots: self.roots,
        })
    }

    fn visit(&mut self, req: &Requirement, parent: Option<&InstanceKey>) -> Result<InstanceKey> {
        let key = req.instance_key();
        let requested = match req.shared_config() {
            Some(config) => Requested::Explicit(config),
            None => req
                .identity()
                .configuration()
                .map_or(Requested::Nothing, Requested::Default),
        };

        let idx = self.graph.add_instance(&key);
        if let Some(parent) = parent {
            let parent_idx = self.graph.add_instance(parent);
            self.graph.add_dependency(parent_idx, idx);
            if let Some(entry) = self.entries.get_mut(parent) {
                if !entry.dependencies.contains(&key) {
                    entry.dependencies.push(key.clone());
                }
            }
        }

        if let Some(existing) = self.entries.get_mut(&key) {
            merge_config(existing, requested, self.strict_config)?;
            tracing::trace!(instance = %key, "requirement already planned");
            return Ok(key);
        }

        tracing::trace!(instance = %key, requirement = %req, "planning requirement");
        let identity = Arc::clone(req.identity());
        let explicit_config = matches!(requested, Requested::Explicit(_));
        let _ = self.entries.insert(
            key.clone(),
            PlannedInstance {
                key: key.clone(),
                identity: Arc::clone(&identity),
                config: requested.into_config(),
                explicit_config,
                dependencies: Vec::new(),
            },
        );

        for sub in identity.requires() {
            let _ = self.visit(&sub, Some(&key))?;
        }
        Ok(key)
    }
}

/// Configuration carried by one request for an instance.
enum Requested {
    Nothing,
    /// Identity default: only fills a gap.
    Default(Arc<dyn Configuration>),
    /// Set on the requirement itself.
    Explicit(Arc<dyn Configuration>),
}

impl Requested {
    fn into_config(self) -> Option<Arc<dyn Configuration>> {
        match self {
            Self::Nothing => None,
            Self::Default(config) | Self::Explicit(config) => Some(config),
        }
    }
}

fn merge_config(existing: &mut PlannedInstance, requested: Requested, strict: bool) -> Result<()> {
    let requested = match requested {
        Requested::Nothing => return Ok(()),
        Requested::Default(config) => {
            if existing.config.is_none() {
                existing.config = Some(config);
            }
            return Ok(());
        }
        Requested::Explicit(config) => config,
    };
    let current = existing
        .config
        .as_ref()
        .filter(|_| existing.explicit_config)
        .map(ToString::to_string);
    let Some(current) = current else {
        existing.config = Some(requested);
        existing.explicit_config = true;
        return Ok(());
    };

    let requested = requested.to_string();
    if current == requested {
        return Ok(());
    }
    if strict {
        return Err(RiggingError::ConflictingConfig {
            instance: existing.key.to_string(),
            existing: current,
            requested,
        });
    }
    tracing::warn!(
        instance = %existing.key,
        kept = %current,
        ignored = %requested,
        "conflicting configuration, keeping the first"
    );
    Ok(())
}
