//! Requirements and their name/configuration decoration.
//!
//! A [`Requirement`] is either a bare [`Identity`] or a
//! [`RequirementWrapper`] that decorates an identity with a name and a
//! configuration. Decorating a wrapper again updates it in place, so
//! wrappers never nest no matter how often or in which order
//! [`name_requirement`] and [`configure_requirement`] are applied.

use std::fmt;
use std::sync::Arc;

use rigging_common::constants::NIL_LABEL;
use rigging_common::types::{ComponentId, InstanceKey};

use crate::configuration::Configuration;
use crate::identity::Identity;

/// Something a test needs to exist before it runs.
#[derive(Debug, Clone)]
pub enum Requirement {
    /// A component identity with no name and no configuration.
    Bare(Arc<dyn Identity>),
    /// An identity decorated with a name and/or configuration.
    Wrapped(Box<RequirementWrapper>),
}

/// Decorates an identity with an instance name and a configuration.
#[derive(Debug, Clone)]
pub struct RequirementWrapper {
    inner: Arc<dyn Identity>,
    name: String,
    config: Option<Arc<dyn Configuration>>,
}

impl RequirementWrapper {
    /// The wrapped identity. Fixed at construction.
    #[must_use]
    pub const fn inner(&self) -> &Arc<dyn Identity> {
        &self.inner
    }

    /// Instance name, empty when unnamed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attached configuration, if any.
    #[must_use]
    pub fn config(&self) -> Option<&dyn Configuration> {
        self.config.as_deref()
    }
}

impl fmt::Display for RequirementWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{name: {}, requirement: {}, config: ", self.name, self.inner)?;
        match &self.config {
            Some(config) => write!(f, "{config}")?,
            None => f.write_str(NIL_LABEL)?,
        }
        f.write_str("}")
    }
}

impl Requirement {
    /// Creates a bare requirement for `identity`.
    #[must_use]
    pub fn new(identity: impl Identity + 'static) -> Self {
        Self::Bare(Arc::new(identity))
    }

    /// Creates a bare requirement from an already shared identity.
    #[must_use]
    pub const fn from_shared(identity: Arc<dyn Identity>) -> Self {
        Self::Bare(identity)
    }

    /// Sets the instance name.
    ///
    /// A wrapped requirement keeps its wrapper and configuration; a bare one
    /// is wrapped with no configuration.
    #[must_use]
    pub fn named(self, name: impl Into<String>) -> Self {
        match self {
            Self::Wrapped(mut wrapper) => {
                wrapper.name = name.into();
                Self::Wrapped(wrapper)
            }
            Self::Bare(inner) => Self::Wrapped(Box::new(RequirementWrapper {
                inner,
                name: name.into(),
                config: None,
            })),
        }
    }

    /// Attaches a configuration, replacing any previous one.
    ///
    /// A wrapped requirement keeps its wrapper and name; a bare one is
    /// wrapped with an empty name.
    #[must_use]
    pub fn configured(self, config: impl Configuration + 'static) -> Self {
        self.configured_shared(Arc::new(config))
    }

    /// Like [`configured`](Self::configured) for an already shared configuration.
    #[must_use]
    pub fn configured_shared(self, config: Arc<dyn Configuration>) -> Self {
        match self {
            Self::Wrapped(mut wrapper) => {
                wrapper.config = Some(config);
                Self::Wrapped(wrapper)
            }
            Self::Bare(inner) => Self::Wrapped(Box::new(RequirementWrapper {
                inner,
                name: String::new(),
                config: Some(config),
            })),
        }
    }

    /// The underlying identity, unwrapping if necessary.
    #[must_use]
    pub fn identity(&self) -> &Arc<dyn Identity> {
        match self {
            Self::Bare(identity) => identity,
            Self::Wrapped(wrapper) => &wrapper.inner,
        }
    }

    /// Instance name, empty for bare and unnamed requirements.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(_) => "",
            Self::Wrapped(wrapper) => &wrapper.name,
        }
    }

    /// Configuration attached by decoration, if any.
    #[must_use]
    pub fn config(&self) -> Option<&dyn Configuration> {
        self.as_wrapper().and_then(RequirementWrapper::config)
    }

    /// Shared handle to the attached configuration.
    #[must_use]
    pub fn shared_config(&self) -> Option<Arc<dyn Configuration>> {
        self.as_wrapper().and_then(|wrapper| wrapper.config.clone())
    }

    /// Returns the wrapper if this requirement is decorated.
    #[must_use]
    pub fn as_wrapper(&self) -> Option<&RequirementWrapper> {
        match self {
            Self::Bare(_) => None,
            Self::Wrapped(wrapper) => Some(&**wrapper),
        }
    }

    /// Returns `true` if this requirement is decorated.
    #[must_use]
    pub const fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(_))
    }

    /// Key under which a resolver deduplicates this requirement.
    #[must_use]
    pub fn instance_key(&self) -> InstanceKey {
        InstanceKey::new(self.identity().key(), self.name())
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(identity) => write!(f, "{identity}"),
            Self::Wrapped(wrapper) => write!(f, "{wrapper}"),
        }
    }
}

impl From<ComponentId> for Requirement {
    fn from(id: ComponentId) -> Self {
        Self::new(id)
    }
}

/// Names a requirement.
///
/// If `req` is already wrapped, the same wrapper is returned with its name
/// replaced. Otherwise `req` is wrapped with no configuration.
#[must_use]
pub fn name_requirement(req: impl Into<Requirement>, name: impl Into<String>) -> Requirement {
    req.into().named(name)
}

/// Attaches a configuration to a requirement.
///
/// If `req` is already wrapped, the same wrapper is returned with its
/// configuration replaced. Otherwise `req` is wrapped with an empty name.
#[must_use]
pub fn configure_requirement(
    req: impl Into<Requirement>,
    config: impl Configuration + 'static,
) -> Requirement {
    req.into().configured(config)
}
