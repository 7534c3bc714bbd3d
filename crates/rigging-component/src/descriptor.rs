//! Component descriptors: identities that declare their own requirements.
//!
//! A descriptor is how a component author expresses "this kind, in this
//! variant, with this default configuration, needs these other components
//! first". The resolver walks [`Identity::requires`] to order instances.

use std::fmt;
use std::sync::Arc;

use rigging_common::types::{ComponentId, ComponentKey, Variant};

use crate::configuration::Configuration;
use crate::identity::Identity;
use crate::requirement::Requirement;

/// A component kind and variant with declared sub-requirements.
#[derive(Debug, Clone)]
pub struct Descriptor {
    key: ComponentKey,
    requires: Vec<Requirement>,
    configuration: Option<Arc<dyn Configuration>>,
}

impl Descriptor {
    /// Creates a descriptor with no requirements and no configuration.
    #[must_use]
    pub const fn new(id: ComponentId, variant: Variant) -> Self {
        Self {
            key: ComponentKey::with_variant(id, variant),
            requires: Vec::new(),
            configuration: None,
        }
    }

    /// Adds a requirement that must be satisfied first.
    #[must_use]
    pub fn with_requirement(mut self, req: impl Into<Requirement>) -> Self {
        self.requires.push(req.into());
        self
    }

    /// Sets the default configuration.
    #[must_use]
    pub fn with_configuration(mut self, config: impl Configuration + 'static) -> Self {
        self.configuration = Some(Arc::new(config));
        self
    }

    /// Declared sub-requirements, in declaration order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requires
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl Identity for Descriptor {
    fn key(&self) -> ComponentKey {
        self.key.clone()
    }

    fn requires(&self) -> Vec<Requirement> {
        self.requires.clone()
    }

    fn configuration(&self) -> Option<Arc<dyn Configuration>> {
        self.configuration.clone()
    }
}

impl From<Descriptor> for Requirement {
    fn from(descriptor: Descriptor) -> Self {
        Self::new(descriptor)
    }
}
