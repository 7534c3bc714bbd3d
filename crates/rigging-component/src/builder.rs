//! Fluent API for assembling a requirement in one expression.

use std::sync::Arc;

use crate::configuration::Configuration;
use crate::identity::Identity;
use crate::requirement::Requirement;

/// Builder for a requirement before it is handed to a resolver.
#[derive(Debug)]
pub struct RequirementBuilder {
    identity: Arc<dyn Identity>,
    name: Option<String>,
    config: Option<Arc<dyn Configuration>>,
}

impl RequirementBuilder {
    /// Creates a new builder for the given identity.
    #[must_use]
    pub fn new(identity: impl Identity + 'static) -> Self {
        Self::from_shared(Arc::new(identity))
    }

    /// Creates a new builder for an already shared identity.
    #[must_use]
    pub const fn from_shared(identity: Arc<dyn Identity>) -> Self {
        Self {
            identity,
            name: None,
            config: None,
        }
    }

    /// Sets the instance name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: impl Configuration + 'static) -> Self {
        self.config = Some(Arc::new(config));
        self
    }

    /// Builds the requirement.
    ///
    /// Yields a bare requirement when neither a name nor a configuration
    /// was set, and a single wrapper otherwise.
    #[must_use]
    pub fn build(self) -> Requirement {
        let mut req = Requirement::from_shared(self.identity);
        if let Some(name) = self.name {
            req = req.named(name);
        }
        if let Some(config) = self.config {
            req = req.configured_shared(config);
        }
        req
    }
}

#[cfg(test)]
mod tests {
    use rigging_common::types::ComponentId;

    use super::*;

    #[test]
    fn empty_builder_yields_bare_requirement() {
        let req = RequirementBuilder::new(ComponentId::new("mixer")).build();
        assert!(!req.is_wrapped());
        assert_eq!(req.to_string(), "mixer");
    }

    #[test]
    fn builder_sets_both_fields() {
        let req = RequirementBuilder::new(ComponentId::new("echo"))
            .config(String::from("{service: a.echo}"))
            .name("a")
            .build();
        assert_eq!(
            req.to_string(),
            "{name: a, requirement: echo, config: {service: a.echo}}"
        );
    }

    #[test]
    fn explicit_empty_name_still_wraps() {
        let req = RequirementBuilder::new(ComponentId::new("echo"))
            .name("")
            .build();
        assert_eq!(req.to_string(), "{name: , requirement: echo, config: <nil>}");
    }

    #[test]
    fn config_only_builder_leaves_name_empty() {
        let req = RequirementBuilder::new(ComponentId::new("echo"))
            .config("v1")
            .build();
        assert!(req.is_wrapped());
        assert_eq!(req.name(), "");
    }
}
