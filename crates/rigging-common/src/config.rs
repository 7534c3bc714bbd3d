//! Framework configuration model.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::EnvironmentKind;

/// Root configuration for requirement resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Environment the tests run against.
    pub environment: EnvironmentKind,
    /// Whether requesting one instance with two different configurations
    /// is an error. When disabled the first configuration wins.
    pub strict_config: bool,
}

impl FrameworkConfig {
    /// Parses a configuration from JSON, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON for this model.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentKind::Native,
            strict_config: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = FrameworkConfig::from_json("{}").expect("parse");
        assert_eq!(config, FrameworkConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config =
            FrameworkConfig::from_json(r#"{"environment": "kubernetes", "strict_config": false}"#)
                .expect("parse");
        assert_eq!(config.environment, EnvironmentKind::Kubernetes);
        assert!(!config.strict_config);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let result = FrameworkConfig::from_json(r#"{"environment": "mainframe"}"#);
        assert!(result.is_err());
    }
}
