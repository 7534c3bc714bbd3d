//! Unified error type for the Rigging workspace.
//!
//! Building requirements never fails. Every variant here is raised by the
//! resolver or the instance repository when a requirement set is turned
//! into live components.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RiggingError {
    /// An instance was fetched as a different type than the one it was built as.
    #[error("kind mismatch for {requirement}: expected {expected}, got {actual}")]
    KindMismatch {
        /// Label of the requirement that was looked up.
        requirement: String,
        /// Type the caller asked for.
        expected: &'static str,
        /// Type the instance actually has.
        actual: &'static str,
    },

    /// A configuration does not have the shape its component expects.
    #[error("configuration mismatch for {component}: expected {expected}, got {actual}")]
    ConfigMismatch {
        /// Instance the configuration was applied to.
        component: String,
        /// Configuration type the component expects.
        expected: &'static str,
        /// Configuration type that was supplied.
        actual: &'static str,
    },

    /// The same instance was requested twice with different configurations.
    #[error("conflicting configuration for {instance}: {existing} vs {requested}")]
    ConflictingConfig {
        /// Instance key that was requested twice.
        instance: String,
        /// Label of the configuration recorded first.
        existing: String,
        /// Label of the configuration requested later.
        requested: String,
    },

    /// A required factory or instance was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// The requirement graph contains a cycle.
    #[error("cyclic dependency detected at {instance}")]
    CyclicDependency {
        /// An instance that participates in the cycle.
        instance: String,
    },

    /// A component cannot run in the configured environment.
    #[error("{component} is not supported in the {environment} environment")]
    Unsupported {
        /// Component kind that was requested.
        component: String,
        /// Environment the framework is configured for.
        environment: String,
    },

    /// A factory failed to build its instance.
    #[error("failed to create {component}: {message}")]
    Factory {
        /// Instance that failed to build.
        component: String,
        /// Description of the failure.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RiggingError>;
