//! Domain primitive types used across the Rigging workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::VARIANT_SEPARATOR;

/// Identifier of a component kind, such as `echo` or `pilot`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(String);

impl ComponentId {
    /// Creates a new component ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Variant of a component kind. Empty means the default variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variant(String);

impl Variant {
    /// Creates a variant from a string value.
    #[must_use]
    pub fn new(variant: impl Into<String>) -> Self {
        Self(variant.into())
    }

    /// Returns `true` for the default variant.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity key of a component kind: its id plus variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentKey {
    /// Component kind.
    pub id: ComponentId,
    /// Variant of the kind.
    pub variant: Variant,
}

impl ComponentKey {
    /// Creates a key for the default variant of `id`.
    #[must_use]
    pub fn new(id: ComponentId) -> Self {
        Self {
            id,
            variant: Variant::default(),
        }
    }

    /// Creates a key for a specific variant of `id`.
    #[must_use]
    pub const fn with_variant(id: ComponentId, variant: Variant) -> Self {
        Self { id, variant }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variant.is_default() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}{VARIANT_SEPARATOR}{}", self.id, self.variant)
        }
    }
}

/// Key under which the resolver deduplicates requirements.
///
/// Two requests for the same component key and the same name (or both
/// unnamed) denote one instance; differing names denote distinct instances.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceKey {
    /// Key of the component kind.
    pub component: ComponentKey,
    /// Instance name, empty when unnamed.
    pub name: String,
}

impl InstanceKey {
    /// Creates an instance key.
    #[must_use]
    pub fn new(component: ComponentKey, name: impl Into<String>) -> Self {
        Self {
            component,
            name: name.into(),
        }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.component)
        } else {
            write!(f, "{}[{}]", self.component, self.name)
        }
    }
}

/// Unique identifier of a created component instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generates a random instance ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle scope at which an instance was required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Lives until the whole suite finishes.
    Suite,
    /// Lives until the current test finishes.
    Test,
}

impl Scope {
    /// Returns `true` if an instance at `self` lives at least as long as one at `other`.
    #[must_use]
    pub const fn outlives(self, other: Self) -> bool {
        matches!((self, other), (Self::Suite, _) | (Self::Test, Self::Test))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suite => write!(f, "suite"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Environment the tests run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    /// Components run as local processes.
    #[default]
    Native,
    /// Components run inside a Kubernetes cluster.
    Kubernetes,
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Kubernetes => write!(f, "kubernetes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_key_hides_default_variant() {
        let key = ComponentKey::new(ComponentId::new("pilot"));
        assert_eq!(key.to_string(), "pilot");
    }

    #[test]
    fn component_key_renders_variant() {
        let key = ComponentKey::with_variant(ComponentId::new("pilot"), Variant::new("canary"));
        assert_eq!(key.to_string(), "pilot:canary");
    }

    #[test]
    fn instance_key_renders_name() {
        let component = ComponentKey::new(ComponentId::new("echo"));
        assert_eq!(InstanceKey::new(component.clone(), "").to_string(), "echo");
        assert_eq!(InstanceKey::new(component, "a").to_string(), "echo[a]");
    }

    #[test]
    fn instance_keys_differ_by_name() {
        let component = ComponentKey::new(ComponentId::new("echo"));
        let a = InstanceKey::new(component.clone(), "a");
        let b = InstanceKey::new(component.clone(), "b");
        assert_ne!(a, b);
        assert_eq!(a, InstanceKey::new(component, "a"));
    }

    #[test]
    fn suite_outlives_test() {
        assert!(Scope::Suite.outlives(Scope::Test));
        assert!(Scope::Suite.outlives(Scope::Suite));
        assert!(Scope::Test.outlives(Scope::Test));
        assert!(!Scope::Test.outlives(Scope::Suite));
    }

    #[test]
    fn generated_instance_ids_are_unique() {
        assert_ne!(InstanceId::generate(), InstanceId::generate());
    }

    #[test]
    fn environment_kind_serializes_lowercase() {
        let json = serde_json::to_string(&EnvironmentKind::Kubernetes).expect("serialize");
        assert_eq!(json, "\"kubernetes\"");
    }
}
