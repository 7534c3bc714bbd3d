//! Bare component identities.

use std::fmt;
use std::sync::Arc;

use rigging_common::types::{ComponentId, ComponentKey};

use crate::configuration::Configuration;
use crate::requirement::Requirement;

/// A component kind that a test can require.
///
/// The [`Display`](fmt::Display) output is the identity's label and must be
/// stable, since it ends up in test-failure messages.
pub trait Identity: fmt::Display + fmt::Debug + Send + Sync {
    /// Key the resolver uses to recognise this identity.
    fn key(&self) -> ComponentKey;

    /// Requirements that must be satisfied before this identity.
    fn requires(&self) -> Vec<Requirement> {
        Vec::new()
    }

    /// Configuration applied when the requirement carries none of its own.
    fn configuration(&self) -> Option<Arc<dyn Configuration>> {
        None
    }
}

impl Identity for ComponentId {
    fn key(&self) -> ComponentKey {
        ComponentKey::new(self.clone())
    }
}
