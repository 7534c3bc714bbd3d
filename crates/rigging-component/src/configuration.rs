//! Opaque component configuration.

use std::any::Any;
use std::fmt;

/// Type-erased access to a concrete value.
pub trait AsAny: Any {
    /// Returns `self` as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the concrete type name, used in mismatch errors.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Marker for configuration values that components accept.
///
/// The only structural requirement is a stable label via
/// [`Display`](fmt::Display). Each component owns the concrete shape and
/// recovers it with [`downcast_config`].
pub trait Configuration: AsAny + fmt::Display + fmt::Debug + Send + Sync {}

impl Configuration for String {}

impl Configuration for &'static str {}

/// Recovers the concrete configuration type, if it matches.
pub fn downcast_config<C: Configuration>(config: &dyn Configuration) -> Option<&C> {
    config.as_any().downcast_ref::<C>()
}
