//! Framework-wide constants.

/// Label rendered in place of an absent configuration.
pub const NIL_LABEL: &str = "<nil>";

/// Separator between a component id and its variant in rendered keys.
pub const VARIANT_SEPARATOR: char = ':';
