//! # rigging-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the Rigging workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the keys, scopes, and errors that the
//! component model and the resolver build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
