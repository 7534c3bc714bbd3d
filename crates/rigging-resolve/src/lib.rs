//! # rigging-resolve
//!
//! Turns declared requirements into live component instances.
//!
//! Handles:
//! - **Graph**: dependency graph over instance keys and topological ordering.
//! - **Resolver**: deduplication by identity and name, transitive
//!   dependency discovery, and configuration merging.
//! - **Repository**: factories per component kind, exactly-once
//!   instantiation, typed lookup, and lifecycle scopes.

pub mod graph;
pub mod repository;
pub mod resolver;
