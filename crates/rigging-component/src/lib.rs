//! # rigging-component
//!
//! Declarative component requirements for integration tests.
//!
//! A test states which components it needs before its body runs. Each need
//! is a [`Requirement`](requirement::Requirement): a bare
//! [`Identity`](identity::Identity), optionally decorated with an instance
//! name and a [`Configuration`](configuration::Configuration).
//!
//! - [`requirement`]: the requirement model and the decoration API.
//! - [`builder`]: fluent construction of a decorated requirement.
//! - [`descriptor`]: identities that declare their own sub-requirements.
//!
//! # Example
//!
//! ```rust
//! use rigging_common::types::ComponentId;
//! use rigging_component::requirement::{configure_requirement, name_requirement};
//!
//! let req = name_requirement(ComponentId::new("echo"), "a");
//! let req = configure_requirement(req, "{service: a.echo}");
//!
//! assert_eq!(
//!     req.to_string(),
//!     "{name: a, requirement: echo, config: {service: a.echo}}"
//! );
//! ```

pub mod builder;
pub mod configuration;
pub mod descriptor;
pub mod identity;
pub mod requirement;
