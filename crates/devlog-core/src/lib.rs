//! # Devlog Core
//!
//! The domain layer of the devlog blog backend.
//! This crate contains the post model, query and pagination rules, the
//! content renderer and the ports that infrastructure implements. It has
//! no infrastructure dependencies.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;
pub mod query;

pub use error::{DomainError, RepoError};
