//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the record types, the exact-match query model, the repository ports and the
//! authentication / ownership services built on top of them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

pub use error::{DomainError, RepoError};
