//! Common library for the LeadConnect backend
//!
//! This crate provides the infrastructure shared by every service: the
//! database context (with its embedded fallback) and the persistence error
//! taxonomy.

pub mod database;
pub mod error;

pub use database::{Backend, Database, DatabaseConfig};
pub use error::{DatabaseError, DatabaseResult};
