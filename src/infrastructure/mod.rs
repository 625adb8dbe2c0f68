//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete link store implementations over the supported backends.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL, Redis, and in-memory link stores

pub mod persistence;
