//! Store trait definitions for the domain layer.
//!
//! This module defines the mapping store interface that abstracts data access
//! operations following the Repository pattern. The trait is implemented by
//! concrete stores in the infrastructure layer.
//!
//! # Architecture
//!
//! - The trait defines the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - A mock implementation is auto-generated via `mockall` for testing

pub mod link_store;

pub use link_store::{LinkStore, StoreError};

#[cfg(test)]
pub use link_store::MockLinkStore;
