//! Core domain entities representing the business data model.
//!
//! This module contains the fundamental data structures that represent the core
//! concepts of the URL shortening service. Entities are plain data structures
//! without business logic.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A shortened URL mapping with its access counter
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`NewShortLink`] carries the caller-provided fields, while the store assigns
//! the counter and creation timestamp.

pub mod short_link;

pub use short_link::{NewShortLink, ShortLink};
