//! HTTP API layer.
//!
//! Request/response DTOs, endpoint handlers, and HTTP middleware. Routes are
//! assembled at the crate root in [`crate::routes`].

pub mod dto;
pub mod handlers;
pub mod middleware;
