//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating store calls,
//! validation, and business rules. Services consume the [`crate::domain::store::LinkStore`]
//! trait and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Short link creation
//! - [`services::redirect_service::RedirectService`] - Code resolution and access counting
//! - [`services::stats_service::StatsService`] - Aggregate usage statistics

pub mod services;
