//! Store trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by mapping store implementations.
///
/// Duplicate-key violations are control flow for the shortening engine, not
/// faults: a code collision triggers a retry with a fresh code, and a URL
/// collision means a concurrent request already shortened the same URL.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The short code is already taken by another entry.
    #[error("short code already exists")]
    CodeExists,

    /// The long URL is already mapped to another code.
    #[error("long URL already exists")]
    UrlExists,

    /// The backend could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Store interface for short link mappings.
///
/// Provides lookups by code and by long URL, conditional insertion, atomic
/// access counting, and the aggregate reads behind the stats endpoint.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisLinkStore`] - Redis
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - in-process map,
///   used by integration tests and as a dependency-free default
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, StoreError>;

    /// Finds a link by its original long URL.
    ///
    /// Used to check if a URL has already been shortened. Every backend
    /// answers this through an index on the URL, never by scanning codes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, StoreError>;

    /// Returns whether a short code is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn exists(&self, code: &str) -> Result<bool, StoreError>;

    /// Inserts a new link with a zero access count.
    ///
    /// Insertion is conditional on both uniqueness constraints at once; the
    /// store decides atomically, so two writers can never both succeed with
    /// the same code or the same URL.
    ///
    /// # Errors
    ///
    /// - [`StoreError::CodeExists`] if the code is already taken
    /// - [`StoreError::UrlExists`] if the URL is already mapped
    /// - [`StoreError::Unavailable`] on backend errors
    async fn insert(&self, link: NewShortLink) -> Result<ShortLink, StoreError>;

    /// Atomically increments the access counter of a link and returns the
    /// updated entry, or `None` when the code is unknown.
    ///
    /// Concurrent increments of the same code must all be counted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn increment_access(&self, code: &str) -> Result<Option<ShortLink>, StoreError>;

    /// Counts all stored links.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Sums the access counters over all links. Zero when the store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn sum_access(&self) -> Result<i64, StoreError>;

    /// Returns up to `limit` links ordered by access count descending.
    /// Ties are broken by earliest creation time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn top_accessed(&self, limit: i64) -> Result<Vec<ShortLink>, StoreError>;

    /// Verifies the backend is reachable. Used by the health endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backend does not respond.
    async fn ping(&self) -> Result<(), StoreError>;

    /// A short identifier of the backing implementation, e.g. `"postgres"`.
    fn backend(&self) -> &'static str;
}
