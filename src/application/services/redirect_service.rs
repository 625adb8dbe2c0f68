//! Short code resolution service.

use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::store::LinkStore;
use crate::error::AppError;
use tracing::debug;

/// Service for resolving short codes to their destination.
///
/// Every successful resolution records one access against the link. The
/// lookup and the counter bump happen in a single store operation, so
/// concurrent hits on the same code never lose an increment.
pub struct RedirectService {
    store: Arc<dyn LinkStore>,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// Resolves `code` and records the access.
    ///
    /// Returns the link with its counter already incremented.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code and
    /// [`AppError::Internal`] if the store fails.
    pub async fn resolve(&self, code: &str) -> Result<ShortLink, AppError> {
        match self.store.increment_access(code).await? {
            Some(link) => {
                debug!(code = %link.code, access_count = link.access_count, "resolved short link");
                Ok(link)
            }
            None => Err(AppError::not_found("URL not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::{MockLinkStore, StoreError};
    use chrono::Utc;

    #[tokio::test]
    async fn test_resolve_returns_link_with_bumped_counter() {
        let mut store = MockLinkStore::new();

        let link = ShortLink::new(
            "abc123".to_string(),
            "https://example.com".to_string(),
            5,
            Utc::now(),
        );
        store
            .expect_increment_access()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let service = RedirectService::new(Arc::new(store));

        let resolved = service.resolve("abc123").await.unwrap();
        assert_eq!(resolved.long_url, "https://example.com");
        assert_eq!(resolved.access_count, 5);
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found() {
        let mut store = MockLinkStore::new();
        store
            .expect_increment_access()
            .times(1)
            .returning(|_| Ok(None));

        let service = RedirectService::new(Arc::new(store));

        let err = service.resolve("nosuch").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "URL not found");
    }

    #[tokio::test]
    async fn test_resolve_propagates_store_failure() {
        let mut store = MockLinkStore::new();
        store
            .expect_increment_access()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("timeout".to_string())));

        let service = RedirectService::new(Arc::new(store));

        let err = service.resolve("abc123").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
