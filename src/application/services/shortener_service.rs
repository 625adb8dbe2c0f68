//! Short link creation service.

use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::store::{LinkStore, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use tracing::{debug, info, warn};
use url::Url;

/// Upper bound on code generation attempts per request. Random codes make
/// repeated collisions vanishingly unlikely; hitting the bound means the code
/// space is effectively full.
const MAX_GENERATION_ATTEMPTS: usize = 1000;

/// Service for creating shortened links.
///
/// Handles input validation, idempotent reuse of existing mappings, and
/// collision-free code allocation against the store's uniqueness guarantees.
pub struct ShortenerService {
    store: Arc<dyn LinkStore>,
    generator: Arc<dyn CodeGenerator>,
}

impl ShortenerService {
    /// Creates a new shortener service.
    pub fn new(store: Arc<dyn LinkStore>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self { store, generator }
    }

    /// Creates a short link for `long_url`, or returns the existing one.
    ///
    /// # Idempotency
    ///
    /// A URL that was already shortened yields its existing entry unchanged,
    /// with no new write. Two concurrent requests for the same new URL race
    /// on the store's URL uniqueness constraint; the loser adopts the
    /// winner's entry, so both callers observe the same code.
    ///
    /// # Code Allocation
    ///
    /// Random candidate codes are drawn until one is free. A code taken
    /// between the availability check and the insert is detected through the
    /// store's code uniqueness constraint and retried with a fresh code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is missing, empty, or not
    /// parseable as an absolute URL.
    ///
    /// Returns [`AppError::Internal`] if the attempt bound is exhausted or
    /// the store fails.
    pub async fn shorten(&self, long_url: &str) -> Result<ShortLink, AppError> {
        if long_url.is_empty() {
            return Err(AppError::bad_request("No URL provided"));
        }

        if Url::parse(long_url).is_err() {
            return Err(AppError::bad_request("Invalid URL"));
        }

        // The URL is stored exactly as submitted. Lookups therefore match on
        // the verbatim string as well.
        if let Some(existing) = self.store.find_by_long_url(long_url).await? {
            debug!(code = %existing.code, "reusing existing mapping");
            return Ok(existing);
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = self.generator.generate();

            if self.store.exists(&code).await? {
                debug!(attempt, "generated code already taken, retrying");
                continue;
            }

            let new_link = NewShortLink {
                code,
                long_url: long_url.to_string(),
            };

            match self.store.insert(new_link).await {
                Ok(link) => {
                    info!(code = %link.code, "short link created");
                    return Ok(link);
                }
                Err(StoreError::CodeExists) => {
                    debug!(attempt, "code taken by concurrent insert, retrying");
                    continue;
                }
                Err(StoreError::UrlExists) => {
                    debug!("concurrent request shortened the same URL first");
                    return match self.store.find_by_long_url(long_url).await? {
                        Some(winner) => Ok(winner),
                        None => Err(AppError::internal("Failed to shorten URL")),
                    };
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "giving up on code generation"
        );
        Err(AppError::internal("short code space exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::MockLinkStore;
    use crate::utils::code_generator::MockCodeGenerator;
    use chrono::Utc;
    use mockall::Sequence;

    fn test_link(code: &str, url: &str) -> ShortLink {
        ShortLink::new(code.to_string(), url.to_string(), 0, Utc::now())
    }

    fn fixed_generator(code: &'static str) -> MockCodeGenerator {
        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().returning(move || code.to_string());
        generator
    }

    #[tokio::test]
    async fn test_shorten_new_url_success() {
        let mut store = MockLinkStore::new();

        store
            .expect_find_by_long_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(None));

        store
            .expect_exists()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(false));

        let created = test_link("abc123", "https://example.com");
        store
            .expect_insert()
            .withf(|link| link.code == "abc123" && link.long_url == "https://example.com")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let service = ShortenerService::new(
            Arc::new(store),
            Arc::new(fixed_generator("abc123")),
        );

        let link = service.shorten("https://example.com").await.unwrap();
        assert_eq!(link.code, "abc123");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.access_count, 0);
    }

    #[tokio::test]
    async fn test_shorten_reuses_existing_mapping() {
        let mut store = MockLinkStore::new();

        let existing = test_link("known1", "https://example.com");
        store
            .expect_find_by_long_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        store.expect_insert().times(0);

        // No expectations: any generate() call would panic the test.
        let generator = MockCodeGenerator::new();

        let service = ShortenerService::new(Arc::new(store), Arc::new(generator));

        let link = service.shorten("https://example.com").await.unwrap();
        assert_eq!(link.code, "known1");
    }

    #[tokio::test]
    async fn test_shorten_rejects_empty_url() {
        let service = ShortenerService::new(
            Arc::new(MockLinkStore::new()),
            Arc::new(MockCodeGenerator::new()),
        );

        let err = service.shorten("").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "No URL provided");
    }

    #[tokio::test]
    async fn test_shorten_rejects_unparseable_url() {
        let service = ShortenerService::new(
            Arc::new(MockLinkStore::new()),
            Arc::new(MockCodeGenerator::new()),
        );

        let err = service.shorten("not-a-valid-url").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid URL");
    }

    #[tokio::test]
    async fn test_shorten_discards_taken_code_and_keeps_fresh_one() {
        let mut store = MockLinkStore::new();
        let mut generator = MockCodeGenerator::new();
        let mut seq = Sequence::new();

        store
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "taken1".to_string());
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| "fresh2".to_string());

        store
            .expect_exists()
            .withf(|code| code == "taken1")
            .times(1)
            .returning(|_| Ok(true));
        store
            .expect_exists()
            .withf(|code| code == "fresh2")
            .times(1)
            .returning(|_| Ok(false));

        let created = test_link("fresh2", "https://example.com/new");
        store
            .expect_insert()
            .withf(|link| link.code == "fresh2")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let service = ShortenerService::new(Arc::new(store), Arc::new(generator));

        let link = service.shorten("https://example.com/new").await.unwrap();
        assert_eq!(link.code, "fresh2");
    }

    #[tokio::test]
    async fn test_shorten_retries_when_insert_loses_code_race() {
        let mut store = MockLinkStore::new();
        let mut generator = MockCodeGenerator::new();
        let mut generator_seq = Sequence::new();
        let mut insert_seq = Sequence::new();

        store
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut generator_seq)
            .returning(|| "first1".to_string());
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut generator_seq)
            .returning(|| "second".to_string());

        store.expect_exists().times(2).returning(|_| Ok(false));

        store
            .expect_insert()
            .times(1)
            .in_sequence(&mut insert_seq)
            .returning(|_| Err(StoreError::CodeExists));

        let created = test_link("second", "https://example.com");
        store
            .expect_insert()
            .times(1)
            .in_sequence(&mut insert_seq)
            .returning(move |_| Ok(created.clone()));

        let service = ShortenerService::new(Arc::new(store), Arc::new(generator));

        let link = service.shorten("https://example.com").await.unwrap();
        assert_eq!(link.code, "second");
    }

    #[tokio::test]
    async fn test_shorten_adopts_winner_on_url_race() {
        let mut store = MockLinkStore::new();
        let mut seq = Sequence::new();

        store
            .expect_find_by_long_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        store.expect_exists().times(1).returning(|_| Ok(false));

        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::UrlExists));

        let winner = test_link("winner", "https://example.com");
        store
            .expect_find_by_long_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));

        let service = ShortenerService::new(
            Arc::new(store),
            Arc::new(fixed_generator("loser1")),
        );

        let link = service.shorten("https://example.com").await.unwrap();
        assert_eq!(link.code, "winner");
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_bounded_attempts() {
        let mut store = MockLinkStore::new();

        store
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        store
            .expect_exists()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Ok(true));

        store.expect_insert().times(0);

        let service = ShortenerService::new(
            Arc::new(store),
            Arc::new(fixed_generator("stuck1")),
        );

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.to_string(), "short code space exhausted");
    }

    #[tokio::test]
    async fn test_shorten_propagates_store_failure() {
        let mut store = MockLinkStore::new();

        store
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let service = ShortenerService::new(
            Arc::new(store),
            Arc::new(MockCodeGenerator::new()),
        );

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
