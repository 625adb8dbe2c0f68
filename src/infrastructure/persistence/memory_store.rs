//! In-process link store backed by a hash map.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::store::{LinkStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;

#[derive(Debug)]
struct StoredLink {
    link: ShortLink,
    /// Insertion order, tie-breaker for identical timestamps.
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    by_code: HashMap<String, StoredLink>,
    code_by_url: HashMap<String, String>,
    next_seq: u64,
}

/// Link store that keeps everything in process memory.
///
/// Used when no external backend is configured, and as the store under the
/// HTTP integration tests. Contents vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    inner: RwLock<Inner>,
}

impl MemoryLinkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        let inner = self.read()?;
        Ok(inner.by_code.get(code).map(|stored| stored.link.clone()))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .code_by_url
            .get(long_url)
            .and_then(|code| inner.by_code.get(code))
            .map(|stored| stored.link.clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        let inner = self.read()?;
        Ok(inner.by_code.contains_key(code))
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        let mut inner = self.write()?;

        if inner.code_by_url.contains_key(&new_link.long_url) {
            return Err(StoreError::UrlExists);
        }
        if inner.by_code.contains_key(&new_link.code) {
            return Err(StoreError::CodeExists);
        }

        let link = ShortLink::new(new_link.code.clone(), new_link.long_url.clone(), 0, Utc::now());
        let seq = inner.next_seq;
        inner.next_seq += 1;

        inner.code_by_url.insert(new_link.long_url, new_link.code.clone());
        inner.by_code.insert(
            new_link.code,
            StoredLink {
                link: link.clone(),
                seq,
            },
        );

        Ok(link)
    }

    async fn increment_access(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        let mut inner = self.write()?;
        Ok(inner.by_code.get_mut(code).map(|stored| {
            stored.link.access_count += 1;
            stored.link.clone()
        }))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let inner = self.read()?;
        Ok(inner.by_code.len() as i64)
    }

    async fn sum_access(&self) -> Result<i64, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .by_code
            .values()
            .map(|stored| stored.link.access_count)
            .sum())
    }

    async fn top_accessed(&self, limit: i64) -> Result<Vec<ShortLink>, StoreError> {
        let inner = self.read()?;

        let mut ranked: Vec<&StoredLink> = inner.by_code.values().collect();
        ranked.sort_by(|a, b| {
            b.link
                .access_count
                .cmp(&a.link.access_count)
                .then_with(|| a.link.created_at.cmp(&b.link.created_at))
                .then_with(|| a.seq.cmp(&b.seq))
        });

        Ok(ranked
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|stored| stored.link.clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link(code: &str, url: &str) -> NewShortLink {
        NewShortLink {
            code: code.to_string(),
            long_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip() {
        let store = MemoryLinkStore::new();

        let inserted = store
            .insert(new_link("abc123", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(inserted.access_count, 0);

        let by_code = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(by_code.long_url, "https://example.com");

        let by_url = store
            .find_by_long_url("https://example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_url.code, "abc123");

        assert!(store.exists("abc123").await.unwrap());
        assert!(!store.exists("other1").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = MemoryLinkStore::new();

        store
            .insert(new_link("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let err = store
            .insert(new_link("abc123", "https://example.com/b"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CodeExists));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_url() {
        let store = MemoryLinkStore::new();

        store
            .insert(new_link("abc123", "https://example.com"))
            .await
            .unwrap();

        let err = store
            .insert(new_link("xyz789", "https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UrlExists));
    }

    #[tokio::test]
    async fn test_increment_access_counts_every_call() {
        let store = MemoryLinkStore::new();
        store
            .insert(new_link("abc123", "https://example.com"))
            .await
            .unwrap();

        for expected in 1..=3 {
            let link = store.increment_access("abc123").await.unwrap().unwrap();
            assert_eq!(link.access_count, expected);
        }

        let link = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(link.access_count, 3);
    }

    #[tokio::test]
    async fn test_increment_access_unknown_code_is_none() {
        let store = MemoryLinkStore::new();
        assert!(store.increment_access("nosuch").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_aggregates_over_several_links() {
        let store = MemoryLinkStore::new();

        store
            .insert(new_link("aaa111", "https://example.com/a"))
            .await
            .unwrap();
        store
            .insert(new_link("bbb222", "https://example.com/b"))
            .await
            .unwrap();

        for _ in 0..4 {
            store.increment_access("bbb222").await.unwrap();
        }
        store.increment_access("aaa111").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.sum_access().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_top_accessed_orders_by_count_then_age() {
        let store = MemoryLinkStore::new();

        for (code, url) in [
            ("one111", "https://example.com/1"),
            ("two222", "https://example.com/2"),
            ("thr333", "https://example.com/3"),
        ] {
            store.insert(new_link(code, url)).await.unwrap();
        }

        for _ in 0..2 {
            store.increment_access("thr333").await.unwrap();
        }
        // one111 and two222 tie at one access; the earlier insert wins.
        store.increment_access("one111").await.unwrap();
        store.increment_access("two222").await.unwrap();

        let top = store.top_accessed(5).await.unwrap();
        let codes: Vec<&str> = top.iter().map(|link| link.code.as_str()).collect();
        assert_eq!(codes, vec!["thr333", "one111", "two222"]);
    }

    #[tokio::test]
    async fn test_top_accessed_respects_limit() {
        let store = MemoryLinkStore::new();

        for i in 0..7 {
            store
                .insert(new_link(
                    &format!("code{i:02}"),
                    &format!("https://example.com/{i}"),
                ))
                .await
                .unwrap();
        }

        let top = store.top_accessed(5).await.unwrap();
        assert_eq!(top.len(), 5);

        let none = store.top_accessed(0).await.unwrap();
        assert!(none.is_empty());
    }
}
