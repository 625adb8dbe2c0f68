//! Short link entity representing a code to URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL mapping with usage accounting.
///
/// The short code is the primary key. The long URL is stored exactly as it
/// was submitted and never rewritten afterwards; `access_count` grows by one
/// per served redirect and never decreases.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShortLink {
    pub code: String,
    pub long_url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        code: String,
        long_url: String,
        access_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            long_url,
            access_count,
            created_at,
        }
    }
}

/// Input data for creating a new link.
///
/// The counter and creation timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub code: String,
    pub long_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_short_link_creation() {
        let now = Utc::now();
        let link = ShortLink::new(
            "abc123".to_string(),
            "https://example.com".to_string(),
            0,
            now,
        );

        assert_eq!(link.code, "abc123");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.access_count, 0);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_new_short_link_creation() {
        let new_link = NewShortLink {
            code: "xyz789".to_string(),
            long_url: "https://rust-lang.org".to_string(),
        };

        assert_eq!(new_link.code, "xyz789");
        assert_eq!(new_link.long_url, "https://rust-lang.org");
    }
}
