//! PostgreSQL implementation of the link store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::store::{LinkStore, StoreError};

/// Named constraint guarding one code per long URL, see the migrations.
const URL_UNIQUE_CONSTRAINT: &str = "links_long_url_key";

/// Link store backed by PostgreSQL.
///
/// Uses SQLx prepared statements for SQL injection protection. Uniqueness of
/// codes and long URLs is enforced by table constraints, and access counting
/// is a single `UPDATE .. RETURNING` so concurrent hits never lose increments.
pub struct PgLinkStore {
    pool: PgPool,
}

impl PgLinkStore {
    /// Creates a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to PostgreSQL and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable within
    /// `connect_timeout` seconds or a migration fails.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connect_timeout: u64,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connect_timeout))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }
}

fn store_err(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Distinguishes which uniqueness constraint an insert tripped over.
fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some(URL_UNIQUE_CONSTRAINT) => StoreError::UrlExists,
                _ => StoreError::CodeExists,
            };
        }
    }
    store_err(e)
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT code, long_url, access_count, created_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, StoreError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT code, long_url, access_count, created_at
            FROM links
            WHERE long_url = $1
            "#,
        )
        .bind(long_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO links (code, long_url)
            VALUES ($1, $2)
            RETURNING code, long_url, access_count, created_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.long_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn increment_access(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            UPDATE links
            SET access_count = access_count + 1
            WHERE code = $1
            RETURNING code, long_url, access_count, created_at
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn sum_access(&self) -> Result<i64, StoreError> {
        // SUM over bigint widens to numeric, cast back down.
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(access_count), 0)::BIGINT FROM links")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn top_accessed(&self, limit: i64) -> Result<Vec<ShortLink>, StoreError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT code, long_url, access_count, created_at
            FROM links
            ORDER BY access_count DESC, created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_err)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
