//! Concrete link store implementations.
//!
//! One [`crate::domain::store::LinkStore`] implementation per backend, plus
//! the factory that picks one from the runtime configuration.
//!
//! # Stores
//!
//! - [`PgLinkStore`] - PostgreSQL, durable, constraint-backed uniqueness
//! - [`RedisLinkStore`] - Redis, script-backed atomicity
//! - [`MemoryLinkStore`] - in-process hash map for tests and local runs

pub mod memory_store;
pub mod pg_store;
pub mod redis_store;

pub use memory_store::MemoryLinkStore;
pub use pg_store::PgLinkStore;
pub use redis_store::RedisLinkStore;

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::domain::store::LinkStore;
use anyhow::Context;
use tracing::info;

/// Builds the link store selected by `config.store_backend`.
///
/// # Errors
///
/// Returns an error if the selected backend has no connection URL configured
/// or the backend cannot be reached.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn LinkStore>> {
    let store: Arc<dyn LinkStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("postgres backend selected but no database URL configured")?;

            let store = PgLinkStore::connect(
                database_url,
                config.db_max_connections,
                config.db_connect_timeout,
            )
            .await
            .context("Failed to connect to PostgreSQL")?;

            Arc::new(store)
        }
        StoreBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis backend selected but no Redis URL configured")?;

            let store = RedisLinkStore::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;

            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store, data will not survive a restart");
            Arc::new(MemoryLinkStore::new())
        }
    };

    Ok(store)
}
