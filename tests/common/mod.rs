#![allow(dead_code)]

use std::sync::Arc;

use snip::config::{Config, StoreBackend};
use snip::domain::entities::NewShortLink;
use snip::infrastructure::persistence::MemoryLinkStore;
use snip::state::AppState;

pub fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: "http://localhost:5000".to_string(),
        code_length: 6,
        store_backend: StoreBackend::Memory,
        database_url: None,
        redis_url: None,
        instance_id: "test".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        db_max_connections: 10,
        db_connect_timeout: 30,
    }
}

/// State over a fresh in-memory store, one per test.
pub fn create_test_state() -> AppState {
    AppState::new(Arc::new(MemoryLinkStore::new()), &test_config())
}

pub async fn seed_link(state: &AppState, code: &str, url: &str) {
    state
        .store
        .insert(NewShortLink {
            code: code.to_string(),
            long_url: url.to_string(),
        })
        .await
        .unwrap();
}

/// Registers `hits` accesses against a seeded code.
pub async fn record_hits(state: &AppState, code: &str, hits: i64) {
    for _ in 0..hits {
        state.store.increment_access(code).await.unwrap().unwrap();
    }
}
