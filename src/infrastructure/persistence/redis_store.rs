//! Redis implementation of the link store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands, Client, Script};
use tracing::info;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::store::{LinkStore, StoreError};

/// Sorted set of codes scored by access count.
const HITS_KEY: &str = "links:hits";
/// Running total of accesses across all links.
const TOTAL_HITS_KEY: &str = "links:total_hits";

/// Claims the code and the long URL in one atomic step.
///
/// KEYS: link hash, url index key, hits zset.
/// ARGV: code, long URL, created_at.
const INSERT_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 'code'
end
if not redis.call('SET', KEYS[2], ARGV[1], 'NX') then
  return 'url'
end
redis.call('HSET', KEYS[1], 'long_url', ARGV[2], 'access_count', 0, 'created_at', ARGV[3])
redis.call('ZADD', KEYS[3], 0, ARGV[1])
return 'ok'
";

/// Bumps all access counters for a code and returns its fields.
///
/// KEYS: link hash, hits zset, total hits counter.
/// ARGV: code.
const INCREMENT_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return false
end
local count = redis.call('HINCRBY', KEYS[1], 'access_count', 1)
redis.call('ZINCRBY', KEYS[2], 1, ARGV[1])
redis.call('INCR', KEYS[3])
local url = redis.call('HGET', KEYS[1], 'long_url')
local created = redis.call('HGET', KEYS[1], 'created_at')
return {url, count, created}
";

/// Link store backed by Redis.
///
/// Each link lives in a `link:{code}` hash, with a `url:{long_url}` index key
/// for reverse lookups and a sorted set ranking codes by access count.
/// Multi-key writes go through Lua scripts so uniqueness checks and counter
/// bumps stay atomic under concurrent requests.
pub struct RedisLinkStore {
    conn: ConnectionManager,
    insert_script: Script,
    increment_script: Script,
}

impl RedisLinkStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Unavailable(format!("Failed to create Redis client: {e}"))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to connect to Redis: {e}")))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis PING failed: {e}")))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            conn: manager,
            insert_script: Script::new(INSERT_SCRIPT),
            increment_script: Script::new(INCREMENT_SCRIPT),
        })
    }

    fn link_key(code: &str) -> String {
        format!("link:{code}")
    }

    fn url_key(long_url: &str) -> String {
        format!("url:{long_url}")
    }
}

fn store_err(e: redis::RedisError) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn parse_created_at(code: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Unavailable(format!("malformed created_at for {code}: {e}")))
}

fn link_from_hash(code: &str, mut hash: HashMap<String, String>) -> Result<ShortLink, StoreError> {
    let long_url = hash
        .remove("long_url")
        .ok_or_else(|| StoreError::Unavailable(format!("missing long_url for {code}")))?;
    let access_count = hash
        .remove("access_count")
        .and_then(|raw| raw.parse::<i64>().ok())
        .ok_or_else(|| StoreError::Unavailable(format!("malformed access_count for {code}")))?;
    let created_at = match hash.remove("created_at") {
        Some(raw) => parse_created_at(code, &raw)?,
        None => return Err(StoreError::Unavailable(format!("missing created_at for {code}"))),
    };

    Ok(ShortLink::new(
        code.to_string(),
        long_url,
        access_count,
        created_at,
    ))
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        let mut conn = self.conn.clone();

        let hash: HashMap<String, String> = conn
            .hgetall(Self::link_key(code))
            .await
            .map_err(store_err)?;

        if hash.is_empty() {
            return Ok(None);
        }

        link_from_hash(code, hash).map(Some)
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortLink>, StoreError> {
        let mut conn = self.conn.clone();

        let code: Option<String> = conn
            .get(Self::url_key(long_url))
            .await
            .map_err(store_err)?;

        match code {
            Some(code) => self.find_by_code(&code).await,
            None => Ok(None),
        }
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        conn.exists(Self::link_key(code)).await.map_err(store_err)
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        let mut conn = self.conn.clone();
        let created_at = Utc::now();

        let reply: String = self
            .insert_script
            .key(Self::link_key(&new_link.code))
            .key(Self::url_key(&new_link.long_url))
            .key(HITS_KEY)
            .arg(&new_link.code)
            .arg(&new_link.long_url)
            .arg(created_at.to_rfc3339())
            .invoke_async(&mut conn)
            .await
            .map_err(store_err)?;

        match reply.as_str() {
            "ok" => Ok(ShortLink::new(new_link.code, new_link.long_url, 0, created_at)),
            "code" => Err(StoreError::CodeExists),
            "url" => Err(StoreError::UrlExists),
            other => Err(StoreError::Unavailable(format!(
                "unexpected insert reply: {other}"
            ))),
        }
    }

    async fn increment_access(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        let mut conn = self.conn.clone();

        let reply: Option<(String, i64, String)> = self
            .increment_script
            .key(Self::link_key(code))
            .key(HITS_KEY)
            .key(TOTAL_HITS_KEY)
            .arg(code)
            .invoke_async(&mut conn)
            .await
            .map_err(store_err)?;

        match reply {
            Some((long_url, access_count, created_at)) => Ok(Some(ShortLink::new(
                code.to_string(),
                long_url,
                access_count,
                parse_created_at(code, &created_at)?,
            ))),
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        conn.zcard(HITS_KEY).await.map_err(store_err)
    }

    async fn sum_access(&self) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let total: Option<i64> = conn.get(TOTAL_HITS_KEY).await.map_err(store_err)?;
        Ok(total.unwrap_or(0))
    }

    async fn top_accessed(&self, limit: i64) -> Result<Vec<ShortLink>, StoreError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();

        let window: Vec<(String, f64)> = conn
            .zrevrange_withscores(HITS_KEY, 0, (limit - 1) as isize)
            .await
            .map_err(store_err)?;

        let Some(&(_, cutoff)) = window.last() else {
            return Ok(Vec::new());
        };

        // Pull in every code tied at the cutoff score so creation time can
        // break the tie instead of arbitrary zset member order.
        let mut codes: Vec<String> = window
            .iter()
            .filter(|(_, score)| *score > cutoff)
            .map(|(code, _)| code.clone())
            .collect();
        let at_cutoff: Vec<String> = conn
            .zrangebyscore(HITS_KEY, cutoff, cutoff)
            .await
            .map_err(store_err)?;
        codes.extend(at_cutoff);

        let mut links = Vec::with_capacity(codes.len());
        for code in codes {
            if let Some(link) = self.find_by_code(&code).await? {
                links.push(link);
            }
        }

        links.sort_by(|a, b| {
            b.access_count
                .cmp(&a.access_count)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        links.truncate(limit as usize);

        Ok(links)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.map_err(store_err)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
