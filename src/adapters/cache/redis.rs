//! Redis-backed list cache for deployments sharing one cache.
//!
//! Values are stored as JSON strings under the caller's key.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde_json::Value;

use crate::ports::{CacheError, ListCache};

/// Redis list cache over a multiplexed connection.
#[derive(Clone)]
pub struct RedisListCache {
    conn: MultiplexedConnection,
    ttl_secs: Option<u64>,
}

impl RedisListCache {
    /// Create a cache over an existing connection. Entries never expire.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn, ttl_secs: None }
    }

    /// Open a connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn))
    }

    /// Expire entries after `ttl_secs`.
    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }
}

fn decode(raw: &str) -> Result<Value, CacheError> {
    serde_json::from_str(raw).map_err(|e| CacheError::Serialization(e.to_string()))
}

fn encode(value: &Value) -> Result<String, CacheError> {
    serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))
}

#[async_trait]
impl ListCache for RedisListCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))?;

        raw.as_deref().map(decode).transpose()
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        let encoded = encode(value)?;
        let mut conn = self.conn.clone();

        conn.set::<_, _, ()>(key, encoded)
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))?;

        if let Some(ttl) = self.ttl_secs {
            conn.expire::<_, ()>(key, ttl as i64)
                .await
                .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))?;
        }
        Ok(())
    }
}
