//! List cache configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Which list cache backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local cache
    #[default]
    Memory,
    /// Shared Redis cache
    Redis,
}

/// List cache configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL, required for the Redis backend
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Entry lifetime in seconds for the Redis backend; entries persist when unset
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend != CacheBackend::Redis {
            return Ok(());
        }
        let url = self
            .redis_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ValidationError::MissingRequired("CACHE__REDIS_URL"))?;
        if !url.starts_with("redis://") && !url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        Ok(())
    }
}
