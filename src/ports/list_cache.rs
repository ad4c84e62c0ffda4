//! List cache port.
//!
//! Key/value store for raw list responses, injected into the list handler
//! rather than reached through a process-wide singleton.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::{DeveloperId, DomainError, ErrorCode};

/// Cache port for raw list responses.
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Returns the cached value, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    /// Stores a value under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &Value) -> Result<(), CacheError>;
}

/// Cache key holding a developer's accepted rate plans.
pub fn accepted_rate_plans_key(developer_id: &DeveloperId) -> String {
    format!("developer_accepted_rateplan:{}", developer_id)
}

/// Errors from cache implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization failed: {0}")]
    Serialization(String),
}

impl From<CacheError> for DomainError {
    fn from(err: CacheError) -> Self {
        DomainError::new(ErrorCode::CacheError, err.to_string())
    }
}
