//! List cache adapters.
//!
//! Implementations of the ListCache port for different backends.
//!
//! ## Available Adapters
//!
//! - `InMemoryListCache` - Process-local, for tests and single-process use
//! - `RedisListCache` - Redis-backed, shared between processes
//!
//! ## Usage
//!
//! ```ignore
//! use rateplan_subscriptions::adapters::cache::{InMemoryListCache, RedisListCache};
//!
//! // For testing
//! let cache = InMemoryListCache::new();
//!
//! // For production
//! let cache = RedisListCache::connect("redis://127.0.0.1/").await?;
//! ```

mod in_memory;
mod redis;

pub use in_memory::InMemoryListCache;
pub use redis::RedisListCache;
