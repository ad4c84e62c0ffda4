//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `mint` - HTTP transport to the billing platform
//! - `cache` - List cache implementations (in-memory, Redis)

pub mod cache;
pub mod mint;

pub use cache::{InMemoryListCache, RedisListCache};
pub use mint::{MintHttpConfig, MintHttpTransport, MockSubscriptionTransport, TransportCall};
