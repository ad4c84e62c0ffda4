//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SubscriptionTransport` - Remote billing API carrying developer rate plan records
//! - `ListCache` - Key/value cache for raw list responses

mod list_cache;
mod subscription_transport;

pub use list_cache::{accepted_rate_plans_key, CacheError, ListCache};
pub use subscription_transport::{
    is_billing_error_code, SubscriptionTransport, TransportError, BILLING_ERROR_CODE_PREFIX,
    LIST_WRAPPER_KEY,
};
