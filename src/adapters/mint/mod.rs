//! Billing platform adapters.
//!
//! - `MintHttpTransport` - reqwest implementation of `SubscriptionTransport`
//! - `MockSubscriptionTransport` - Configurable mock for testing

mod http_transport;
mod mock_transport;

pub use http_transport::{MintHttpConfig, MintHttpTransport};
pub use mock_transport::{MockSubscriptionTransport, TransportCall};
