//! Subscription handlers.
//!
//! Command and query handlers for developer rate plan subscriptions:
//!
//! ## Commands
//! - Creating or updating a subscription
//! - Force-saving a subscription with platform warnings suppressed
//! - Deleting a subscription
//!
//! ## Queries
//! - Listing a developer's subscriptions (cached)
//! - Loading one subscription
//! - Resolving a subscription's status view

mod delete_subscription;
mod force_save_subscription;
mod get_subscription;
mod get_subscription_status;
mod list_subscriptions;
mod save_subscription;

// Commands
pub use delete_subscription::{
    DeleteSubscriptionCommand, DeleteSubscriptionHandler, DeleteSubscriptionResult,
};
pub use force_save_subscription::{
    ForceSaveSubscriptionCommand, ForceSaveSubscriptionHandler, ForceSaveSubscriptionResult,
};
pub use save_subscription::{SaveSubscriptionCommand, SaveSubscriptionHandler, SaveSubscriptionResult};

// Queries
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, GetSubscriptionResult};
pub use get_subscription_status::{
    GetSubscriptionStatusHandler, GetSubscriptionStatusQuery, SubscriptionStatusView,
};
pub use list_subscriptions::{
    ListSubscriptionsHandler, ListSubscriptionsQuery, ListSubscriptionsResult,
};
