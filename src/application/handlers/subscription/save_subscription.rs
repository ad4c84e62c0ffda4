//! SaveSubscriptionHandler - Command handler for creating or updating subscriptions.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::subscription::{PayloadKind, SaveMode, Subscription, SubscriptionError};
use crate::ports::SubscriptionTransport;

/// Command to write a subscription to the billing platform.
#[derive(Debug, Clone)]
pub struct SaveSubscriptionCommand {
    pub subscription: Subscription,
    pub mode: SaveMode,
}

impl SaveSubscriptionCommand {
    /// Builds a command from a textual save method (`"create"` or `"update"`).
    pub fn parse(subscription: Subscription, mode: &str) -> Result<Self, SubscriptionError> {
        Ok(Self {
            subscription,
            mode: mode.parse()?,
        })
    }
}

/// Result of a successful write.
#[derive(Debug, Clone)]
pub struct SaveSubscriptionResult {
    /// The subscription with any fields the platform returned applied.
    pub subscription: Subscription,
}

/// Handler for creating and updating subscriptions.
pub struct SaveSubscriptionHandler {
    transport: Arc<dyn SubscriptionTransport>,
}

impl SaveSubscriptionHandler {
    pub fn new(transport: Arc<dyn SubscriptionTransport>) -> Self {
        Self { transport }
    }

    pub async fn handle(
        &self,
        cmd: SaveSubscriptionCommand,
    ) -> Result<SaveSubscriptionResult, SubscriptionError> {
        let subscription = cmd.subscription;
        let payload = subscription.payload(PayloadKind::from(cmd.mode))?;
        let developer_id = subscription.developer_id();

        let response = match cmd.mode {
            SaveMode::Create => self.transport.create(developer_id, &payload).await?,
            SaveMode::Update => {
                let id = subscription.id().ok_or(SubscriptionError::MissingId)?;
                self.transport.update(developer_id, id, &payload).await?
            }
        };

        Ok(SaveSubscriptionResult {
            subscription: apply_response(subscription, &response),
        })
    }
}

/// Applies the record returned by a write, keeping the local state when the
/// response is empty or cannot be loaded.
pub(super) fn apply_response(subscription: Subscription, response: &Value) -> Subscription {
    if !response.as_object().is_some_and(|record| !record.is_empty()) {
        return subscription;
    }

    let mut updated = subscription.clone();
    match updated.load_from_raw(response, false) {
        Ok(()) => updated,
        Err(e) => {
            tracing::warn!(
                developer_id = %subscription.developer_id(),
                error = %e,
                "Could not apply billing API response; keeping local subscription"
            );
            subscription
        }
    }
}
