//! ForceSaveSubscriptionHandler - Command handler for creating a subscription
//! while suppressing platform warnings.

use std::sync::Arc;

use crate::domain::subscription::{PayloadKind, Subscription, SubscriptionError};
use crate::ports::SubscriptionTransport;

use super::save_subscription::apply_response;

/// Command to create a subscription with `suppressWarning` set.
#[derive(Debug, Clone)]
pub struct ForceSaveSubscriptionCommand {
    pub subscription: Subscription,
}

/// Result of a successful force save.
#[derive(Debug, Clone)]
pub struct ForceSaveSubscriptionResult {
    pub subscription: Subscription,
}

/// Handler for force saves.
///
/// Used when the platform would otherwise warn, e.g. about a plan that
/// overlaps one the developer already accepted.
pub struct ForceSaveSubscriptionHandler {
    transport: Arc<dyn SubscriptionTransport>,
}

impl ForceSaveSubscriptionHandler {
    pub fn new(transport: Arc<dyn SubscriptionTransport>) -> Self {
        Self { transport }
    }

    pub async fn handle(
        &self,
        cmd: ForceSaveSubscriptionCommand,
    ) -> Result<ForceSaveSubscriptionResult, SubscriptionError> {
        let subscription = cmd.subscription;
        let payload = subscription.payload(PayloadKind::ForceSave)?;

        let response = self
            .transport
            .create(subscription.developer_id(), &payload)
            .await?;

        Ok(ForceSaveSubscriptionResult {
            subscription: apply_response(subscription, &response),
        })
    }
}
