//! DeleteSubscriptionHandler - Command handler for deleting subscriptions.

use std::sync::Arc;

use crate::domain::foundation::SubscriptionId;
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionTransport;

/// Command to delete a subscription. The subscription must carry an id.
#[derive(Debug, Clone)]
pub struct DeleteSubscriptionCommand {
    pub subscription: Subscription,
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSubscriptionResult {
    pub subscription_id: SubscriptionId,
}

/// Handler for deleting subscriptions.
pub struct DeleteSubscriptionHandler {
    transport: Arc<dyn SubscriptionTransport>,
}

impl DeleteSubscriptionHandler {
    pub fn new(transport: Arc<dyn SubscriptionTransport>) -> Self {
        Self { transport }
    }

    pub async fn handle(
        &self,
        cmd: DeleteSubscriptionCommand,
    ) -> Result<DeleteSubscriptionResult, SubscriptionError> {
        let subscription_id = cmd
            .subscription
            .id()
            .cloned()
            .ok_or(SubscriptionError::MissingId)?;

        self.transport
            .delete(cmd.subscription.developer_id(), &subscription_id)
            .await?;

        tracing::info!(
            developer_id = %cmd.subscription.developer_id(),
            subscription_id = %subscription_id,
            "Subscription deleted"
        );

        Ok(DeleteSubscriptionResult { subscription_id })
    }
}
