//! GetSubscriptionHandler - Query handler for a single subscription.

use std::sync::Arc;

use crate::domain::foundation::{DeveloperId, SubscriptionId};
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionTransport;

/// Query to load one subscription by id.
#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub developer_id: DeveloperId,
    pub subscription_id: SubscriptionId,
}

pub type GetSubscriptionResult = Subscription;

/// Handler for loading a single subscription.
pub struct GetSubscriptionHandler {
    transport: Arc<dyn SubscriptionTransport>,
}

impl GetSubscriptionHandler {
    pub fn new(transport: Arc<dyn SubscriptionTransport>) -> Self {
        Self { transport }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionQuery,
    ) -> Result<GetSubscriptionResult, SubscriptionError> {
        let record = self
            .transport
            .load(&query.developer_id, &query.subscription_id)
            .await?;

        let mut subscription = Subscription::from_raw(query.developer_id, &record)?;
        if subscription.id().is_none() {
            subscription.set_id(query.subscription_id);
        }
        Ok(subscription)
    }
}
