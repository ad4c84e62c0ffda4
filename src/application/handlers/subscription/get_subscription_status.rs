//! GetSubscriptionStatusHandler - Query handler for a subscription's
//! lifecycle status and organization-local dates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::{DeveloperId, OrgDateTime, SubscriptionId};
use crate::domain::subscription::{Subscription, SubscriptionError, SubscriptionStatus};
use crate::ports::SubscriptionTransport;

/// Query for a subscription's status.
#[derive(Debug, Clone)]
pub struct GetSubscriptionStatusQuery {
    pub developer_id: DeveloperId,
    pub subscription_id: SubscriptionId,
    /// Evaluate as of this instant instead of the current clock.
    pub as_of: Option<DateTime<Utc>>,
}

/// Status view of one subscription.
///
/// Dates are canonical organization-local strings; `end_date` is the
/// effective end date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusView {
    pub subscription_id: Option<String>,
    pub developer_id: String,
    pub rate_plan_id: String,
    pub status: SubscriptionStatus,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub renewal_date: Option<String>,
    pub next_recurring_fee_date: Option<String>,
    /// False when the subscription has started or has no start date.
    pub cancelable: bool,
}

impl SubscriptionStatusView {
    /// Builds the view as of `now`.
    pub fn from_subscription(
        subscription: &Subscription,
        now: DateTime<Utc>,
    ) -> Result<Self, SubscriptionError> {
        let rate_plan = subscription
            .rate_plan()
            .ok_or(SubscriptionError::MissingRatePlan)?;
        let status = subscription.status_at(now)?;
        let cancelable = match subscription.is_cancelable_at(now) {
            Ok(cancelable) => cancelable,
            Err(SubscriptionError::MissingStartDate) => false,
            Err(e) => return Err(e),
        };
        let canonical = |date: Option<OrgDateTime>| date.map(|d| d.to_canonical());

        Ok(Self {
            subscription_id: subscription.id().map(|id| id.to_string()),
            developer_id: subscription.developer_id().to_string(),
            rate_plan_id: rate_plan.id().to_string(),
            status,
            start_date: canonical(subscription.start_date_time()),
            end_date: canonical(subscription.end_date_time_at(now)?),
            renewal_date: canonical(subscription.renewal_date_time()),
            next_recurring_fee_date: canonical(subscription.next_recurring_fee_date_time()),
            cancelable,
        })
    }
}

/// Handler for subscription status queries.
pub struct GetSubscriptionStatusHandler {
    transport: Arc<dyn SubscriptionTransport>,
}

impl GetSubscriptionStatusHandler {
    pub fn new(transport: Arc<dyn SubscriptionTransport>) -> Self {
        Self { transport }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionStatusQuery,
    ) -> Result<SubscriptionStatusView, SubscriptionError> {
        let record = self
            .transport
            .load(&query.developer_id, &query.subscription_id)
            .await?;

        let mut subscription = Subscription::from_raw(query.developer_id, &record)?;
        if subscription.id().is_none() {
            subscription.set_id(query.subscription_id);
        }

        SubscriptionStatusView::from_subscription(&subscription, query.as_of.unwrap_or_else(Utc::now))
    }
}
