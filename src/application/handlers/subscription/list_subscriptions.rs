//! ListSubscriptionsHandler - Query handler for a developer's subscriptions.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::foundation::DeveloperId;
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::{accepted_rate_plans_key, ListCache, SubscriptionTransport, LIST_WRAPPER_KEY};

/// Query to list a developer's (or company's) subscriptions.
#[derive(Debug, Clone)]
pub struct ListSubscriptionsQuery {
    pub developer_id: DeveloperId,
}

/// Subscriptions in the order the platform returned them.
pub type ListSubscriptionsResult = Vec<Subscription>;

/// Handler for listing subscriptions.
///
/// The raw list response is cached per developer. Cache failures are logged
/// and the list is served from the transport.
pub struct ListSubscriptionsHandler {
    transport: Arc<dyn SubscriptionTransport>,
    cache: Arc<dyn ListCache>,
}

impl ListSubscriptionsHandler {
    pub fn new(transport: Arc<dyn SubscriptionTransport>, cache: Arc<dyn ListCache>) -> Self {
        Self { transport, cache }
    }

    pub async fn handle(
        &self,
        query: ListSubscriptionsQuery,
    ) -> Result<ListSubscriptionsResult, SubscriptionError> {
        let developer_id = query.developer_id;
        let response = self.fetch_list(&developer_id).await?;

        let records = response
            .get(LIST_WRAPPER_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SubscriptionError::malformed(format!("list response has no '{}' array", LIST_WRAPPER_KEY))
            })?;

        records
            .iter()
            .map(|record| Subscription::from_raw(developer_id.clone(), record))
            .collect()
    }

    async fn fetch_list(&self, developer_id: &DeveloperId) -> Result<Value, SubscriptionError> {
        let key = accepted_rate_plans_key(developer_id);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => tracing::warn!(
                developer_id = %developer_id,
                error = %e,
                "List cache read failed; fetching from billing API"
            ),
        }

        let response = self.transport.list(developer_id).await?;

        if let Err(e) = self.cache.set(&key, &response).await {
            tracing::warn!(
                developer_id = %developer_id,
                error = %e,
                "List cache write failed"
            );
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryListCache, MockSubscriptionTransport, TransportCall};
    use crate::domain::subscription::SubscriptionStatus;
    use crate::ports::{CacheError, TransportError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct FailingCache {
        writes: Mutex<u32>,
    }

    impl FailingCache {
        fn new() -> Self {
            Self {
                writes: Mutex::new(0),
            }
        }

        fn write_attempts(&self) -> u32 {
            *self.writes.lock().unwrap()
        }
    }

    #[async_trait]
    impl ListCache for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<Value>, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: &Value) -> Result<(), CacheError> {
            *self.writes.lock().unwrap() += 1;
            Err(CacheError::Unavailable("connection refused".into()))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn developer() -> DeveloperId {
        DeveloperId::new("dev@example.com").unwrap()
    }

    fn record(id: &str, start: &str, end: Option<&str>) -> Value {
        json!({
            "id": id,
            "startDate": start,
            "endDate": end,
            "ratePlan": {
                "id": "gold",
                "monetizationPackage": { "id": "weather-api" },
                "organization": { "id": "acme", "timezone": "UTC" }
            }
        })
    }

    fn list_response() -> Value {
        json!({
            "developerRatePlan": [
                record("sub-1", "2020-01-01 00:00:00", Some("2020-06-30 00:00:00")),
                record("sub-2", "2020-07-01 00:00:00", None),
                record("sub-3", "2999-01-01 00:00:00", None),
            ],
            "totalRecords": 3
        })
    }

    fn query() -> ListSubscriptionsQuery {
        ListSubscriptionsQuery {
            developer_id: developer(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn loads_each_record_in_order() {
        let transport = Arc::new(MockSubscriptionTransport::new().with_list(list_response()));
        let handler = ListSubscriptionsHandler::new(transport, Arc::new(InMemoryListCache::new()));

        let subscriptions = handler.handle(query()).await.unwrap();

        let ids: Vec<_> = subscriptions
            .iter()
            .map(|s| s.id().unwrap().as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["sub-1", "sub-2", "sub-3"]);

        let statuses: Vec<_> = subscriptions.iter().map(|s| s.status().unwrap()).collect();
        assert_eq!(
            statuses,
            vec![
                SubscriptionStatus::Ended,
                SubscriptionStatus::Active,
                SubscriptionStatus::Future
            ]
        );
    }

    #[tokio::test]
    async fn records_belong_to_queried_developer() {
        let transport = Arc::new(MockSubscriptionTransport::new().with_list(list_response()));
        let handler = ListSubscriptionsHandler::new(transport, Arc::new(InMemoryListCache::new()));

        let subscriptions = handler.handle(query()).await.unwrap();
        assert!(subscriptions.iter().all(|s| s.developer_id() == &developer()));
    }

    #[tokio::test]
    async fn stores_raw_response_on_miss() {
        let transport = Arc::new(MockSubscriptionTransport::new().with_list(list_response()));
        let cache = Arc::new(InMemoryListCache::new());
        let handler = ListSubscriptionsHandler::new(transport, cache.clone());

        handler.handle(query()).await.unwrap();

        let cached = cache
            .get("developer_accepted_rateplan:dev@example.com")
            .await
            .unwrap();
        assert_eq!(cached, Some(list_response()));
    }

    #[tokio::test]
    async fn serves_cached_response_without_transport_call() {
        let transport = Arc::new(MockSubscriptionTransport::new().with_list(list_response()));
        let cache = Arc::new(InMemoryListCache::new());
        let handler = ListSubscriptionsHandler::new(transport.clone(), cache);

        handler.handle(query()).await.unwrap();
        let second = handler.handle(query()).await.unwrap();

        assert_eq!(second.len(), 3);
        assert_eq!(
            transport.calls(),
            vec![TransportCall::List {
                developer_id: developer()
            }]
        );
    }

    #[tokio::test]
    async fn cache_failures_fall_back_to_transport() {
        let transport = Arc::new(MockSubscriptionTransport::new().with_list(list_response()));
        let cache = Arc::new(FailingCache::new());
        let handler = ListSubscriptionsHandler::new(transport.clone(), cache.clone());

        let subscriptions = handler.handle(query()).await.unwrap();

        assert_eq!(subscriptions.len(), 3);
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(cache.write_attempts(), 1);
    }

    #[tokio::test]
    async fn empty_list_yields_no_subscriptions() {
        let transport = Arc::new(MockSubscriptionTransport::new());
        let handler = ListSubscriptionsHandler::new(transport, Arc::new(InMemoryListCache::new()));

        assert!(handler.handle(query()).await.unwrap().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fails_when_wrapper_key_missing() {
        let transport = Arc::new(MockSubscriptionTransport::new().with_list(json!({ "items": [] })));
        let handler = ListSubscriptionsHandler::new(transport, Arc::new(InMemoryListCache::new()));

        let result = handler.handle(query()).await;
        assert!(matches!(result, Err(SubscriptionError::MalformedRecord(_))));
    }

    #[tokio::test]
    async fn surfaces_billing_api_errors() {
        let transport = Arc::new(MockSubscriptionTransport::new().failing_with(
            TransportError::response(404, Some("mint.developerNotFound".into()), "no such developer"),
        ));
        let cache = Arc::new(InMemoryListCache::new());
        let handler = ListSubscriptionsHandler::new(transport, cache.clone());

        let result = handler.handle(query()).await;

        assert!(matches!(result, Err(SubscriptionError::BillingApi { status: 404, .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn surfaces_other_transport_errors_unchanged() {
        let transport = Arc::new(
            MockSubscriptionTransport::new().failing_with(TransportError::network("timed out")),
        );
        let handler = ListSubscriptionsHandler::new(transport, Arc::new(InMemoryListCache::new()));

        let result = handler.handle(query()).await;
        assert_eq!(
            result.unwrap_err(),
            SubscriptionError::Transport(TransportError::network("timed out"))
        );
    }
}
