//! Integration tests for the HTTP subscription transport
//!
//! Runs the reqwest transport against a wiremock billing API and checks the
//! request layout, error decoding and the handlers built on top of it.

use rateplan_subscriptions::adapters::{InMemoryListCache, MintHttpConfig, MintHttpTransport};
use rateplan_subscriptions::application::{
    DeleteSubscriptionCommand, DeleteSubscriptionHandler, ForceSaveSubscriptionCommand,
    ForceSaveSubscriptionHandler, ListSubscriptionsHandler, ListSubscriptionsQuery,
    SaveSubscriptionCommand, SaveSubscriptionHandler,
};
use rateplan_subscriptions::domain::foundation::{DeveloperId, SubscriptionId};
use rateplan_subscriptions::domain::subscription::{PayloadKind, Subscription, SubscriptionError};
use rateplan_subscriptions::ports::{SubscriptionTransport, TransportError};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEVELOPERS: &str = "/v1/mint/organizations/acme/developers";

// ============================================================================
// Helpers
// ============================================================================

fn transport(server: &MockServer) -> MintHttpTransport {
    MintHttpTransport::new(
        MintHttpConfig::new(format!("{}/v1", server.uri()), "acme")
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn developer() -> DeveloperId {
    DeveloperId::new("dev@example.com").unwrap()
}

fn record(id: &str, start: &str) -> Value {
    json!({
        "id": id,
        "startDate": start,
        "endDate": null,
        "developer": { "id": "dev@example.com" },
        "ratePlan": {
            "id": "gold",
            "monetizationPackage": { "id": "weather-api" },
            "organization": { "id": "acme", "timezone": "America/Los_Angeles" }
        }
    })
}

fn loaded(id: &str) -> Subscription {
    Subscription::from_raw(developer(), &record(id, "2024-01-01 00:00:00")).unwrap()
}

// ============================================================================
// Request layout
// ============================================================================

#[tokio::test]
async fn list_gets_accepted_rate_plans() {
    let server = MockServer::start().await;
    let body = json!({ "developerRatePlan": [record("sub-1", "2024-01-01 00:00:00")] });
    Mock::given(method("GET"))
        .and(path(format!("{}/dev@example.com/developer-accepted-rateplans", DEVELOPERS)))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let response = transport(&server).list(&developer()).await.unwrap();
    assert_eq!(response, body);
}

#[tokio::test]
async fn load_gets_single_record_with_encoded_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!(
            "{}/team%20blue/developer-accepted-rateplans/sub%2F1",
            DEVELOPERS
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("sub/1", "2024-01-01 00:00:00")))
        .expect(1)
        .mount(&server)
        .await;

    let response = transport(&server)
        .load(
            &DeveloperId::new("team blue").unwrap(),
            &SubscriptionId::new("sub/1").unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response["id"], json!("sub/1"));
}

#[tokio::test]
async fn create_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/dev@example.com/developer-rateplans", DEVELOPERS)))
        .and(body_json(json!({
            "developer": { "id": "dev@example.com" },
            "startDate": "2024-01-01 00:00:00",
            "endDate": null,
            "ratePlan": { "id": "gold" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "sub-new" })))
        .expect(1)
        .mount(&server)
        .await;

    let subscription = Subscription::from_raw(
        developer(),
        &json!({
            "startDate": "2024-01-01 13:45:00",
            "ratePlan": record("", "")["ratePlan"].clone()
        }),
    )
    .unwrap();
    let cmd = SaveSubscriptionCommand::parse(subscription, "create").unwrap();

    let result = SaveSubscriptionHandler::new(Arc::new(transport(&server)))
        .handle(cmd)
        .await
        .unwrap();
    assert_eq!(result.subscription.id().unwrap().as_str(), "sub-new");
}

#[tokio::test]
async fn update_puts_payload_with_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/dev@example.com/developer-rateplans/sub-1", DEVELOPERS)))
        .and(body_json(json!({
            "developer": { "id": "dev@example.com" },
            "startDate": "2024-01-01 00:00:00",
            "endDate": null,
            "ratePlan": { "id": "gold" },
            "id": "sub-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(record("sub-1", "2024-01-01 00:00:00")))
        .expect(1)
        .mount(&server)
        .await;

    let cmd = SaveSubscriptionCommand::parse(loaded("sub-1"), "update").unwrap();
    SaveSubscriptionHandler::new(Arc::new(transport(&server)))
        .handle(cmd)
        .await
        .unwrap();
}

#[tokio::test]
async fn force_save_posts_suppress_warning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/dev@example.com/developer-rateplans", DEVELOPERS)))
        .and(body_json(json!({
            "developer": { "id": "dev@example.com" },
            "startDate": "2024-01-01 00:00:00",
            "endDate": null,
            "ratePlan": { "id": "gold" },
            "suppressWarning": true
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let result = ForceSaveSubscriptionHandler::new(Arc::new(transport(&server)))
        .handle(ForceSaveSubscriptionCommand {
            subscription: loaded("sub-1"),
        })
        .await
        .unwrap();
    assert_eq!(result.subscription.id().unwrap().as_str(), "sub-1");
}

#[tokio::test]
async fn delete_sends_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/dev@example.com/developer-rateplans/sub-1", DEVELOPERS)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = DeleteSubscriptionHandler::new(Arc::new(transport(&server)))
        .handle(DeleteSubscriptionCommand {
            subscription: loaded("sub-1"),
        })
        .await
        .unwrap();
    assert_eq!(result.subscription_id.as_str(), "sub-1");
}

// ============================================================================
// Error decoding
// ============================================================================

#[tokio::test]
async fn platform_error_code_becomes_billing_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "mint.developerHasFollowingOverlapRatePlans",
            "message": "Developer has following overlap rate plans: silver",
            "contexts": []
        })))
        .mount(&server)
        .await;

    let cmd = SaveSubscriptionCommand::parse(loaded("sub-1"), "create").unwrap();
    let result = SaveSubscriptionHandler::new(Arc::new(transport(&server)))
        .handle(cmd)
        .await;

    assert_eq!(
        result.unwrap_err(),
        SubscriptionError::BillingApi {
            status: 400,
            code: "mint.developerHasFollowingOverlapRatePlans".into(),
            message: "Developer has following overlap rate plans: silver".into(),
        }
    );
}

#[tokio::test]
async fn other_errors_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&server)
        .await;

    let err = transport(&server).list(&developer()).await.unwrap_err();
    assert_eq!(err, TransportError::response(502, None, "Bad gateway"));

    let handler = ListSubscriptionsHandler::new(
        Arc::new(transport(&server)),
        Arc::new(InMemoryListCache::new()),
    );
    let result = handler
        .handle(ListSubscriptionsQuery {
            developer_id: developer(),
        })
        .await;
    assert_eq!(result.unwrap_err(), SubscriptionError::Transport(err));
}

#[tokio::test]
async fn invalid_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"developerRatePlan\": ["))
        .mount(&server)
        .await;

    let err = transport(&server).list(&developer()).await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let server = MockServer::start().await;
    let unreachable = transport(&server);
    drop(server);

    let err = unreachable.list(&developer()).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn list_handler_caches_http_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/dev@example.com/developer-accepted-rateplans", DEVELOPERS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "developerRatePlan": [
                record("sub-1", "2020-01-01 00:00:00"),
                record("sub-2", "2999-01-01 00:00:00")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = ListSubscriptionsHandler::new(
        Arc::new(transport(&server)),
        Arc::new(InMemoryListCache::new()),
    );
    let query = || ListSubscriptionsQuery {
        developer_id: developer(),
    };

    let first = handler.handle(query()).await.unwrap();
    let second = handler.handle(query()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert!(!first[0].is_cancelable().unwrap());
    assert!(first[1].is_cancelable().unwrap());
    assert!(first[1].payload(PayloadKind::Update).is_ok());
}
