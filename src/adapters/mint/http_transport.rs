//! HTTP transport for developer rate plan records.
//!
//! Implements the `SubscriptionTransport` trait against the billing
//! platform's management API. Every call is a single attempt; the only
//! policy applied here is the request timeout.
//!
//! # Resource layout
//!
//! ```text
//! GET    {base}/mint/organizations/{org}/developers/{dev}/developer-accepted-rateplans
//! GET    {base}/mint/organizations/{org}/developers/{dev}/developer-accepted-rateplans/{id}
//! POST   {base}/mint/organizations/{org}/developers/{dev}/developer-rateplans
//! PUT    {base}/mint/organizations/{org}/developers/{dev}/developer-rateplans/{id}
//! DELETE {base}/mint/organizations/{org}/developers/{dev}/developer-rateplans/{id}
//! ```

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::domain::foundation::{DeveloperId, SubscriptionId};
use crate::domain::subscription::SubscriptionPayload;
use crate::ports::{SubscriptionTransport, TransportError};

const ACCEPTED_RATE_PLANS: &str = "developer-accepted-rateplans";
const RATE_PLANS: &str = "developer-rateplans";

/// Connection settings for the billing platform.
#[derive(Debug, Clone)]
pub struct MintHttpConfig {
    /// Management API base URL, e.g. `https://api.example.com/v1`.
    pub base_url: String,

    /// Organization every request is scoped to.
    pub organization: String,

    pub timeout: Duration,
}

impl MintHttpConfig {
    pub fn new(base_url: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            organization: organization.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error body returned by the billing platform.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// reqwest-backed subscription transport.
pub struct MintHttpTransport {
    base_url: Url,
    organization: String,
    http_client: reqwest::Client,
}

impl MintHttpTransport {
    /// Create a transport for the given configuration.
    pub fn new(config: MintHttpConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TransportError::network(format!("Invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::network(format!(
                "Base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::network(e.to_string()))?;

        Ok(Self {
            base_url,
            organization: config.organization,
            http_client,
        })
    }

    /// Builds an endpoint URL, percent-encoding each path segment.
    fn endpoint(
        &self,
        developer_id: &DeveloperId,
        collection: &str,
        id: Option<&SubscriptionId>,
    ) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TransportError::network("Base URL cannot carry a path"))?;
            segments.pop_if_empty().extend([
                "mint",
                "organizations",
                self.organization.as_str(),
                "developers",
                developer_id.as_str(),
                collection,
            ]);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Option<&SubscriptionPayload>,
    ) -> Result<Value, TransportError> {
        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "Billing API request failed");
            TransportError::network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        if !status.is_success() {
            let err = error_from_body(status, &body);
            if let TransportError::Response { status, code, message } = &err {
                tracing::warn!(
                    method = %method,
                    url = %url,
                    status,
                    code = code.as_deref().unwrap_or(""),
                    message = %message,
                    "Billing API returned an error"
                );
            }
            return Err(err);
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| TransportError::decode(e.to_string()))
    }
}

fn error_from_body(status: StatusCode, body: &[u8]) -> TransportError {
    let fallback = || {
        let text = String::from_utf8_lossy(body).trim().to_string();
        if text.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            text
        }
    };

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => {
            let message = parsed.message.unwrap_or_else(fallback);
            TransportError::response(status.as_u16(), parsed.code, message)
        }
        Err(_) => TransportError::response(status.as_u16(), None, fallback()),
    }
}

#[async_trait]
impl SubscriptionTransport for MintHttpTransport {
    async fn list(&self, developer_id: &DeveloperId) -> Result<Value, TransportError> {
        let url = self.endpoint(developer_id, ACCEPTED_RATE_PLANS, None)?;
        self.send(Method::GET, url, None).await
    }

    async fn load(
        &self,
        developer_id: &DeveloperId,
        id: &SubscriptionId,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint(developer_id, ACCEPTED_RATE_PLANS, Some(id))?;
        self.send(Method::GET, url, None).await
    }

    async fn create(
        &self,
        developer_id: &DeveloperId,
        payload: &SubscriptionPayload,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint(developer_id, RATE_PLANS, None)?;
        self.send(Method::POST, url, Some(payload)).await
    }

    async fn update(
        &self,
        developer_id: &DeveloperId,
        id: &SubscriptionId,
        payload: &SubscriptionPayload,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint(developer_id, RATE_PLANS, Some(id))?;
        self.send(Method::PUT, url, Some(payload)).await
    }

    async fn delete(&self, developer_id: &DeveloperId, id: &SubscriptionId) -> Result<(), TransportError> {
        let url = self.endpoint(developer_id, RATE_PLANS, Some(id))?;
        self.send(Method::DELETE, url, None).await.map(|_| ())
    }
}
