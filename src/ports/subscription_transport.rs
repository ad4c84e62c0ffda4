//! Subscription transport port.
//!
//! Defines the contract for moving developer rate plan records to and from
//! the remote billing platform. Records travel as raw JSON; shaping them into
//! [`Subscription`](crate::domain::subscription::Subscription) entities is the
//! domain's job.
//!
//! # Design
//!
//! - **Single attempt**: implementations do not retry
//! - **Raw records**: responses are returned undecoded as `serde_json::Value`
//! - **Scoped by developer**: every call is addressed under one developer or company
//!
//! # Example
//!
//! ```ignore
//! async fn first_record(
//!     transport: &dyn SubscriptionTransport,
//!     developer_id: &DeveloperId,
//! ) -> Result<Option<Value>, TransportError> {
//!     let response = transport.list(developer_id).await?;
//!     Ok(response["developerRatePlan"].get(0).cloned())
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::{DeveloperId, DomainError, ErrorCode, SubscriptionId};
use crate::domain::subscription::SubscriptionPayload;

/// Error codes issued by the billing platform share this prefix.
pub const BILLING_ERROR_CODE_PREFIX: &str = "mint.";

/// Key wrapping the records of a list response.
pub const LIST_WRAPPER_KEY: &str = "developerRatePlan";

/// Transport port for developer rate plan records.
#[async_trait]
pub trait SubscriptionTransport: Send + Sync {
    /// Fetch the list response for a developer.
    ///
    /// The response wraps the records under [`LIST_WRAPPER_KEY`].
    async fn list(&self, developer_id: &DeveloperId) -> Result<Value, TransportError>;

    /// Fetch a single record by id.
    async fn load(
        &self,
        developer_id: &DeveloperId,
        id: &SubscriptionId,
    ) -> Result<Value, TransportError>;

    /// Create a record. Also used for force saves.
    async fn create(
        &self,
        developer_id: &DeveloperId,
        payload: &SubscriptionPayload,
    ) -> Result<Value, TransportError>;

    /// Replace an existing record.
    async fn update(
        &self,
        developer_id: &DeveloperId,
        id: &SubscriptionId,
        payload: &SubscriptionPayload,
    ) -> Result<Value, TransportError>;

    /// Delete a record.
    async fn delete(&self, developer_id: &DeveloperId, id: &SubscriptionId) -> Result<(), TransportError>;
}

/// Failures reported by a transport implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The platform answered with a non-success status.
    #[error("Billing API responded {status}: {message}")]
    Response {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never completed.
    #[error("Billing API unreachable: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Invalid billing API response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn response(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        TransportError::Response {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        TransportError::Decode(message.into())
    }

    /// The platform error code, if it is one the billing platform issues.
    pub fn billing_code(&self) -> Option<&str> {
        match self {
            TransportError::Response { code: Some(code), .. } if is_billing_error_code(code) => {
                Some(code.as_str())
            }
            _ => None,
        }
    }
}

/// Returns true for error codes issued by the billing platform itself.
pub fn is_billing_error_code(code: &str) -> bool {
    code.len() > BILLING_ERROR_CODE_PREFIX.len() && code.starts_with(BILLING_ERROR_CODE_PREFIX)
}

impl From<TransportError> for DomainError {
    fn from(err: TransportError) -> Self {
        let code = match (&err, err.billing_code()) {
            (_, Some(_)) => ErrorCode::BillingApiError,
            (TransportError::Response { status: 404, .. }, None) => ErrorCode::SubscriptionNotFound,
            _ => ErrorCode::TransportError,
        };
        let domain = DomainError::new(code, err.to_string());
        match &err {
            TransportError::Response { status, code, .. } => {
                let domain = domain.with_detail("status", status.to_string());
                match code {
                    Some(code) => domain.with_detail("code", code.clone()),
                    None => domain,
                }
            }
            _ => domain,
        }
    }
}
