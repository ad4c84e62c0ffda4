//! Subscription-specific error types.
//!
//! | Error | Category |
//! |-------|----------|
//! | MissingRatePlan | programming error, fatal |
//! | MissingStartDate | programming error, fatal |
//! | MissingId | invalid argument |
//! | InvalidTimezone | configuration, fatal |
//! | UnsupportedSaveMode | invalid argument |
//! | MalformedRecord | remote data |
//! | BillingApi | remote, known platform code |
//! | Transport | remote, passed through unchanged |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, TimezoneError, ValidationError};
use crate::ports::TransportError;

/// Subscription errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// Date or status work was attempted without a rate plan attached.
    #[error("Subscription has no rate plan; dates and status cannot be resolved")]
    MissingRatePlan,

    /// Cancelability was asked of a subscription without a start date.
    #[error("Subscription has no start date")]
    MissingStartDate,

    /// The operation needs a remote id the subscription does not have yet.
    #[error("Subscription has no id")]
    MissingId,

    #[error(transparent)]
    InvalidTimezone(#[from] TimezoneError),

    #[error("Unsupported save method argument: {0}")]
    UnsupportedSaveMode(String),

    #[error("Malformed subscription record: {0}")]
    MalformedRecord(String),

    /// The billing platform rejected the request with one of its own error codes.
    #[error("Billing API error {code} ({status}): {message}")]
    BillingApi {
        status: u16,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Transport(TransportError),
}

impl SubscriptionError {
    pub fn unsupported_save_mode(mode: impl Into<String>) -> Self {
        SubscriptionError::UnsupportedSaveMode(mode.into())
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        SubscriptionError::MalformedRecord(reason.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::MissingRatePlan => ErrorCode::MissingRatePlan,
            SubscriptionError::MissingStartDate | SubscriptionError::MissingId => {
                ErrorCode::ValidationFailed
            }
            SubscriptionError::InvalidTimezone(_) => ErrorCode::InvalidTimezone,
            SubscriptionError::UnsupportedSaveMode(_) => ErrorCode::UnsupportedSaveMode,
            SubscriptionError::MalformedRecord(_) => ErrorCode::InvalidFormat,
            SubscriptionError::BillingApi { .. } => ErrorCode::BillingApiError,
            SubscriptionError::Transport(_) => ErrorCode::TransportError,
        }
    }
}

impl From<TransportError> for SubscriptionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Response {
                status,
                code: Some(code),
                message,
            } if crate::ports::is_billing_error_code(&code) => SubscriptionError::BillingApi {
                status,
                code,
                message,
            },
            other => SubscriptionError::Transport(other),
        }
    }
}

impl From<ValidationError> for SubscriptionError {
    fn from(err: ValidationError) -> Self {
        SubscriptionError::MalformedRecord(err.to_string())
    }
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            SubscriptionError::Transport(inner) => inner.into(),
            SubscriptionError::BillingApi {
                status,
                code: billing_code,
                ..
            } => DomainError::new(code, message)
                .with_detail("status", status.to_string())
                .with_detail("code", billing_code),
            _ => DomainError::new(code, message),
        }
    }
}
