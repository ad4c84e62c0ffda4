//! Mock subscription transport for testing.
//!
//! Returns pre-configured raw records, injects errors and records every
//! call so tests can verify what would have gone over the wire.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockSubscriptionTransport::new()
//!     .with_list(json!({ "developerRatePlan": [] }));
//!
//! let response = transport.list(&developer_id).await?;
//! assert_eq!(transport.calls().len(), 1);
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::foundation::{DeveloperId, SubscriptionId};
use crate::domain::subscription::SubscriptionPayload;
use crate::ports::{SubscriptionTransport, TransportError};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    List {
        developer_id: DeveloperId,
    },
    Load {
        developer_id: DeveloperId,
        id: SubscriptionId,
    },
    Create {
        developer_id: DeveloperId,
        payload: SubscriptionPayload,
    },
    Update {
        developer_id: DeveloperId,
        id: SubscriptionId,
        payload: SubscriptionPayload,
    },
    Delete {
        developer_id: DeveloperId,
        id: SubscriptionId,
    },
}

/// Configurable in-process transport.
#[derive(Debug, Clone)]
pub struct MockSubscriptionTransport {
    /// Returned by `list`.
    list_response: Value,
    /// Returned by `load`, `create` and `update`.
    record_response: Value,
    /// When set, every call fails with this error.
    error: Option<TransportError>,
    calls: Arc<Mutex<Vec<TransportCall>>>,
}

impl Default for MockSubscriptionTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSubscriptionTransport {
    /// A transport with an empty list and no record.
    pub fn new() -> Self {
        Self {
            list_response: json!({ "developerRatePlan": [] }),
            record_response: Value::Null,
            error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_list(mut self, response: Value) -> Self {
        self.list_response = response;
        self
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record_response = record;
        self
    }

    pub fn failing_with(mut self, error: TransportError) -> Self {
        self.error = Some(error);
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.lock_calls().clone()
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<TransportCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: TransportCall, response: &Value) -> Result<Value, TransportError> {
        self.lock_calls().push(call);
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(response.clone()),
        }
    }
}

#[async_trait]
impl SubscriptionTransport for MockSubscriptionTransport {
    async fn list(&self, developer_id: &DeveloperId) -> Result<Value, TransportError> {
        let call = TransportCall::List {
            developer_id: developer_id.clone(),
        };
        self.record(call, &self.list_response)
    }

    async fn load(
        &self,
        developer_id: &DeveloperId,
        id: &SubscriptionId,
    ) -> Result<Value, TransportError> {
        let call = TransportCall::Load {
            developer_id: developer_id.clone(),
            id: id.clone(),
        };
        self.record(call, &self.record_response)
    }

    async fn create(
        &self,
        developer_id: &DeveloperId,
        payload: &SubscriptionPayload,
    ) -> Result<Value, TransportError> {
        let call = TransportCall::Create {
            developer_id: developer_id.clone(),
            payload: payload.clone(),
        };
        self.record(call, &self.record_response)
    }

    async fn update(
        &self,
        developer_id: &DeveloperId,
        id: &SubscriptionId,
        payload: &SubscriptionPayload,
    ) -> Result<Value, TransportError> {
        let call = TransportCall::Update {
            developer_id: developer_id.clone(),
            id: id.clone(),
            payload: payload.clone(),
        };
        self.record(call, &self.record_response)
    }

    async fn delete(&self, developer_id: &DeveloperId, id: &SubscriptionId) -> Result<(), TransportError> {
        let call = TransportCall::Delete {
            developer_id: developer_id.clone(),
            id: id.clone(),
        };
        self.record(call, &Value::Null).map(|_| ())
    }
}
