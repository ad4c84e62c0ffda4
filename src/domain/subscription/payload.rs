//! Wire payload for create, update and force-save requests.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::SubscriptionError;

/// How a subscription is written to the billing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update,
}

impl FromStr for SaveMode {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(SaveMode::Create),
            "update" => Ok(SaveMode::Update),
            other => Err(SubscriptionError::unsupported_save_mode(other)),
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveMode::Create => f.write_str("create"),
            SaveMode::Update => f.write_str("update"),
        }
    }
}

/// Which projection of the subscription to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Create,
    Update,
    /// Create while suppressing platform warnings.
    ForceSave,
}

impl From<SaveMode> for PayloadKind {
    fn from(mode: SaveMode) -> Self {
        match mode {
            SaveMode::Create => PayloadKind::Create,
            SaveMode::Update => PayloadKind::Update,
        }
    }
}

/// `{"id": ...}` reference to a related resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdRef {
    pub id: String,
}

/// Request body for writes. Exactly these fields go on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub developer: IdRef,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub rate_plan: IdRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppress_warning: Option<bool>,
}
