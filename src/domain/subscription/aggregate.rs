//! Subscription entity.
//!
//! A developer's (or company's) subscription to a monetization rate plan.
//!
//! # Invariants
//!
//! - Every stored date is midnight in the organization's timezone
//! - Status is derived on read and never stored
//! - Date setters and date/status reads require a rate plan

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::domain::foundation::{DeveloperId, OrgDateTime, OrgTimezone, SubscriptionId};

use super::normalizer::{self, DateSource};
use super::payload::{IdRef, PayloadKind, SubscriptionPayload};
use super::status::{self, SubscriptionStatus};
use super::{RatePlan, SubscriptionError};

/// The four normalized date fields of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
    Renewal,
    NextRecurringFee,
}

impl DateField {
    pub const ALL: [DateField; 4] = [
        DateField::Start,
        DateField::End,
        DateField::Renewal,
        DateField::NextRecurringFee,
    ];

    /// Field name in wire records.
    pub fn wire_name(&self) -> &'static str {
        match self {
            DateField::Start => "startDate",
            DateField::End => "endDate",
            DateField::Renewal => "renewalDate",
            DateField::NextRecurringFee => "nextRecurringFeeDate",
        }
    }
}

/// Record fields with a typed assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordField {
    Id,
    DeveloperId,
    Date(DateField),
}

impl RecordField {
    fn from_wire(name: &str) -> Option<Self> {
        match name {
            "id" => Some(RecordField::Id),
            "developerId" => Some(RecordField::DeveloperId),
            "startDate" => Some(RecordField::Date(DateField::Start)),
            "endDate" => Some(RecordField::Date(DateField::End)),
            "renewalDate" => Some(RecordField::Date(DateField::Renewal)),
            "nextRecurringFeeDate" => Some(RecordField::Date(DateField::NextRecurringFee)),
            _ => None,
        }
    }
}

/// Record fields handled outside the per-field dispatch.
const NESTED_FIELDS: [&str; 2] = ["ratePlan", "developer"];

/// A developer rate plan subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    id: Option<SubscriptionId>,
    developer_id: DeveloperId,
    start_date: Option<OrgDateTime>,
    end_date: Option<OrgDateTime>,
    renewal_date: Option<OrgDateTime>,
    next_recurring_fee_date: Option<OrgDateTime>,
    rate_plan: Option<Arc<RatePlan>>,
}

impl Subscription {
    /// Creates an empty subscription for a developer or company.
    pub fn new(developer_id: DeveloperId) -> Self {
        Self {
            id: None,
            developer_id,
            start_date: None,
            end_date: None,
            renewal_date: None,
            next_recurring_fee_date: None,
            rate_plan: None,
        }
    }

    /// Builds a subscription from a raw wire record.
    pub fn from_raw(developer_id: DeveloperId, record: &Value) -> Result<Self, SubscriptionError> {
        let mut subscription = Self::new(developer_id);
        subscription.load_from_raw(record, false)?;
        Ok(subscription)
    }

    /// Loads fields from a raw wire record.
    ///
    /// The nested rate plan is built first when the record names its
    /// monetization package. Remaining fields go through a fixed mapping;
    /// unknown fields are logged and skipped.
    pub fn load_from_raw(&mut self, record: &Value, reset: bool) -> Result<(), SubscriptionError> {
        let fields = record
            .as_object()
            .ok_or_else(|| SubscriptionError::malformed("record is not a JSON object"))?;

        if reset {
            self.reset();
        }

        if let Some(plan) = nested_rate_plan(fields)? {
            self.rate_plan = Some(Arc::new(plan));
        }

        for (name, value) in fields {
            if NESTED_FIELDS.contains(&name.as_str()) {
                continue;
            }
            match RecordField::from_wire(name) {
                Some(field) => self.assign(field, value)?,
                None => tracing::info!(
                    developer_id = %self.developer_id,
                    field = %name,
                    "No assignment for record field; skipped"
                ),
            }
        }
        Ok(())
    }

    fn assign(&mut self, field: RecordField, value: &Value) -> Result<(), SubscriptionError> {
        match field {
            RecordField::Id => {
                self.id = match value {
                    Value::String(s) if !s.is_empty() => Some(SubscriptionId::new(s.as_str())?),
                    Value::Number(n) => Some(SubscriptionId::new(n.to_string())?),
                    _ => None,
                };
            }
            RecordField::DeveloperId => {
                if let Some(id) = value.as_str() {
                    self.developer_id = DeveloperId::new(id)?;
                }
            }
            RecordField::Date(date_field) => match value.as_str() {
                Some(input) => self.set_date(date_field, input, &DateSource::default())?,
                None => {
                    self.plan()?;
                    *self.date_slot(date_field) = None;
                }
            },
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.id = None;
        self.start_date = None;
        self.end_date = None;
        self.rate_plan = None;
    }

    // Accessors

    pub fn id(&self) -> Option<&SubscriptionId> {
        self.id.as_ref()
    }

    pub fn developer_id(&self) -> &DeveloperId {
        &self.developer_id
    }

    pub fn rate_plan(&self) -> Option<&RatePlan> {
        self.rate_plan.as_deref()
    }

    pub fn start_date_time(&self) -> Option<OrgDateTime> {
        self.start_date
    }

    /// End date as stored, before the same-day cancellation override.
    pub fn stored_end_date_time(&self) -> Option<OrgDateTime> {
        self.end_date
    }

    pub fn renewal_date_time(&self) -> Option<OrgDateTime> {
        self.renewal_date
    }

    pub fn next_recurring_fee_date_time(&self) -> Option<OrgDateTime> {
        self.next_recurring_fee_date
    }

    /// Effective end date as of now.
    pub fn end_date_time(&self) -> Result<Option<OrgDateTime>, SubscriptionError> {
        self.end_date_time_at(Utc::now())
    }

    /// Effective end date as of `now`.
    pub fn end_date_time_at(&self, now: DateTime<Utc>) -> Result<Option<OrgDateTime>, SubscriptionError> {
        let today = self.org_zone()?.today(now);
        Ok(status::effective_end_date(self.start_date, self.end_date, today))
    }

    /// Lifecycle status as of now.
    pub fn status(&self) -> Result<SubscriptionStatus, SubscriptionError> {
        self.status_at(Utc::now())
    }

    /// Lifecycle status as of `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> Result<SubscriptionStatus, SubscriptionError> {
        let plan = self.plan()?;
        let today = plan.organization().zone()?.today(now);
        let plan_end = plan.end_date_time()?;
        Ok(status::resolve_status(plan_end, self.start_date, self.end_date, today))
    }

    /// True while the subscription has not started yet.
    pub fn is_cancelable(&self) -> Result<bool, SubscriptionError> {
        self.is_cancelable_at(Utc::now())
    }

    pub fn is_cancelable_at(&self, now: DateTime<Utc>) -> Result<bool, SubscriptionError> {
        let today = self.org_zone()?.today(now);
        let start = self.start_date.ok_or(SubscriptionError::MissingStartDate)?;
        Ok(status::is_cancelable(start, today))
    }

    // Setters

    pub fn set_id(&mut self, id: SubscriptionId) {
        self.id = Some(id);
    }

    pub fn set_developer_id(&mut self, developer_id: DeveloperId) {
        self.developer_id = developer_id;
    }

    /// Attaches a rate plan.
    ///
    /// When the organization timezone changes, stored dates keep their
    /// wall-clock value and are re-read in the new zone.
    pub fn set_rate_plan(&mut self, rate_plan: Arc<RatePlan>) {
        let previous = self.rate_plan.as_ref().and_then(|plan| plan.organization().zone().ok());
        if let (Some(previous), Ok(next)) = (previous, rate_plan.organization().zone()) {
            if previous != next {
                for field in DateField::ALL {
                    let slot = self.date_slot(field);
                    *slot = slot.and_then(|date| {
                        next.from_local(&date.naive_local()).map(OrgDateTime::from_datetime)
                    });
                }
            }
        }
        self.rate_plan = Some(rate_plan);
    }

    /// Sets the start date from a canonical string in organization time.
    pub fn set_start_date(&mut self, input: &str) -> Result<(), SubscriptionError> {
        self.set_date(DateField::Start, input, &DateSource::default())
    }

    pub fn set_start_date_with(&mut self, input: &str, source: &DateSource) -> Result<(), SubscriptionError> {
        self.set_date(DateField::Start, input, source)
    }

    /// Sets the end date from a canonical string in organization time.
    pub fn set_end_date(&mut self, input: &str) -> Result<(), SubscriptionError> {
        self.set_date(DateField::End, input, &DateSource::default())
    }

    pub fn set_end_date_with(&mut self, input: &str, source: &DateSource) -> Result<(), SubscriptionError> {
        self.set_date(DateField::End, input, source)
    }

    pub fn set_renewal_date(&mut self, input: &str) -> Result<(), SubscriptionError> {
        self.set_date(DateField::Renewal, input, &DateSource::default())
    }

    pub fn set_renewal_date_with(&mut self, input: &str, source: &DateSource) -> Result<(), SubscriptionError> {
        self.set_date(DateField::Renewal, input, source)
    }

    pub fn set_next_recurring_fee_date(&mut self, input: &str) -> Result<(), SubscriptionError> {
        self.set_date(DateField::NextRecurringFee, input, &DateSource::default())
    }

    pub fn set_next_recurring_fee_date_with(
        &mut self,
        input: &str,
        source: &DateSource,
    ) -> Result<(), SubscriptionError> {
        self.set_date(DateField::NextRecurringFee, input, source)
    }

    /// Normalizes `input` to organization-local midnight and stores it.
    ///
    /// An unparseable date clears the field. An unknown timezone is an error
    /// and leaves the field untouched.
    pub fn set_date(
        &mut self,
        field: DateField,
        input: &str,
        source: &DateSource,
    ) -> Result<(), SubscriptionError> {
        let org = self.plan()?.organization().timezone().to_string();
        let normalized = normalizer::normalize_str(input, source, &org)?;
        if normalized.is_none() {
            tracing::warn!(
                developer_id = %self.developer_id,
                field = field.wire_name(),
                input,
                format = source.format(),
                "Unparseable date; field cleared"
            );
        }
        *self.date_slot(field) = normalized;
        Ok(())
    }

    fn date_slot(&mut self, field: DateField) -> &mut Option<OrgDateTime> {
        match field {
            DateField::Start => &mut self.start_date,
            DateField::End => &mut self.end_date,
            DateField::Renewal => &mut self.renewal_date,
            DateField::NextRecurringFee => &mut self.next_recurring_fee_date,
        }
    }

    // Wire projections

    /// Request body for a write.
    pub fn payload(&self, kind: PayloadKind) -> Result<SubscriptionPayload, SubscriptionError> {
        let plan = self.plan()?;
        let id = match kind {
            PayloadKind::Update => Some(
                self.id
                    .as_ref()
                    .ok_or(SubscriptionError::MissingId)?
                    .to_string(),
            ),
            PayloadKind::Create | PayloadKind::ForceSave => None,
        };

        Ok(SubscriptionPayload {
            developer: IdRef {
                id: self.developer_id.to_string(),
            },
            start_date: self.start_date.map(|d| d.to_canonical()),
            end_date: self.end_date.map(|d| d.to_canonical()),
            rate_plan: IdRef {
                id: plan.id().to_string(),
            },
            id,
            suppress_warning: (kind == PayloadKind::ForceSave).then_some(true),
        })
    }

    /// JSON description with the start and effective end dates as of now.
    pub fn summary(&self) -> Result<Value, SubscriptionError> {
        self.summary_at(Utc::now())
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> Result<Value, SubscriptionError> {
        let end_date = self.end_date_time_at(now)?;
        let canonical_or_empty =
            |date: Option<OrgDateTime>| date.map(|d| d.to_canonical()).unwrap_or_default();

        Ok(json!({
            "developer": { "id": self.developer_id.as_str() },
            "endDate": canonical_or_empty(end_date),
            "startDate": canonical_or_empty(self.start_date),
            "id": self.id.as_ref().map(SubscriptionId::as_str),
            "ratePlan": self.rate_plan.as_ref().map(|plan| json!({ "id": plan.id().as_str() })),
        }))
    }

    fn plan(&self) -> Result<&RatePlan, SubscriptionError> {
        self.rate_plan.as_deref().ok_or(SubscriptionError::MissingRatePlan)
    }

    fn org_zone(&self) -> Result<OrgTimezone, SubscriptionError> {
        Ok(self.plan()?.organization().zone()?)
    }
}

fn nested_rate_plan(fields: &Map<String, Value>) -> Result<Option<RatePlan>, SubscriptionError> {
    let raw = match fields.get("ratePlan") {
        Some(raw) if raw.as_object().is_some_and(|plan| !plan.is_empty()) => raw,
        _ => return Ok(None),
    };
    match raw.pointer("/monetizationPackage/id").and_then(Value::as_str) {
        Some(package_id) => RatePlan::from_raw(package_id, raw).map(Some),
        None => Ok(None),
    }
}
