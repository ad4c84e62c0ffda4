//! Rate plan and organization collaborators.
//!
//! A subscription reads two things from its rate plan: the plan's own end
//! date and the owning organization's timezone. Both are read-only and shared.

use serde_json::Value;

use crate::domain::foundation::{OrgDateTime, OrgTimezone, RatePlanId, TimezoneError};

use super::SubscriptionError;

/// The organization that owns a rate plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    id: Option<String>,
    timezone: String,
}

impl Organization {
    pub fn new(id: Option<String>, timezone: impl Into<String>) -> Self {
        Self {
            id,
            timezone: timezone.into(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Timezone identifier as configured on the organization.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Resolves the configured timezone.
    pub fn zone(&self) -> Result<OrgTimezone, TimezoneError> {
        self.timezone.parse()
    }
}

/// A monetization rate plan a developer can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatePlan {
    id: RatePlanId,
    package_id: String,
    display_name: Option<String>,
    end_date: Option<String>,
    organization: Organization,
}

impl RatePlan {
    pub fn new(id: RatePlanId, package_id: impl Into<String>, organization: Organization) -> Self {
        Self {
            id,
            package_id: package_id.into(),
            display_name: None,
            end_date: None,
            organization,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the plan end date as a canonical string in organization time.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Builds a plan from the raw `ratePlan` object of a subscription record.
    pub fn from_raw(package_id: &str, raw: &Value) -> Result<Self, SubscriptionError> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SubscriptionError::malformed("ratePlan.id is missing"))?;

        let organization = raw.get("organization").unwrap_or(&Value::Null);
        let timezone = organization
            .get("timezone")
            .and_then(Value::as_str)
            .ok_or_else(|| SubscriptionError::malformed("ratePlan.organization.timezone is missing"))?;
        let org_id = organization.get("id").and_then(Value::as_str).map(str::to_string);

        let mut plan = RatePlan::new(
            RatePlanId::new(id)?,
            package_id,
            Organization::new(org_id, timezone),
        );
        if let Some(name) = raw
            .get("displayName")
            .or_else(|| raw.get("name"))
            .and_then(Value::as_str)
        {
            plan = plan.with_display_name(name);
        }
        if let Some(end_date) = raw.get("endDate").and_then(Value::as_str) {
            plan = plan.with_end_date(end_date);
        }
        Ok(plan)
    }

    pub fn id(&self) -> &RatePlanId {
        &self.id
    }

    /// Monetization package the plan belongs to.
    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    /// Plan end date in organization time, absent when unset or unparseable.
    pub fn end_date_time(&self) -> Result<Option<OrgDateTime>, TimezoneError> {
        let zone = self.organization.zone()?;
        Ok(self
            .end_date
            .as_deref()
            .and_then(|raw| OrgDateTime::parse_canonical(raw, &zone)))
    }
}
