//! Date normalizer.
//!
//! Turns a date string supplied in any format and timezone into the
//! organization-local midnight the billing platform stores.
//!
//! 1. Parse the string with the source format, reading it as wall-clock time
//!    in the source timezone (an offset carried in the string wins).
//! 2. Re-express the instant in the organization timezone when the zones differ.
//! 3. Step back to midnight: subtract the hour, then the minute, then the
//!    second, re-resolving the wall clock after each step.
//!
//! Malformed dates yield `None`. Unknown timezone identifiers are errors.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::domain::foundation::{OrgDateTime, OrgTimezone, TimezoneError, CANONICAL_FORMAT};

/// How an incoming date string should be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSource {
    format: String,
    timezone: Option<String>,
}

impl DateSource {
    /// A source in the given strftime format, in the organization's own timezone.
    ///
    /// Date-only formats read as midnight of the date, not the current time of day.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            timezone: None,
        }
    }

    /// Reads the date in another timezone (IANA name or numeric offset).
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }
}

impl Default for DateSource {
    fn default() -> Self {
        Self::new(CANONICAL_FORMAT)
    }
}

/// Normalizes `input` to organization-local midnight.
///
/// Resolves the timezone identifiers first; a missing source timezone
/// means the organization's own.
pub fn normalize_str(
    input: &str,
    source: &DateSource,
    org_timezone: &str,
) -> Result<Option<OrgDateTime>, TimezoneError> {
    let org: OrgTimezone = org_timezone.parse()?;
    let source_zone = match source.timezone() {
        Some(name) => name.parse()?,
        None => org,
    };
    Ok(normalize(input, source.format(), &source_zone, &org))
}

/// Normalizes `input` to organization-local midnight with resolved zones.
pub fn normalize(
    input: &str,
    format: &str,
    source: &OrgTimezone,
    org: &OrgTimezone,
) -> Option<OrgDateTime> {
    let (parsed, explicit_offset) = parse_in_zone(input, format, source)?;

    let local = if explicit_offset || source != org {
        org.from_utc(&parsed.naive_utc())?
    } else {
        parsed
    };

    truncate_to_midnight(local, org).map(OrgDateTime::from_datetime)
}

fn parse_in_zone(
    input: &str,
    format: &str,
    zone: &OrgTimezone,
) -> Option<(DateTime<FixedOffset>, bool)> {
    if carries_offset(format) {
        return DateTime::parse_from_str(input, format)
            .ok()
            .map(|parsed| (parsed, true));
    }

    if let Ok(local) = NaiveDateTime::parse_from_str(input, format) {
        return zone.from_local(&local).map(|parsed| (parsed, false));
    }

    // Date-only formats read as the start of that day.
    NaiveDate::parse_from_str(input, format)
        .ok()
        .and_then(|date| zone.from_local(&date.and_time(NaiveTime::MIN)))
        .map(|parsed| (parsed, false))
}

fn carries_offset(format: &str) -> bool {
    format.contains("%z") || format.contains("%:z") || format.contains("%#z")
}

fn truncate_to_midnight(
    dt: DateTime<FixedOffset>,
    zone: &OrgTimezone,
) -> Option<DateTime<FixedOffset>> {
    let dt = step_back(dt, zone, Duration::hours(i64::from(dt.hour())))?;
    let dt = step_back(dt, zone, Duration::minutes(i64::from(dt.minute())))?;
    let dt = step_back(dt, zone, Duration::seconds(i64::from(dt.second())))?;
    Some(dt.with_nanosecond(0).unwrap_or(dt))
}

fn step_back(
    dt: DateTime<FixedOffset>,
    zone: &OrgTimezone,
    by: Duration,
) -> Option<DateTime<FixedOffset>> {
    if by == Duration::zero() {
        return Some(dt);
    }
    zone.from_local(&dt.naive_local().checked_sub_signed(by)?)
}
