//! Organization-local time value objects.
//!
//! Every date the billing platform exchanges is a wall-clock value in the
//! owning organization's timezone, rendered as `YYYY-MM-DD HH:MM:SS`.
//! [`OrgTimezone`] resolves timezone identifiers and [`OrgDateTime`] carries
//! an instant together with the organization offset in effect at it.

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire and storage format of every date field.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raised when a timezone identifier cannot be resolved.
///
/// This is a configuration error and is never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimezoneError {
    #[error("Unknown timezone identifier '{0}'")]
    Unknown(String),
}

/// A timezone as configured for an organization or supplied with a date.
///
/// Accepts IANA names (`America/Los_Angeles`, `UTC`) and numeric offsets
/// (`+0200`, `+02:00`, `-05`, `Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl OrgTimezone {
    /// Offset in effect at the given UTC instant.
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            OrgTimezone::Named(tz) => tz.offset_from_utc_datetime(utc).fix(),
            OrgTimezone::Fixed(offset) => *offset,
        }
    }

    /// Re-expresses a UTC instant as wall-clock time in this zone.
    ///
    /// Returns `None` when the wall-clock value falls outside chrono's range.
    pub fn from_utc(&self, utc: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        let offset = self.offset_at(utc);
        utc.checked_add_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
        Some(offset.from_utc_datetime(utc))
    }

    /// Interprets a wall-clock time in this zone.
    ///
    /// A time inside a spring-forward gap is pushed forward by the gap
    /// length; an ambiguous fall-back time resolves to the earlier instant.
    /// Returns `None` when the instant falls outside chrono's range.
    pub fn from_local(&self, local: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        let tz = match self {
            OrgTimezone::Fixed(offset) => return at_offset(local, *offset),
            OrgTimezone::Named(tz) => tz,
        };

        match tz.offset_from_local_datetime(local) {
            LocalResult::Single(offset) => at_offset(local, offset.fix()),
            LocalResult::Ambiguous(first, second) => {
                let first = at_offset(local, first.fix())?;
                let second = at_offset(local, second.fix())?;
                Some(first.min(second))
            }
            LocalResult::None => {
                let day_before = local.checked_sub_signed(Duration::days(1))?;
                let before_gap = tz.offset_from_utc_datetime(&day_before).fix();
                let instant = at_offset(local, before_gap)?.naive_utc();
                self.from_utc(&instant)
            }
        }
    }

    /// Midnight of the current local date in this zone.
    pub fn today(&self, now: DateTime<Utc>) -> OrgDateTime {
        let offset = self.offset_at(&now.naive_utc());
        let local = now.with_timezone(&offset);
        let midnight = local.date_naive().and_time(NaiveTime::MIN);
        // Only unresolvable at the very edge of chrono's calendar.
        OrgDateTime(self.from_local(&midnight).unwrap_or(local))
    }
}

fn at_offset(local: &NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let utc = local.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
    Some(offset.from_utc_datetime(&utc))
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let sign = match s.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &s[1..];
    let digits = match rest.len() {
        2 | 4 => rest.to_string(),
        5 if rest.as_bytes()[2] == b':' => rest.replacen(':', "", 1),
        _ => return None,
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = if digits.len() == 4 { digits[2..].parse().ok()? } else { 0 };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl FromStr for OrgTimezone {
    type Err = TimezoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(tz) = trimmed.parse::<Tz>() {
            return Ok(OrgTimezone::Named(tz));
        }
        parse_offset(trimmed)
            .map(OrgTimezone::Fixed)
            .ok_or_else(|| TimezoneError::Unknown(s.to_string()))
    }
}

impl fmt::Display for OrgTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrgTimezone::Named(tz) => write!(f, "{}", tz.name()),
            OrgTimezone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// An instant expressed in organization-local time.
///
/// Ordering and equality compare instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrgDateTime(DateTime<FixedOffset>);

impl OrgDateTime {
    /// Wraps a datetime already expressed in the organization's offset.
    pub fn from_datetime(dt: DateTime<FixedOffset>) -> Self {
        Self(dt)
    }

    /// Parses a canonical string as wall-clock time in `zone`.
    ///
    /// Returns `None` when the string is not in the canonical format or
    /// names an instant chrono cannot represent.
    pub fn parse_canonical(input: &str, zone: &OrgTimezone) -> Option<Self> {
        NaiveDateTime::parse_from_str(input.trim(), CANONICAL_FORMAT)
            .ok()
            .and_then(|local| zone.from_local(&local))
            .map(Self)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Unix timestamp of the instant.
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }

    /// Wall-clock value in the organization's zone.
    pub fn naive_local(&self) -> NaiveDateTime {
        self.0.naive_local()
    }

    /// True if the wall-clock time is exactly 00:00:00.
    pub fn is_midnight(&self) -> bool {
        self.0.naive_local().time() == NaiveTime::MIN
    }

    /// Renders the wall-clock value in [`CANONICAL_FORMAT`].
    pub fn to_canonical(&self) -> String {
        self.0.format(CANONICAL_FORMAT).to_string()
    }
}

impl fmt::Display for OrgDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

impl Serialize for OrgDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical())
    }
}
