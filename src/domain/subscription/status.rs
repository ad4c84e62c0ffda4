//! Subscription status resolution.
//!
//! Status is never stored. It is derived on demand from the plan end date,
//! the subscription's start and end dates, and midnight today in the
//! organization's timezone.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::OrgDateTime;

/// Lifecycle status of a developer rate plan subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    /// The plan is in effect and can be used for API calls.
    Active,

    /// The plan starts at a later date and cannot be used until then.
    Future,

    /// The provider ended the plan, or the developer ended the subscription.
    Ended,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "Active",
            SubscriptionStatus::Future => "Future",
            SubscriptionStatus::Ended => "Ended",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// End date after the same-day cancellation override.
///
/// When the subscription has started (start on or before today) and its end
/// date falls before its start date, the end date is raised to the start date.
pub fn effective_end_date(
    start: Option<OrgDateTime>,
    end: Option<OrgDateTime>,
    today: OrgDateTime,
) -> Option<OrgDateTime> {
    match (start, end) {
        (Some(start), Some(end)) if start <= today && end < start => Some(start),
        (_, end) => end,
    }
}

/// Resolves the lifecycle status. The first matching rule wins:
///
/// 1. plan end before today: `Ended`
/// 2. effective subscription end before today: `Ended`
/// 3. subscription start after today: `Future`
/// 4. otherwise: `Active`
pub fn resolve_status(
    plan_end: Option<OrgDateTime>,
    start: Option<OrgDateTime>,
    end: Option<OrgDateTime>,
    today: OrgDateTime,
) -> SubscriptionStatus {
    if plan_end.is_some_and(|plan_end| plan_end < today) {
        return SubscriptionStatus::Ended;
    }

    if effective_end_date(start, end, today).is_some_and(|end| end < today) {
        return SubscriptionStatus::Ended;
    }

    if start.is_some_and(|start| start > today) {
        return SubscriptionStatus::Future;
    }

    SubscriptionStatus::Active
}

/// A subscription can be cancelled only before it begins.
pub fn is_cancelable(start: OrgDateTime, today: OrgDateTime) -> bool {
    start.timestamp() > today.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::OrgTimezone;

    fn date(s: &str) -> OrgDateTime {
        let zone: OrgTimezone = "America/Los_Angeles".parse().unwrap();
        OrgDateTime::parse_canonical(&format!("{} 00:00:00", s), &zone).unwrap()
    }

    fn today() -> OrgDateTime {
        date("2024-01-15")
    }

    // Precedence

    #[test]
    fn plan_end_before_today_is_ended_regardless_of_subscription() {
        let plan_end = Some(date("2024-01-14"));
        assert_eq!(
            resolve_status(plan_end, Some(date("2024-02-01")), None, today()),
            SubscriptionStatus::Ended
        );
        assert_eq!(
            resolve_status(plan_end, Some(date("2024-01-01")), Some(date("2024-12-31")), today()),
            SubscriptionStatus::Ended
        );
        assert_eq!(resolve_status(plan_end, None, None, today()), SubscriptionStatus::Ended);
    }

    #[test]
    fn plan_ending_today_does_not_end_subscription() {
        let status = resolve_status(Some(today()), Some(date("2024-01-01")), None, today());
        assert_eq!(status, SubscriptionStatus::Active);
    }

    #[test]
    fn subscription_end_before_today_is_ended() {
        let status = resolve_status(
            None,
            Some(date("2023-06-01")),
            Some(date("2024-01-10")),
            today(),
        );
        assert_eq!(status, SubscriptionStatus::Ended);
    }

    #[test]
    fn start_after_today_is_future() {
        let status = resolve_status(None, Some(date("2024-01-16")), None, today());
        assert_eq!(status, SubscriptionStatus::Future);
    }

    #[test]
    fn future_start_with_future_end_is_future() {
        let status = resolve_status(
            Some(date("2025-01-01")),
            Some(date("2024-03-01")),
            Some(date("2024-06-01")),
            today(),
        );
        assert_eq!(status, SubscriptionStatus::Future);
    }

    #[test]
    fn started_without_end_is_active() {
        assert_eq!(
            resolve_status(None, Some(date("2024-01-15")), None, today()),
            SubscriptionStatus::Active
        );
        assert_eq!(
            resolve_status(None, Some(date("2023-01-01")), Some(date("2024-01-15")), today()),
            SubscriptionStatus::Active
        );
    }

    #[test]
    fn no_dates_at_all_is_active() {
        assert_eq!(resolve_status(None, None, None, today()), SubscriptionStatus::Active);
    }

    // Same-day cancellation override.
    //
    // Characterization tests: they pin the behavior the billing platform
    // clients rely on today, not a judgement that the rule is right.

    #[test]
    fn override_raises_end_to_start_when_started() {
        let effective = effective_end_date(Some(date("2024-01-01")), Some(date("2023-12-31")), today());
        assert_eq!(effective, Some(date("2024-01-01")));
    }

    #[test]
    fn override_scenario_resolves_to_ended() {
        let status = resolve_status(
            None,
            Some(date("2024-01-01")),
            Some(date("2023-12-31")),
            today(),
        );
        assert_eq!(status, SubscriptionStatus::Ended);
    }

    #[test]
    fn override_applies_when_start_is_today() {
        let effective = effective_end_date(Some(today()), Some(date("2024-01-14")), today());
        assert_eq!(effective, Some(today()));
        assert_eq!(
            resolve_status(None, Some(today()), Some(date("2024-01-14")), today()),
            SubscriptionStatus::Active
        );
    }

    #[test]
    fn override_skipped_for_future_start() {
        let effective = effective_end_date(Some(date("2024-02-01")), Some(date("2024-01-20")), today());
        assert_eq!(effective, Some(date("2024-01-20")));
    }

    #[test]
    fn override_skipped_without_start() {
        let effective = effective_end_date(None, Some(date("2023-12-31")), today());
        assert_eq!(effective, Some(date("2023-12-31")));
    }

    #[test]
    fn no_end_date_stays_absent() {
        assert_eq!(effective_end_date(Some(date("2024-01-01")), None, today()), None);
    }

    #[test]
    fn effective_end_is_never_before_a_started_start() {
        let start = date("2024-01-10");
        for end in ["2023-01-01", "2024-01-09", "2024-01-10", "2024-05-05"] {
            let effective = effective_end_date(Some(start), Some(date(end)), today()).unwrap();
            assert!(effective >= start, "end {} produced {}", end, effective);
        }
    }

    // Cancelability

    #[test]
    fn cancelable_only_when_start_is_after_today() {
        assert!(is_cancelable(date("2024-01-16"), today()));
        assert!(!is_cancelable(today(), today()));
        assert!(!is_cancelable(date("2023-12-01"), today()));
    }

    #[test]
    fn status_displays_wire_names() {
        assert_eq!(SubscriptionStatus::Active.to_string(), "Active");
        assert_eq!(SubscriptionStatus::Future.to_string(), "Future");
        assert_eq!(serde_json::to_string(&SubscriptionStatus::Ended).unwrap(), "\"Ended\"");
    }
}
