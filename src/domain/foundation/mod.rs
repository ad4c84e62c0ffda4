//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the subscription domain.

mod errors;
mod ids;
mod org_time;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DeveloperId, RatePlanId, SubscriptionId};
pub use org_time::{OrgDateTime, OrgTimezone, TimezoneError, CANONICAL_FORMAT};
