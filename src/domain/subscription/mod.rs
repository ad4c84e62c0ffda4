//! Subscription domain module.
//!
//! Developer rate plan subscriptions: organization-local date handling,
//! status resolution and the wire projections sent to the billing platform.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription entity
//! - `normalizer` - Date normalization to organization-local midnight
//! - `status` - SubscriptionStatus resolution and cancelability
//! - `rate_plan` - Rate plan and organization collaborators
//! - `payload` - Write payloads and save modes
//! - `errors` - Subscription-specific errors

mod aggregate;
mod errors;
mod normalizer;
mod payload;
mod rate_plan;
mod status;

pub use aggregate::{DateField, Subscription};
pub use errors::SubscriptionError;
pub use normalizer::{normalize, normalize_str, DateSource};
pub use payload::{IdRef, PayloadKind, SaveMode, SubscriptionPayload};
pub use rate_plan::{Organization, RatePlan};
pub use status::{effective_end_date, is_cancelable, resolve_status, SubscriptionStatus};
