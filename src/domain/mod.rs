//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, organization time, errors)
//! - `subscription` - Developer rate plan subscriptions and their status

pub mod foundation;
pub mod subscription;
