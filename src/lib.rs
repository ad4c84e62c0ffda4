//! Rate Plan Subscriptions - Developer rate plan subscriptions for a
//! monetized API platform.
//!
//! Normalizes every subscription date to midnight in the owning
//! organization's timezone and derives each subscription's lifecycle
//! status from those dates.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
