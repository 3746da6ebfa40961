//! Tolkdispatch: translator matching and push notification dispatch for
//! the Tolkportalen booking platform.
//!
//! This crate is the decision core behind booking notifications: which
//! translators may see a job, whether "now" falls in the nightly quiet
//! window, what the push says, and how the immediate and delayed batches
//! reach the gateway. HTTP controllers, persistence and auth live
//! elsewhere and plug in through the traits in [`store`].

pub mod clock;
pub mod config;
pub mod eligibility;
pub mod errors;
pub mod models;
pub mod notification;
pub mod quiet_hours;
pub mod store;
