//! Notification Intake Module
//!
//! Decides which posted notifications reach the classifier.
//!
//! ## Structure
//! - `types`: PostedNotification, IntakeDecision, RejectReason
//! - `rules`: fixed package/phrase lists and text merging
//! - `filter`: should_process, AppLabelResolver

pub mod types;
pub mod rules;
pub mod filter;

pub use types::{IntakeDecision, PostedNotification, RejectReason};

pub use filter::{resolve_label, should_process, AppLabelResolver, StaticLabels};
