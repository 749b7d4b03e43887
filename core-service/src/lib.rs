//! Guardian AI - scam detection core
//!
//! Classifies message text from notifications or ad-hoc checks, keeps a
//! bounded history, presents timed alerts and tracks whether protection
//! is currently effective.

pub mod api;
pub mod constants;
pub mod error;
pub mod logic;

pub use api::{GuardianService, PlatformDeps};
pub use error::{GuardianError, GuardianResult};
