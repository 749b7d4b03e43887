//! API Module
//!
//! Host-facing surface of the detection core.
//!
//! Structure:
//! - service.rs: `GuardianService` wiring and start/shutdown lifecycle
//! - commands.rs: host commands (detection, history, feedback, trust, settings)
//! - status.rs: status DTOs

pub mod service;
pub mod commands;
pub mod status;

pub use service::{GuardianService, PlatformDeps};
pub use status::ServiceStatus;
