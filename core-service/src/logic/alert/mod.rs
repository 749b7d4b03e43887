//! Alert Presentation Module
//!
//! Timed overlay alerts for WARNING / DANGEROUS verdicts from automatic
//! processing. Instances are independent; several may be visible at once.
//!
//! ## Structure
//! - `types`: AlertInstance, AlertState, AlertEvent, AlertTimings
//! - `presenter`: OverlaySurface, AlertPresenter, AlertHandle

pub mod types;
pub mod presenter;
#[cfg(test)]
pub(crate) mod testing;

pub use types::{
    AlertEvent, AlertInstance, AlertSeverity, AlertState, AlertTimings, DismissTrigger,
    DANGER_MESSAGE, WARNING_MESSAGE,
};

pub use presenter::{AlertHandle, AlertPresenter, OverlaySurface, PresentOutcome};
