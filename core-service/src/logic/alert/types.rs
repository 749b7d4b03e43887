//! Alert Types

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ALERT_AUTO_DISMISS_MS, ALERT_EXIT_MS};
use crate::logic::threat::{Verdict, VerdictCategory};

pub const DANGER_MESSAGE: &str = "Scam / spam detected";
pub const WARNING_MESSAGE: &str = "Do not follow links from unknown sources!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Danger,
    Warning,
}

impl AlertSeverity {
    /// None for SAFE verdicts
    pub fn for_verdict(verdict: &Verdict) -> Option<Self> {
        match verdict.category() {
            VerdictCategory::Dangerous => Some(AlertSeverity::Danger),
            VerdictCategory::Warning => Some(AlertSeverity::Warning),
            VerdictCategory::Safe => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AlertSeverity::Danger => DANGER_MESSAGE,
            AlertSeverity::Warning => WARNING_MESSAGE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Danger => "DANGER",
            AlertSeverity::Warning => "WARNING",
        }
    }
}

/// HIDDEN -> SHOWING -> DISMISSING -> HIDDEN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertState {
    Showing,
    Dismissing,
    Hidden,
}

impl AlertState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertState::Showing => "SHOWING",
            AlertState::Dismissing => "DISMISSING",
            AlertState::Hidden => "HIDDEN",
        }
    }
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What moved an alert out of SHOWING
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissTrigger {
    Timer,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertInstance {
    pub id: Uuid,
    pub message: String,
    pub severity: AlertSeverity,
}

impl AlertInstance {
    pub fn new(severity: AlertSeverity) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: severity.message().to_string(),
            severity,
        }
    }
}

/// One transition, published to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: Uuid,
    pub state: AlertState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<DismissTrigger>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertTimings {
    /// SHOWING -> DISMISSING when nobody taps
    pub auto_dismiss: Duration,
    /// DISMISSING -> HIDDEN
    pub exit: Duration,
}

impl Default for AlertTimings {
    fn default() -> Self {
        Self {
            auto_dismiss: Duration::from_millis(ALERT_AUTO_DISMISS_MS),
            exit: Duration::from_millis(ALERT_EXIT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_verdict() {
        assert_eq!(
            AlertSeverity::for_verdict(&Verdict::new(true, 0.9, vec![])),
            Some(AlertSeverity::Danger)
        );
        assert_eq!(
            AlertSeverity::for_verdict(&Verdict::new(false, 0.55, vec![])),
            Some(AlertSeverity::Warning)
        );
        assert_eq!(AlertSeverity::for_verdict(&Verdict::new(false, 0.1, vec![])), None);
    }

    #[test]
    fn test_instance_message() {
        let alert = AlertInstance::new(AlertSeverity::Warning);
        assert_eq!(alert.message, WARNING_MESSAGE);
    }
}
