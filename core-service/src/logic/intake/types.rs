//! Intake Types

use serde::{Deserialize, Serialize};

use crate::logic::threat::Message;

/// "New notification posted" event as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedNotification {
    pub source_app: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl PostedNotification {
    pub fn new(source_app: &str, title: &str, body: &str) -> Self {
        Self {
            source_app: source_app.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// Why a notification never reached the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    ProtectionDisabled,
    TrustedApp,
    SystemPackage,
    TrustedContact,
    EmptyBody,
    BackgroundService,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::ProtectionDisabled => "protection_disabled",
            RejectReason::TrustedApp => "trusted_app",
            RejectReason::SystemPackage => "system_package",
            RejectReason::TrustedContact => "trusted_contact",
            RejectReason::EmptyBody => "empty_body",
            RejectReason::BackgroundService => "background_service",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeDecision {
    /// Merged `title. body` text tagged with the posting app's label
    Proceed(Message),
    Reject(RejectReason),
}

impl IntakeDecision {
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            IntakeDecision::Reject(reason) => Some(*reason),
            IntakeDecision::Proceed(_) => None,
        }
    }
}
