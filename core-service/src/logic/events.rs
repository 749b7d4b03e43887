//! Host Events - newline-delimited JSON protocol
//!
//! Inbound: one `HostEvent` per line, tagged by `event`.
//! Outbound: one `OutputEvent` per line, tagged by `kind`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GuardianResult;
use crate::logic::alert::AlertEvent;
use crate::logic::intake::PostedNotification;
use crate::logic::monitor::{ProtectionSnapshot, ProtectionStatus};
use crate::logic::threat::{Verdict, VerdictCategory};

/// Event names
pub mod names {
    pub const NOTIFICATION_POSTED: &str = "notification_posted";
    pub const FOREGROUND_RESUMED: &str = "foreground_resumed";
    pub const CHECK_TEXT: &str = "check_text";
    pub const DISMISS_ALERT: &str = "dismiss_alert";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    NotificationPosted(PostedNotification),
    ForegroundResumed,
    CheckText { text: String },
    DismissAlert { id: Uuid },
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::NotificationPosted(_) => names::NOTIFICATION_POSTED,
            HostEvent::ForegroundResumed => names::FOREGROUND_RESUMED,
            HostEvent::CheckText { .. } => names::CHECK_TEXT,
            HostEvent::DismissAlert { .. } => names::DISMISS_ALERT,
        }
    }
}

/// Parse one input line; blank lines yield `None`
pub fn parse_line(line: &str) -> GuardianResult<Option<HostEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputEvent {
    CheckResult {
        text: String,
        category: VerdictCategory,
        verdict: Verdict,
    },
    CheckFailed {
        text: String,
        error: String,
    },
    Alert(AlertEvent),
    Protection {
        status: ProtectionStatus,
        snapshot: ProtectionSnapshot,
    },
}

impl OutputEvent {
    pub fn check_result(text: &str, verdict: Verdict) -> Self {
        OutputEvent::CheckResult {
            text: text.to_string(),
            category: verdict.category(),
            verdict,
        }
    }

    pub fn protection(snapshot: ProtectionSnapshot) -> Self {
        OutputEvent::Protection {
            status: snapshot.status(),
            snapshot,
        }
    }

    pub fn to_line(&self) -> GuardianResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
