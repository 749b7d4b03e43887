//! History Types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::logic::threat::{ExplanationFactor, Verdict, VerdictCategory};

/// Display format of `HistoryRecord::timestamp`
pub const TIMESTAMP_FORMAT: &str = "%d %b %H:%M";

/// One past classification. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Time-derived, strictly increasing
    pub id: i64,
    pub text: String,
    pub is_scam: bool,
    pub is_warning: bool,
    #[serde(default)]
    pub score: f32,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<HashMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<ExplanationFactor>>,
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn from_verdict(id: i64, text: &str, verdict: &Verdict) -> Self {
        Self {
            id,
            text: text.to_string(),
            is_scam: verdict.is_scam,
            is_warning: verdict.is_warning(),
            score: verdict.score,
            reasons: verdict.reasons.clone(),
            entities: verdict.entities.clone(),
            explanation: verdict.explanation.clone(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn category(&self) -> VerdictCategory {
        if self.is_scam {
            VerdictCategory::Dangerous
        } else if self.is_warning {
            VerdictCategory::Warning
        } else {
            VerdictCategory::Safe
        }
    }
}

/// Derived counters; recomputed from the log on every call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_scans: usize,
    pub scams_blocked: usize,
    pub warnings_shown: usize,
    pub safe_messages: usize,
}

impl Stats {
    /// Single pass over the records
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        records.iter().fold(Stats::default(), |mut stats, r| {
            stats.total_scans += 1;
            match r.category() {
                VerdictCategory::Dangerous => stats.scams_blocked += 1,
                VerdictCategory::Warning => stats.warnings_shown += 1,
                VerdictCategory::Safe => stats.safe_messages += 1,
            }
            stats
        })
    }
}
