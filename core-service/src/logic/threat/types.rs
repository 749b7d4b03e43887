//! Verdict Types
//!
//! Core types for message classification.
//! No decision logic here, only data structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Above this score a non-scam verdict is presented as a warning
pub const WARNING_SCORE_THRESHOLD: f32 = 0.5;

// ============================================================================
// VERDICT CATEGORY
// ============================================================================

/// Severity category, always derived from `is_scam` and `score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictCategory {
    /// Nothing to show the user
    Safe,
    /// Not a confirmed scam, but worth a caution notice
    Warning,
    /// Scam or fraud
    Dangerous,
}

impl VerdictCategory {
    pub fn derive(is_scam: bool, score: f32) -> Self {
        if is_scam {
            VerdictCategory::Dangerous
        } else if score > WARNING_SCORE_THRESHOLD {
            VerdictCategory::Warning
        } else {
            VerdictCategory::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictCategory::Safe => "SAFE",
            VerdictCategory::Warning => "WARNING",
            VerdictCategory::Dangerous => "DANGEROUS",
        }
    }

}

impl std::fmt::Display for VerdictCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// EXPLANATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FactorKind {
    /// Deterministic keyword/rule hit
    #[serde(alias = "trigger")]
    Trigger,
    /// Token weighted by the ML model
    #[serde(alias = "ml_factor")]
    MlFactor,
}

/// One token that pushed the score up or down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationFactor {
    #[serde(rename = "type")]
    pub kind: FactorKind,
    pub token: String,
    pub impact: f32,
}

impl ExplanationFactor {
    pub fn trigger(token: &str, impact: f32) -> Self {
        Self {
            kind: FactorKind::Trigger,
            token: token.to_string(),
            impact,
        }
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// Classification outcome for one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_scam: bool,
    /// Confidence that the message is fraudulent (0.0 - 1.0)
    pub score: f32,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<HashMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<ExplanationFactor>>,
}

impl Verdict {
    pub fn new(is_scam: bool, score: f32, reasons: Vec<String>) -> Self {
        Self {
            is_scam,
            score: score.clamp(0.0, 1.0),
            reasons,
            entities: None,
            explanation: None,
        }
    }

    pub fn with_entities(mut self, entities: Option<HashMap<String, Vec<String>>>) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_explanation(mut self, explanation: Option<Vec<ExplanationFactor>>) -> Self {
        self.explanation = explanation;
        self
    }

    pub fn category(&self) -> VerdictCategory {
        VerdictCategory::derive(self.is_scam, self.score)
    }

    pub fn is_warning(&self) -> bool {
        self.category() == VerdictCategory::Warning
    }

    /// WARNING or DANGEROUS
    pub fn needs_alert(&self) -> bool {
        self.category() != VerdictCategory::Safe
    }
}
