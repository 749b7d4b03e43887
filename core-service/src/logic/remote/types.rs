//! Remote Classifier Wire Types
//!
//! Request/response bodies of the `predict` and `feedback` endpoints.
//! Data only, no logic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::logic::threat::ExplanationFactor;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictRequest {
    pub text: String,
    pub strict_mode: bool,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub is_scam: bool,
    pub score: f32,
    #[serde(default)]
    pub reason: Vec<String>,
    /// Free-form label from the server. Accepted but never trusted:
    /// the category is always derived from `is_scam`/`score`.
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub entities: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub explanation: Option<Vec<ExplanationFactor>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackRequest {
    pub text: String,
    pub is_scam_report: bool,
    pub original_score: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FeedbackResponse {
    pub status: String,
    pub message: String,
}
