//! Remote Classifier Module
//!
//! Boundary to the opaque ML classifier service:
//! - `predict` for message classification
//! - `feedback` for user corrections
//! - `ping` reachability probe used by the protection monitor

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

pub use client::{ClientConfig, ClientError, HttpClassifierClient};
pub use types::{FeedbackRequest, FeedbackResponse, PredictRequest, PredictResponse};

use crate::constants::PING_TEXT;

/// Remote classifier service
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    async fn predict(
        &self,
        text: &str,
        strict_mode: bool,
        context: &[String],
    ) -> Result<PredictResponse, ClientError>;

    async fn send_feedback(
        &self,
        text: &str,
        is_scam_report: bool,
        original_score: f32,
    ) -> Result<FeedbackResponse, ClientError>;

    /// Lightweight reachability probe. Any failure means unreachable.
    async fn ping(&self) -> bool {
        self.predict(PING_TEXT, false, &[]).await.is_ok()
    }
}
