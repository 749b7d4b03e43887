//! Scripted classifier for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ClientError, FeedbackResponse, PredictResponse, RemoteClassifier};

pub(crate) struct ScriptedClassifier {
    default: Mutex<Result<PredictResponse, ClientError>>,
    queued: Mutex<VecDeque<Result<PredictResponse, ClientError>>>,
    delay: Option<Duration>,
    reachable: AtomicBool,
    predict_calls: AtomicUsize,
    pub feedback: Mutex<Vec<(String, bool, f32)>>,
    pub last_request: Mutex<Option<(String, bool, Vec<String>)>>,
}

impl ScriptedClassifier {
    pub fn returning(is_scam: bool, score: f32) -> Self {
        Self::with_result(Ok(response(is_scam, score)))
    }

    pub fn failing() -> Self {
        Self::with_result(Err(ClientError::NetworkError("connection refused".into())))
    }

    pub fn with_result(result: Result<PredictResponse, ClientError>) -> Self {
        Self {
            default: Mutex::new(result),
            queued: Mutex::new(VecDeque::new()),
            delay: None,
            reachable: AtomicBool::new(true),
            predict_calls: AtomicUsize::new(0),
            feedback: Mutex::new(Vec::new()),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, result: Result<PredictResponse, ClientError>) {
        self.queued.lock().push_back(result);
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }
}

pub(crate) fn response(is_scam: bool, score: f32) -> PredictResponse {
    PredictResponse {
        is_scam,
        score,
        reason: vec!["model".to_string()],
        verdict: None,
        entities: None,
        explanation: None,
    }
}

#[async_trait]
impl RemoteClassifier for ScriptedClassifier {
    async fn predict(
        &self,
        text: &str,
        strict_mode: bool,
        context: &[String],
    ) -> Result<PredictResponse, ClientError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some((text.to_string(), strict_mode, context.to_vec()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.queued.lock().pop_front();
        match queued {
            Some(result) => result,
            None => self.default.lock().clone(),
        }
    }

    async fn send_feedback(
        &self,
        text: &str,
        is_scam_report: bool,
        original_score: f32,
    ) -> Result<FeedbackResponse, ClientError> {
        self.feedback.lock().push((text.to_string(), is_scam_report, original_score));
        Ok(FeedbackResponse {
            status: "ok".to_string(),
            message: "recorded".to_string(),
        })
    }

    async fn ping(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}
