//! Classifier API Client
//!
//! HTTP client for communicating with the Guardian classifier server.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{FeedbackRequest, FeedbackResponse, PredictRequest, PredictResponse};
use super::RemoteClassifier;

/// Classifier server configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        use crate::constants;

        Self {
            server_url: constants::get_server_url(),
            timeout_seconds: constants::get_timeout_secs(),
        }
    }
}

/// Classifier API client
pub struct HttpClassifierClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl HttpClassifierClient {
    /// Create new classifier client
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.server_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl RemoteClassifier for HttpClassifierClient {
    async fn predict(
        &self,
        text: &str,
        strict_mode: bool,
        context: &[String],
    ) -> Result<PredictResponse, ClientError> {
        let request = PredictRequest {
            text: text.to_string(),
            strict_mode,
            context: context.to_vec(),
        };

        let response = self.http_client
            .post(self.endpoint("predict"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            response.json().await
                .map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            Err(ClientError::ServerError(response.status().as_u16()))
        }
    }

    async fn send_feedback(
        &self,
        text: &str,
        is_scam_report: bool,
        original_score: f32,
    ) -> Result<FeedbackResponse, ClientError> {
        let request = FeedbackRequest {
            text: text.to_string(),
            is_scam_report,
            original_score,
        };

        log::info!("Sending feedback (scam report: {})", is_scam_report);

        let response = self.http_client
            .post(self.endpoint("feedback"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            response.json().await
                .map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Feedback rejected ({}): {}", status, error_text);
            Err(ClientError::ServerError(status))
        }
    }
}

/// Classifier client errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpClassifierClient {
        HttpClassifierClient::new(ClientConfig {
            server_url: server.uri(),
            timeout_seconds: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_predict_sends_wire_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(json!({
                "text": "Ваш код 1234",
                "strict_mode": true,
                "context": ["Messages"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "is_scam": false,
                "score": 0.2,
                "reason": ["Looks like an OTP"],
                "verdict": "SAFE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let resp = client
            .predict("Ваш код 1234", true, &["Messages".to_string()])
            .await
            .unwrap();

        assert!(!resp.is_scam);
        assert_eq!(resp.reason, vec!["Looks like an OTP".to_string()]);
    }

    #[tokio::test]
    async fn test_predict_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.predict("hi", false, &[]).await.unwrap_err();
        assert_eq!(err, ClientError::ServerError(503));
        assert!(!client.ping().await);
    }

    #[tokio::test]
    async fn test_ping_uses_sentinel_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(json!({"text": "ping", "strict_mode": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "is_scam": false, "score": 0.0, "reason": [], "verdict": "SAFE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client_for(&server).ping().await);
    }

    #[tokio::test]
    async fn test_feedback_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_partial_json(json!({"is_scam_report": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok", "message": "thanks"
            })))
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .send_feedback("Привет", false, 0.97)
            .await
            .unwrap();
        assert_eq!(resp.status, "ok");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = HttpClassifierClient::new(ClientConfig {
            server_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();

        let err = client.predict("hi", false, &[]).await.unwrap_err();
        assert!(matches!(err, ClientError::NetworkError(_)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ClientError::ServerError(503).to_string(), "Server error: 503");
        let err: crate::error::GuardianError = ClientError::NetworkError("refused".into()).into();
        assert!(err.is_unavailable());
        assert_eq!(err.to_string(), "Classifier unavailable: Network error: refused");
    }
}
