//! Message Classifier
//!
//! Layered decision: deterministic local rules first, then the remote model,
//! then local escalation/softening of the model's answer.
//! Input: text, strict mode, source context
//! Output: Verdict

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::context::Message;
use super::rules::{
    self, INSECURE_PROTOCOL, INSECURE_PROTOCOL_SCORE, LINK_TOKEN, SECURE_PROTOCOL,
    SPAM_COMPOUND_SCORE, TRIGGER_IMPACT, TRUSTED_DOMAIN_SCORE, UNKNOWN_HTTPS_FLOOR,
    UNKNOWN_HTTPS_MAX_BASE,
};
use super::types::{ExplanationFactor, Verdict};
use crate::error::{GuardianError, GuardianResult};
use crate::logic::remote::{PredictResponse, RemoteClassifier};

const LINKS_ENTITY: &str = "links";

// ============================================================================
// ENGINE
// ============================================================================

pub struct ClassificationEngine {
    remote: Arc<dyn RemoteClassifier>,
    timeout: Duration,
}

impl ClassificationEngine {
    pub fn new(remote: Arc<dyn RemoteClassifier>, timeout: Duration) -> Self {
        Self { remote, timeout }
    }

    /// Main classification function
    ///
    /// Rules run in fixed order; the first terminal rule wins. A remote
    /// failure is returned as `ClassifierUnavailable`, never as "safe".
    pub async fn classify(
        &self,
        text: &str,
        strict_mode: bool,
        context: &[String],
    ) -> GuardianResult<Verdict> {
        // 1-2. Local overrides, no network
        if let Some(verdict) = classify_local(text) {
            log::debug!("Local override: {} ({:.2})", verdict.category(), verdict.score);
            return Ok(verdict);
        }

        // 3. Remote model
        let response = tokio::time::timeout(
            self.timeout,
            self.remote.predict(text, strict_mode, context),
        )
        .await
        .map_err(|_| {
            GuardianError::ClassifierUnavailable(format!(
                "no answer within {}s",
                self.timeout.as_secs_f32()
            ))
        })??;

        let base = verdict_from_response(response);
        log::debug!("Remote verdict: {} ({:.2})", base.category(), base.score);

        // 4-6. Post-processing of the model's answer
        Ok(apply_post_rules(text, base))
    }

    /// Classify a message using its origin labels as context
    pub async fn classify_message(&self, message: &Message, strict_mode: bool) -> GuardianResult<Verdict> {
        self.classify(&message.text, strict_mode, &message.source_context).await
    }
}

// ============================================================================
// DETERMINISTIC RULES
// ============================================================================

/// Rules 1 and 2: terminal verdicts that never consult the model
pub fn classify_local(text: &str) -> Option<Verdict> {
    let lowered = text.to_lowercase();

    // 1. Insecure protocol
    if lowered.contains(INSECURE_PROTOCOL) {
        let verdict = Verdict::new(
            true,
            INSECURE_PROTOCOL_SCORE,
            vec![
                rules::REASON_UNENCRYPTED.to_string(),
                rules::REASON_INTERCEPTION.to_string(),
            ],
        );
        return Some(attach_links(verdict, text));
    }

    // 2. Trusted domain
    if let Some(domain) = rules::find_safe_domain(&lowered) {
        let verdict = Verdict::new(
            false,
            TRUSTED_DOMAIN_SCORE,
            vec![format!("{}: {}", rules::REASON_TRUSTED_DOMAIN, domain)],
        );
        return Some(attach_links(verdict, text));
    }

    None
}

/// Rules 4 and 5, applied to the remote model's verdict
pub fn apply_post_rules(text: &str, base: Verdict) -> Verdict {
    let lowered = text.to_lowercase();

    // 4. Link + spam keyword => always dangerous
    let keywords = rules::find_spam_keywords(&lowered);
    if lowered.contains(LINK_TOKEN) && !keywords.is_empty() {
        let mut reasons = vec![
            rules::REASON_SPAM_LINK.to_string(),
            rules::REASON_SPAM_PATTERN.to_string(),
        ];
        reasons.extend(base.reasons);

        let mut explanation: Vec<ExplanationFactor> = keywords
            .iter()
            .map(|k| ExplanationFactor::trigger(k, TRIGGER_IMPACT))
            .collect();
        explanation.extend(base.explanation.unwrap_or_default());

        let verdict = Verdict::new(true, SPAM_COMPOUND_SCORE, reasons)
            .with_entities(base.entities)
            .with_explanation(Some(explanation));
        return attach_links(verdict, text);
    }

    // 5. Unknown HTTPS link => at least a warning
    if lowered.contains(SECURE_PROTOCOL)
        && rules::find_safe_domain(&lowered).is_none()
        && base.score <= UNKNOWN_HTTPS_MAX_BASE
        && !base.is_scam
    {
        let mut verdict = base;
        verdict.reasons.push(rules::REASON_UNKNOWN_LINK.to_string());
        verdict.reasons.push(rules::REASON_CHECK_SOURCE.to_string());
        verdict.score = verdict.score.max(UNKNOWN_HTTPS_FLOOR);
        return attach_links(verdict, text);
    }

    // 6. Unchanged
    base
}

fn verdict_from_response(response: PredictResponse) -> Verdict {
    Verdict::new(response.is_scam, response.score, response.reason)
        .with_entities(response.entities)
        .with_explanation(response.explanation)
}

/// Add the message's URLs as a `links` entity unless the model already did
fn attach_links(mut verdict: Verdict, text: &str) -> Verdict {
    let links = rules::extract_links(text);
    if links.is_empty() {
        return verdict;
    }

    let entities = verdict.entities.get_or_insert_with(HashMap::new);
    entities.entry(LINKS_ENTITY.to_string()).or_insert(links);
    verdict
}

// ============================================================================
// TESTS
// ============================================================================
