//! Intake Filter
//!
//! Pure decision over caller-supplied state: no network, no storage.

use std::collections::HashMap;

use super::rules::{is_background_chatter, is_system_package, merge_text};
use super::types::{IntakeDecision, PostedNotification, RejectReason};
use crate::logic::threat::Message;
use crate::logic::trust::TrustList;

/// Resolves a package id to the label shown to users
pub trait AppLabelResolver: Send + Sync {
    fn label_for(&self, package: &str) -> Option<String>;
}

/// Fixed package -> label table supplied by the host
#[derive(Debug, Clone, Default)]
pub struct StaticLabels {
    labels: HashMap<String, String>,
}

impl StaticLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, package: &str, label: &str) -> Self {
        self.labels.insert(package.to_string(), label.to_string());
        self
    }
}

impl AppLabelResolver for StaticLabels {
    fn label_for(&self, package: &str) -> Option<String> {
        self.labels.get(package).cloned()
    }
}

/// Label for `package`, or the raw id when resolution fails
pub fn resolve_label(resolver: &dyn AppLabelResolver, package: &str) -> String {
    resolver
        .label_for(package)
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| package.to_string())
}

/// Decide whether a posted notification goes to the classifier.
/// Checks short-circuit in a fixed order; trust always wins over analysis.
pub fn should_process(
    notification: &PostedNotification,
    trust: &TrustList,
    protection_enabled: bool,
    self_package: &str,
    labels: &dyn AppLabelResolver,
) -> IntakeDecision {
    let decision = evaluate(notification, trust, protection_enabled, self_package, labels);
    if let IntakeDecision::Reject(reason) = &decision {
        log::debug!("Intake rejected {}: {}", notification.source_app, reason);
    }
    decision
}

fn evaluate(
    notification: &PostedNotification,
    trust: &TrustList,
    protection_enabled: bool,
    self_package: &str,
    labels: &dyn AppLabelResolver,
) -> IntakeDecision {
    let package = notification.source_app.as_str();

    if !protection_enabled {
        return IntakeDecision::Reject(RejectReason::ProtectionDisabled);
    }
    if trust.is_trusted_app(package) {
        return IntakeDecision::Reject(RejectReason::TrustedApp);
    }
    if is_system_package(package, self_package) {
        return IntakeDecision::Reject(RejectReason::SystemPackage);
    }
    if trust.matching_contact(&notification.title).is_some() {
        return IntakeDecision::Reject(RejectReason::TrustedContact);
    }
    if notification.body.trim().is_empty() {
        return IntakeDecision::Reject(RejectReason::EmptyBody);
    }

    let merged_text = merge_text(&notification.title, &notification.body);
    if is_background_chatter(&merged_text) {
        return IntakeDecision::Reject(RejectReason::BackgroundService);
    }

    IntakeDecision::Proceed(Message::new(&merged_text).with_source(&resolve_label(labels, package)))
}
