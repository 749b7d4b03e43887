//! Host Commands - API for the embedding app
//!
//! Notification intake, ad-hoc checks, history, feedback, trust list,
//! settings and protection status.

use std::collections::HashSet;

use uuid::Uuid;

use super::service::GuardianService;
use super::status::ServiceStatus;
use crate::constants::APP_VERSION;
use crate::error::{GuardianError, GuardianResult};
use crate::logic::history::{HistoryRecord, Stats};
use crate::logic::intake::PostedNotification;
use crate::logic::monitor::ProtectionSnapshot;
use crate::logic::remote::FeedbackResponse;
use crate::logic::settings::{Settings, ThemeMode};
use crate::logic::threat::Verdict;
use crate::logic::trust::TrustList;

impl GuardianService {
    // ========================================================================
    // DETECTION
    // ========================================================================

    /// Queue a posted notification; waits while the queue is full
    pub async fn on_notification_posted(&self, notification: PostedNotification) -> GuardianResult<()> {
        self.pipeline.submit(notification).await
    }

    /// Queue without waiting; false when the notification was dropped
    pub fn try_notification_posted(&self, notification: PostedNotification) -> GuardianResult<bool> {
        self.pipeline.try_submit(notification)
    }

    pub fn on_foreground_resumed(&self) {
        self.monitor.on_foreground_resumed();
    }

    /// User-requested check. `ClassifierUnavailable` is returned, not hidden.
    pub async fn check_text(&self, text: &str) -> GuardianResult<Verdict> {
        self.pipeline.check_text(text).await
    }

    pub fn dismiss_alert(&self, id: Uuid) -> bool {
        self.presenter.dismiss(id)
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    pub fn get_history(&self) -> Vec<HistoryRecord> {
        self.history.list()
    }

    pub fn get_history_record(&self, id: i64) -> GuardianResult<HistoryRecord> {
        self.history.get(id).ok_or(GuardianError::RecordNotFound(id))
    }

    pub fn delete_history(&self, ids: &[i64]) -> GuardianResult<usize> {
        let ids: HashSet<i64> = ids.iter().copied().collect();
        self.history.delete_by_ids(&ids)
    }

    pub fn clear_history(&self) -> GuardianResult<()> {
        self.history.clear()
    }

    pub fn get_stats(&self) -> Stats {
        self.history.stats()
    }

    // ========================================================================
    // FEEDBACK
    // ========================================================================

    /// "This was not a scam" for a flagged record; unflagged records are skipped
    pub async fn report_false_positive(&self, id: i64) -> GuardianResult<Option<FeedbackResponse>> {
        let record = self.get_history_record(id)?;
        if !record.is_scam {
            return Ok(None);
        }

        let response = self.remote.send_feedback(&record.text, false, record.score).await?;
        log::info!("False positive reported for record {}: {}", id, response.status);
        Ok(Some(response))
    }

    /// Report text the classifier missed
    pub async fn report_scam(&self, text: &str) -> GuardianResult<FeedbackResponse> {
        let response = self.remote.send_feedback(text, true, 0.0).await?;
        log::info!("Scam report sent: {}", response.status);
        Ok(response)
    }

    // ========================================================================
    // TRUST LIST
    // ========================================================================

    pub fn get_trust_list(&self) -> TrustList {
        (*self.trust.snapshot()).clone()
    }

    pub fn add_trusted_apps(&self, packages: &[String]) -> GuardianResult<()> {
        self.trust.add_trusted_apps(packages)
    }

    pub fn remove_trusted_apps(&self, packages: &[String]) -> GuardianResult<()> {
        self.trust.remove_trusted_apps(packages)
    }

    pub fn add_trusted_contacts(&self, names: &[String]) -> GuardianResult<()> {
        self.trust.add_trusted_contacts(names)
    }

    pub fn remove_trusted_contacts(&self, names: &[String]) -> GuardianResult<()> {
        self.trust.remove_trusted_contacts(names)
    }

    // ========================================================================
    // SETTINGS & STATUS
    // ========================================================================

    pub fn get_settings(&self) -> Settings {
        self.settings.get()
    }

    pub fn set_strict_mode(&self, enabled: bool) -> GuardianResult<()> {
        self.settings.set_strict_mode(enabled)
    }

    /// Persist the toggle, then let the monitor publish it
    pub fn set_protection_enabled(&self, enabled: bool) -> GuardianResult<()> {
        self.settings.set_protection_enabled(enabled)?;
        self.monitor.set_protection_enabled(enabled);
        log::info!("Protection {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> GuardianResult<()> {
        self.settings.set_theme_mode(mode)
    }

    pub fn get_protection(&self) -> ProtectionSnapshot {
        self.monitor.snapshot()
    }

    pub fn get_status(&self) -> ServiceStatus {
        let snapshot = self.monitor.snapshot();
        let trust = self.trust.snapshot();
        ServiceStatus {
            version: APP_VERSION.to_string(),
            protection: snapshot.status(),
            snapshot,
            stats: self.history.stats(),
            active_alerts: self.presenter.active_count(),
            trusted_apps: trust.apps.len(),
            trusted_contacts: trust.contacts.len(),
        }
    }
}
