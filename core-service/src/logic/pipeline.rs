//! Notification Pipeline
//!
//! Posted notifications go through a bounded queue to one consumer task:
//! intake filter -> classify -> history -> alert. Events are handled one
//! at a time in arrival order. Classifier failures drop the event.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::error::{GuardianError, GuardianResult};
use crate::logic::alert::{AlertPresenter, PresentOutcome};
use crate::logic::history::HistoryStore;
use crate::logic::intake::{self, AppLabelResolver, IntakeDecision, PostedNotification, RejectReason};
use crate::logic::settings::SettingsStore;
use crate::logic::threat::{ClassificationEngine, Message, Verdict};
use crate::logic::trust::TrustListStore;

/// What happened to one posted notification
#[derive(Debug)]
pub enum ProcessOutcome {
    Rejected(RejectReason),
    /// Classifier failed; nothing recorded, nothing shown
    Dropped,
    Classified {
        verdict: Verdict,
        alert: PresentOutcome,
    },
}

/// Everything one notification needs on its way through
pub struct PipelineContext {
    pub engine: Arc<ClassificationEngine>,
    pub trust: Arc<TrustListStore>,
    pub settings: Arc<SettingsStore>,
    pub history: Arc<HistoryStore>,
    pub presenter: Arc<AlertPresenter>,
    pub labels: Arc<dyn AppLabelResolver>,
    pub self_package: String,
}

impl PipelineContext {
    pub async fn process(&self, notification: &PostedNotification) -> ProcessOutcome {
        let decision = intake::should_process(
            notification,
            &self.trust.snapshot(),
            self.settings.is_protection_enabled(),
            &self.self_package,
            self.labels.as_ref(),
        );

        let message = match decision {
            IntakeDecision::Proceed(message) => message,
            IntakeDecision::Reject(reason) => return ProcessOutcome::Rejected(reason),
        };

        let strict_mode = self.settings.is_strict_mode();
        let verdict = match self.engine.classify_message(&message, strict_mode).await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Dropping notification from {}: {}", notification.source_app, e);
                return ProcessOutcome::Dropped;
            }
        };

        log::info!(
            "Notification from {} classified {} ({:.2})",
            notification.source_app,
            verdict.category(),
            verdict.score
        );

        if let Err(e) = self.history.record_from_verdict(&message.text, &verdict) {
            log::error!("Failed to record history: {}", e);
        }

        let alert = self.presenter.present(&verdict);
        ProcessOutcome::Classified { verdict, alert }
    }

    /// Ad-hoc check requested by the user. Failures are surfaced, no alert.
    pub async fn check_text(&self, text: &str) -> GuardianResult<Verdict> {
        let verdict = self
            .engine
            .classify_message(&Message::new(text), self.settings.is_strict_mode())
            .await?;

        if let Err(e) = self.history.record_from_verdict(text, &verdict) {
            log::error!("Failed to record history: {}", e);
        }
        Ok(verdict)
    }
}

pub struct NotificationPipeline {
    context: Arc<PipelineContext>,
    sender: Mutex<Option<mpsc::Sender<PostedNotification>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationPipeline {
    /// Spawn the consumer task. Must be called from within a tokio runtime.
    pub fn spawn(context: Arc<PipelineContext>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<PostedNotification>(capacity.max(1));
        let ctx = context.clone();

        let worker = tokio::spawn(async move {
            log::info!("Notification pipeline started (queue {})", capacity);
            while let Some(notification) = rx.recv().await {
                ctx.process(&notification).await;
            }
            log::info!("Notification pipeline drained");
        });

        Self {
            context,
            sender: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        }
    }

    pub fn context(&self) -> &Arc<PipelineContext> {
        &self.context
    }

    fn sender(&self) -> GuardianResult<mpsc::Sender<PostedNotification>> {
        self.sender.lock().clone().ok_or(GuardianError::PipelineClosed)
    }

    /// Enqueue, waiting for capacity
    pub async fn submit(&self, notification: PostedNotification) -> GuardianResult<()> {
        self.sender()?
            .send(notification)
            .await
            .map_err(|_| GuardianError::PipelineClosed)
    }

    /// Enqueue without waiting; returns false when the queue is full
    pub fn try_submit(&self, notification: PostedNotification) -> GuardianResult<bool> {
        match self.sender()?.try_send(notification) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(n)) => {
                log::warn!("Intake queue full, dropping notification from {}", n.source_app);
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => Err(GuardianError::PipelineClosed),
        }
    }

    pub async fn check_text(&self, text: &str) -> GuardianResult<Verdict> {
        self.context.check_text(text).await
    }

    /// Close the queue and wait until every queued event is processed
    pub async fn shutdown(&self) {
        self.sender.lock().take();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                log::error!("Notification pipeline task failed: {}", e);
            }
        }
    }
}
