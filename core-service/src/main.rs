//! Guardian AI Core - Daemon Entry Point
//!
//! Reads newline-delimited JSON host events from stdin and writes results,
//! alert transitions and protection changes to stdout, one JSON per line.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use uuid::Uuid;

use guardian_core::constants::{APP_NAME, APP_VERSION};
use guardian_core::logic::alert::{AlertInstance, AlertSeverity, OverlaySurface};
use guardian_core::logic::config::GuardianConfig;
use guardian_core::logic::events::{self, HostEvent, OutputEvent};
use guardian_core::logic::intake::StaticLabels;
use guardian_core::logic::monitor::PermissionProbe;
use guardian_core::{GuardianResult, GuardianService, PlatformDeps};

const WRITER_GRACE: Duration = Duration::from_secs(2);

/// Alerts rendered as log lines; transitions go to stdout separately
struct ConsoleSurface;

impl OverlaySurface for ConsoleSurface {
    fn can_draw_overlays(&self) -> bool {
        true
    }

    fn show(&self, alert: &AlertInstance) {
        log::warn!("[{}] {}", alert.severity.as_str(), alert.message);
    }

    fn begin_exit(&self, id: Uuid) {
        log::debug!("Alert {} closing", id);
    }

    fn remove(&self, id: Uuid) {
        log::debug!("Alert {} removed", id);
    }

    fn fallback_notice(&self, message: &str, severity: AlertSeverity) {
        log::warn!("[{}] {}", severity.as_str(), message);
    }
}

/// The daemon is fed by the host's listener, so the permission is implied
struct HostListener;

impl PermissionProbe for HostListener {
    fn is_listener_enabled(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} core v{}...", APP_NAME, APP_VERSION);

    if let Err(e) = run().await {
        log::error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> GuardianResult<()> {
    let config = GuardianConfig::from_env();
    log::info!("Data directory: {}", config.data_dir.display());

    let platform = PlatformDeps {
        surface: Arc::new(ConsoleSurface),
        permission: Arc::new(HostListener),
        labels: Arc::new(StaticLabels::new()),
    };
    let service = Arc::new(GuardianService::start(config, platform)?);

    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutputEvent>();
    let writer = tokio::spawn(write_output(out_rx));
    forward_alerts(&service, out_tx.clone());
    forward_protection(&service, out_tx.clone());

    let mut checks = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            Some(done) = checks.join_next() => {
                if let Err(e) = done {
                    log::error!("Text check task failed: {}", e);
                }
                continue;
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                None
            }
        };
        let Some(line) = line else { break };

        match events::parse_line(&line) {
            Ok(Some(event)) => handle_event(&service, event, &out_tx, &mut checks).await,
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring malformed event: {}", e),
        }
    }

    // In-flight checks still owe a reply
    finish_checks(&mut checks).await;
    service.shutdown().await;

    // Forwarders end once the service and its alert tasks are gone
    drop(service);
    drop(out_tx);
    if tokio::time::timeout(WRITER_GRACE, writer).await.is_err() {
        log::warn!("Output writer did not finish in time");
    }
    Ok(())
}

async fn handle_event(
    service: &Arc<GuardianService>,
    event: HostEvent,
    out: &mpsc::UnboundedSender<OutputEvent>,
    checks: &mut JoinSet<()>,
) {
    log::debug!("Host event: {}", event.name());
    match event {
        HostEvent::NotificationPosted(notification) => {
            if let Err(e) = service.on_notification_posted(notification).await {
                log::error!("Notification not queued: {}", e);
            }
        }
        HostEvent::ForegroundResumed => service.on_foreground_resumed(),
        HostEvent::CheckText { text } => {
            let service = service.clone();
            let out = out.clone();
            checks.spawn(async move {
                let reply = match service.check_text(&text).await {
                    Ok(verdict) => OutputEvent::check_result(&text, verdict),
                    Err(e) => OutputEvent::CheckFailed {
                        text,
                        error: e.to_string(),
                    },
                };
                let _ = out.send(reply);
            });
        }
        HostEvent::DismissAlert { id } => {
            if !service.dismiss_alert(id) {
                log::debug!("Alert {} already gone", id);
            }
        }
    }
}

async fn finish_checks(checks: &mut JoinSet<()>) {
    if !checks.is_empty() {
        log::info!("Waiting for {} text checks", checks.len());
    }
    while let Some(done) = checks.join_next().await {
        if let Err(e) = done {
            log::error!("Text check task failed: {}", e);
        }
    }
}

fn forward_alerts(service: &GuardianService, out: mpsc::UnboundedSender<OutputEvent>) {
    let mut alerts = service.subscribe_alerts();
    tokio::spawn(async move {
        loop {
            match alerts.recv().await {
                Ok(event) => {
                    if out.send(OutputEvent::Alert(event)).is_err() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    log::warn!("Alert stream lagged, {} events skipped", n);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

fn forward_protection(service: &GuardianService, out: mpsc::UnboundedSender<OutputEvent>) {
    let mut protection = service.subscribe_protection();
    tokio::spawn(async move {
        while protection.changed().await.is_ok() {
            let snapshot = *protection.borrow_and_update();
            if out.send(OutputEvent::protection(snapshot)).is_err() {
                break;
            }
        }
    });
}

async fn write_output(mut rx: mpsc::UnboundedReceiver<OutputEvent>) {
    while let Some(event) = rx.recv().await {
        match event.to_line() {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("Failed to encode output: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use guardian_core::logic::remote::{ClientError, FeedbackResponse, PredictResponse, RemoteClassifier};
    use guardian_core::logic::storage::MemoryStore;

    /// Answers after a fixed delay
    struct SlowClassifier(Duration);

    #[async_trait]
    impl RemoteClassifier for SlowClassifier {
        async fn predict(
            &self,
            _text: &str,
            _strict_mode: bool,
            _context: &[String],
        ) -> Result<PredictResponse, ClientError> {
            tokio::time::sleep(self.0).await;
            Ok(PredictResponse {
                is_scam: true,
                score: 0.93,
                reason: vec!["model".to_string()],
                verdict: None,
                entities: None,
                explanation: None,
            })
        }

        async fn send_feedback(
            &self,
            _text: &str,
            _is_scam_report: bool,
            _original_score: f32,
        ) -> Result<FeedbackResponse, ClientError> {
            Err(ClientError::ServerError(501))
        }
    }

    fn service() -> Arc<GuardianService> {
        let platform = PlatformDeps {
            surface: Arc::new(ConsoleSurface),
            permission: Arc::new(HostListener),
            labels: Arc::new(StaticLabels::new()),
        };
        Arc::new(GuardianService::start_with(
            GuardianConfig::default(),
            platform,
            Arc::new(MemoryStore::new()),
            Arc::new(SlowClassifier(Duration::from_secs(5))),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_check_replies_before_shutdown() {
        let service = service();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let mut checks = JoinSet::new();

        let event = HostEvent::CheckText {
            text: "Ваша карта заблокирована".to_string(),
        };
        handle_event(&service, event, &out_tx, &mut checks).await;
        assert_eq!(checks.len(), 1);

        finish_checks(&mut checks).await;
        service.shutdown().await;

        match out_rx.try_recv() {
            Ok(OutputEvent::CheckResult { verdict, .. }) => assert!(verdict.is_scam),
            other => panic!("expected a check result, got {:?}", other),
        }
        assert_eq!(service.get_history().len(), 1);
    }
}
