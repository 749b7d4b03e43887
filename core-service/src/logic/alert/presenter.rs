//! Alert Presenter
//!
//! Each shown alert owns one task: wait for the auto-dismiss timer or a
//! user dismiss (whichever comes first), run the exit transition, release.
//! The dismiss token is only observed while SHOWING, so late dismisses and
//! a timer firing after a dismiss have no effect.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::types::{
    AlertEvent, AlertInstance, AlertSeverity, AlertState, AlertTimings, DismissTrigger,
};
use crate::error::{GuardianError, GuardianResult};
use crate::logic::threat::Verdict;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Renderer boundary (system overlay, console, test recorder)
pub trait OverlaySurface: Send + Sync {
    /// "Draw over other apps" capability
    fn can_draw_overlays(&self) -> bool;
    fn show(&self, alert: &AlertInstance);
    fn begin_exit(&self, id: Uuid);
    fn remove(&self, id: Uuid);
    /// Transient notice used when overlays are unavailable
    fn fallback_notice(&self, message: &str, severity: AlertSeverity);
}

#[derive(Debug)]
pub enum PresentOutcome {
    Shown(AlertHandle),
    Fallback,
    /// SAFE verdict
    NotAlerted,
}

impl PresentOutcome {
    pub fn handle(self) -> Option<AlertHandle> {
        match self {
            PresentOutcome::Shown(handle) => Some(handle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertHandle {
    id: Uuid,
    state: watch::Receiver<AlertState>,
    dismiss: CancellationToken,
}

impl AlertHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> AlertState {
        *self.state.borrow()
    }

    /// User acknowledgment; no-op once the alert left SHOWING
    pub fn dismiss(&self) {
        self.dismiss.cancel();
    }

    pub async fn wait_hidden(&mut self) {
        // Sender dropped means the task finished, which only happens at HIDDEN
        let _ = self.state.wait_for(|s| *s == AlertState::Hidden).await;
    }
}

pub struct AlertPresenter {
    surface: Arc<dyn OverlaySurface>,
    timings: AlertTimings,
    events: broadcast::Sender<AlertEvent>,
    active: Arc<Mutex<HashMap<Uuid, CancellationToken>>>,
}

impl AlertPresenter {
    pub fn new(surface: Arc<dyn OverlaySurface>, timings: AlertTimings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            surface,
            timings,
            events,
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.events.subscribe()
    }

    /// Number of alerts not yet HIDDEN
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    /// Start presenting `verdict`. Must be called from within a tokio runtime.
    /// `PermissionUnavailable` when the host may not draw overlays
    pub fn overlay_available(&self) -> GuardianResult<()> {
        if self.surface.can_draw_overlays() {
            Ok(())
        } else {
            Err(GuardianError::PermissionUnavailable)
        }
    }

    pub fn present(&self, verdict: &Verdict) -> PresentOutcome {
        let Some(severity) = AlertSeverity::for_verdict(verdict) else {
            return PresentOutcome::NotAlerted;
        };

        if let Err(e) = self.overlay_available() {
            log::warn!("{}, showing fallback notice", e);
            self.surface.fallback_notice(severity.message(), severity);
            return PresentOutcome::Fallback;
        }

        let alert = AlertInstance::new(severity);
        let id = alert.id;
        let token = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(AlertState::Showing);

        self.active.lock().insert(id, token.clone());
        self.surface.show(&alert);
        log::debug!("Alert {} SHOWING ({})", id, severity.as_str());
        let _ = self.events.send(AlertEvent {
            id,
            state: AlertState::Showing,
            trigger: None,
        });

        tokio::spawn(run_alert(
            id,
            self.timings,
            token.clone(),
            state_tx,
            self.surface.clone(),
            self.events.clone(),
            self.active.clone(),
        ));

        PresentOutcome::Shown(AlertHandle {
            id,
            state: state_rx,
            dismiss: token,
        })
    }

    /// Dismiss by id; false when the alert is unknown or already gone
    pub fn dismiss(&self, id: Uuid) -> bool {
        match self.active.lock().get(&id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn dismiss_all(&self) {
        for token in self.active.lock().values() {
            token.cancel();
        }
    }
}

async fn run_alert(
    id: Uuid,
    timings: AlertTimings,
    token: CancellationToken,
    state: watch::Sender<AlertState>,
    surface: Arc<dyn OverlaySurface>,
    events: broadcast::Sender<AlertEvent>,
    active: Arc<Mutex<HashMap<Uuid, CancellationToken>>>,
) {
    let trigger = tokio::select! {
        _ = tokio::time::sleep(timings.auto_dismiss) => DismissTrigger::Timer,
        _ = token.cancelled() => DismissTrigger::User,
    };

    state.send_replace(AlertState::Dismissing);
    surface.begin_exit(id);
    log::debug!("Alert {} DISMISSING ({:?})", id, trigger);
    let _ = events.send(AlertEvent {
        id,
        state: AlertState::Dismissing,
        trigger: Some(trigger),
    });

    tokio::time::sleep(timings.exit).await;

    surface.remove(id);
    active.lock().remove(&id);
    state.send_replace(AlertState::Hidden);
    log::debug!("Alert {} HIDDEN", id);
    let _ = events.send(AlertEvent {
        id,
        state: AlertState::Hidden,
        trigger: None,
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;
    use crate::logic::alert::testing::RecordingSurface;

    fn presenter(surface: Arc<RecordingSurface>) -> AlertPresenter {
        AlertPresenter::new(surface, AlertTimings::default())
    }

    fn scam() -> Verdict {
        Verdict::new(true, 0.95, vec![])
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_after_timer() {
        let surface = Arc::new(RecordingSurface::default());
        let presenter = presenter(surface.clone());
        let mut events = presenter.subscribe();

        let start = Instant::now();
        let mut handle = presenter.present(&scam()).handle().unwrap();
        assert_eq!(handle.state(), AlertState::Showing);

        let showing = events.recv().await.unwrap();
        assert_eq!(showing.state, AlertState::Showing);

        let dismissing = events.recv().await.unwrap();
        assert_eq!(dismissing.state, AlertState::Dismissing);
        assert_eq!(dismissing.trigger, Some(DismissTrigger::Timer));
        assert!(start.elapsed() >= Duration::from_millis(6000));
        assert!(start.elapsed() < Duration::from_millis(6100));

        handle.wait_hidden().await;
        assert!(start.elapsed() >= Duration::from_millis(6400));
        assert_eq!(handle.state(), AlertState::Hidden);
        assert_eq!(presenter.active_count(), 0);
        assert_eq!(
            surface.calls(),
            vec!["show:Scam / spam detected", "exit", "remove"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_dismiss_cancels_timer() {
        let surface = Arc::new(RecordingSurface::default());
        let presenter = presenter(surface.clone());
        let mut events = presenter.subscribe();

        let mut handle = presenter.present(&scam()).handle().unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        handle.dismiss();
        handle.dismiss();
        handle.wait_hidden().await;

        // Well past the original 6s deadline
        tokio::time::sleep(Duration::from_secs(10)).await;

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push((event.state, event.trigger));
        }
        assert_eq!(
            seen,
            vec![
                (AlertState::Showing, None),
                (AlertState::Dismissing, Some(DismissTrigger::User)),
                (AlertState::Hidden, None),
            ]
        );
        assert_eq!(surface.calls().iter().filter(|c| *c == "exit").count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_while_dismissing_is_noop() {
        let surface = Arc::new(RecordingSurface::default());
        let presenter = presenter(surface.clone());

        let mut handle = presenter.present(&scam()).handle().unwrap();
        let id = handle.id();
        assert!(presenter.dismiss(id));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.state(), AlertState::Dismissing);

        assert!(presenter.dismiss(id));
        handle.wait_hidden().await;
        assert!(!presenter.dismiss(id));
        assert_eq!(surface.calls(), vec!["show:Scam / spam detected", "exit", "remove"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alerts_are_independent() {
        let surface = Arc::new(RecordingSurface::default());
        let presenter = presenter(surface.clone());

        let first = presenter.present(&scam()).handle().unwrap();
        let mut second = presenter
            .present(&Verdict::new(false, 0.6, vec![]))
            .handle()
            .unwrap();
        assert_eq!(presenter.active_count(), 2);

        second.dismiss();
        second.wait_hidden().await;
        assert_eq!(first.state(), AlertState::Showing);
        assert_eq!(presenter.active_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_without_overlay_permission() {
        let surface = Arc::new(RecordingSurface::without_overlay());
        let presenter = presenter(surface.clone());
        assert!(matches!(
            presenter.overlay_available(),
            Err(GuardianError::PermissionUnavailable)
        ));

        assert!(matches!(
            presenter.present(&Verdict::new(false, 0.7, vec![])),
            PresentOutcome::Fallback
        ));
        assert_eq!(presenter.active_count(), 0);
        assert_eq!(
            surface.calls(),
            vec!["fallback:Do not follow links from unknown sources!"]
        );
    }

    #[tokio::test]
    async fn test_safe_verdict_not_alerted() {
        let surface = Arc::new(RecordingSurface::default());
        let presenter = presenter(surface.clone());

        assert!(matches!(
            presenter.present(&Verdict::new(false, 0.2, vec![])),
            PresentOutcome::NotAlerted
        ));
        assert!(surface.calls().is_empty());
    }
}
