//! Protection Monitor
//!
//! Background loop probing classifier reachability every poll interval, plus
//! listener-permission re-checks on foreground resume. Consumers read
//! `ProtectionSnapshot`s from a watch channel.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::logic::remote::RemoteClassifier;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// OS-level notification-listener permission
pub trait PermissionProbe: Send + Sync {
    fn is_listener_enabled(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionState {
    pub permission_granted: bool,
    pub server_reachable: bool,
    pub protection_enabled_by_user: bool,
}

impl ProtectionState {
    pub fn effective_protection(&self) -> bool {
        self.permission_granted && self.server_reachable && self.protection_enabled_by_user
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionSnapshot {
    pub state: ProtectionState,
    /// True until the first reachability probe completes
    pub checking: bool,
}

impl ProtectionSnapshot {
    pub fn status(&self) -> ProtectionStatus {
        ProtectionStatus::from_snapshot(self)
    }
}

/// Headline shown by status UIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionStatus {
    Checking,
    Disabled,
    PermissionMissing,
    ServerUnreachable,
    Active,
}

impl ProtectionStatus {
    pub fn from_snapshot(snapshot: &ProtectionSnapshot) -> Self {
        let state = &snapshot.state;
        if snapshot.checking {
            ProtectionStatus::Checking
        } else if !state.protection_enabled_by_user {
            ProtectionStatus::Disabled
        } else if !state.permission_granted {
            ProtectionStatus::PermissionMissing
        } else if !state.server_reachable {
            ProtectionStatus::ServerUnreachable
        } else {
            ProtectionStatus::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectionStatus::Checking => "checking",
            ProtectionStatus::Disabled => "disabled",
            ProtectionStatus::PermissionMissing => "permission_missing",
            ProtectionStatus::ServerUnreachable => "server_unreachable",
            ProtectionStatus::Active => "active",
        }
    }
}

impl std::fmt::Display for ProtectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// MONITOR
// ============================================================================

pub struct ProtectionMonitor {
    remote: Arc<dyn RemoteClassifier>,
    permission: Arc<dyn PermissionProbe>,
    poll_interval: Duration,
    probe_timeout: Duration,
    snapshot: Arc<watch::Sender<ProtectionSnapshot>>,
    running: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl ProtectionMonitor {
    pub fn new(
        remote: Arc<dyn RemoteClassifier>,
        permission: Arc<dyn PermissionProbe>,
        poll_interval: Duration,
        probe_timeout: Duration,
        protection_enabled: bool,
    ) -> Self {
        let initial = ProtectionSnapshot {
            state: ProtectionState {
                permission_granted: permission.is_listener_enabled(),
                server_reachable: false,
                protection_enabled_by_user: protection_enabled,
            },
            checking: true,
        };
        let (tx, _) = watch::channel(initial);

        Self {
            remote,
            permission,
            poll_interval,
            probe_timeout,
            snapshot: Arc::new(tx),
            running: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProtectionSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> ProtectionSnapshot {
        *self.snapshot.borrow()
    }

    pub fn status(&self) -> ProtectionStatus {
        self.snapshot().status()
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Spawn the polling loop; a second call while running is a no-op
    pub fn start(&self) {
        let mut running = self.running.lock();
        if running.is_some() {
            return;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.remote.clone(),
            self.snapshot.clone(),
            self.poll_interval,
            self.probe_timeout,
            token.clone(),
        ));
        *running = Some((token, handle));
        log::info!("Protection monitor started (every {:?})", self.poll_interval);
    }

    /// Cancel the loop and wait for it to exit
    pub async fn stop(&self) {
        let running = self.running.lock().take();
        if let Some((token, handle)) = running {
            token.cancel();
            if let Err(e) = handle.await {
                log::error!("Protection monitor task failed: {}", e);
            }
            log::info!("Protection monitor stopped");
        }
    }

    /// Lifecycle signal from the host; permission may have changed in settings
    pub fn on_foreground_resumed(&self) {
        let granted = self.permission.is_listener_enabled();
        self.snapshot.send_if_modified(|s| {
            if s.state.permission_granted == granted {
                return false;
            }
            log::info!("Listener permission: {}", if granted { "granted" } else { "missing" });
            s.state.permission_granted = granted;
            true
        });
    }

    pub fn set_protection_enabled(&self, enabled: bool) {
        self.snapshot.send_if_modified(|s| {
            let changed = s.state.protection_enabled_by_user != enabled;
            s.state.protection_enabled_by_user = enabled;
            changed
        });
    }
}

async fn poll_loop(
    remote: Arc<dyn RemoteClassifier>,
    snapshot: Arc<watch::Sender<ProtectionSnapshot>>,
    interval: Duration,
    probe_timeout: Duration,
    token: CancellationToken,
) {
    loop {
        let reachable = tokio::select! {
            _ = token.cancelled() => break,
            result = tokio::time::timeout(probe_timeout, remote.ping()) => result.unwrap_or(false),
        };

        snapshot.send_if_modified(|s| {
            let changed = s.checking || s.state.server_reachable != reachable;
            if s.state.server_reachable != reachable {
                log::info!(
                    "Classifier server {}",
                    if reachable { "reachable" } else { "unreachable" }
                );
            }
            s.state.server_reachable = reachable;
            s.checking = false;
            changed
        });

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::logic::remote::mock::ScriptedClassifier;

    struct FlagProbe(AtomicBool);

    impl PermissionProbe for FlagProbe {
        fn is_listener_enabled(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn monitor(remote: Arc<ScriptedClassifier>, probe: Arc<FlagProbe>) -> ProtectionMonitor {
        ProtectionMonitor::new(
            remote,
            probe,
            Duration::from_secs(5),
            Duration::from_secs(10),
            true,
        )
    }

    #[test]
    fn test_headline_precedence() {
        let mut snap = ProtectionSnapshot {
            state: ProtectionState {
                permission_granted: false,
                server_reachable: false,
                protection_enabled_by_user: false,
            },
            checking: true,
        };
        assert_eq!(snap.status(), ProtectionStatus::Checking);

        snap.checking = false;
        assert_eq!(snap.status(), ProtectionStatus::Disabled);

        snap.state.protection_enabled_by_user = true;
        assert_eq!(snap.status(), ProtectionStatus::PermissionMissing);

        snap.state.permission_granted = true;
        assert_eq!(snap.status(), ProtectionStatus::ServerUnreachable);

        snap.state.server_reachable = true;
        assert_eq!(snap.status(), ProtectionStatus::Active);
        assert!(snap.state.effective_protection());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_probe_ends_checking() {
        let remote = Arc::new(ScriptedClassifier::returning(false, 0.1));
        let probe = Arc::new(FlagProbe(AtomicBool::new(true)));
        let monitor = monitor(remote, probe);
        let mut rx = monitor.subscribe();

        assert!(monitor.snapshot().checking);
        monitor.start();
        rx.changed().await.unwrap();

        let snap = *rx.borrow();
        assert!(!snap.checking);
        assert!(snap.state.server_reachable);
        assert_eq!(monitor.status(), ProtectionStatus::Active);
        monitor.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reachability_follows_polls() {
        let remote = Arc::new(ScriptedClassifier::returning(false, 0.1));
        let probe = Arc::new(FlagProbe(AtomicBool::new(true)));
        let monitor = monitor(remote.clone(), probe);

        monitor.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(monitor.snapshot().state.server_reachable);

        remote.set_reachable(false);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!monitor.snapshot().state.server_reachable);
        assert_eq!(monitor.status(), ProtectionStatus::ServerUnreachable);

        monitor.stop().await;
        assert!(!monitor.is_running());

        remote.set_reachable(true);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(!monitor.snapshot().state.server_reachable);
    }

    #[tokio::test]
    async fn test_foreground_resume_rechecks_permission() {
        let remote = Arc::new(ScriptedClassifier::returning(false, 0.1));
        let probe = Arc::new(FlagProbe(AtomicBool::new(false)));
        let monitor = monitor(remote, probe.clone());
        assert!(!monitor.snapshot().state.permission_granted);

        probe.0.store(true, Ordering::SeqCst);
        assert!(!monitor.snapshot().state.permission_granted);

        monitor.on_foreground_resumed();
        assert!(monitor.snapshot().state.permission_granted);
    }

    #[tokio::test]
    async fn test_user_toggle() {
        let remote = Arc::new(ScriptedClassifier::returning(false, 0.1));
        let probe = Arc::new(FlagProbe(AtomicBool::new(true)));
        let monitor = monitor(remote, probe);

        monitor.set_protection_enabled(false);
        assert!(!monitor.snapshot().state.protection_enabled_by_user);
        assert!(!monitor.snapshot().state.effective_protection());
    }
}
