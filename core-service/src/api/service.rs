//! Guardian Service - component wiring and lifecycle
//!
//! Builds every store and engine once, injects them where needed and owns
//! the background tasks (notification consumer, protection monitor).

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::error::GuardianResult;
use crate::logic::alert::{AlertEvent, AlertPresenter, OverlaySurface};
use crate::logic::config::GuardianConfig;
use crate::logic::history::HistoryStore;
use crate::logic::intake::AppLabelResolver;
use crate::logic::monitor::{PermissionProbe, ProtectionMonitor, ProtectionSnapshot};
use crate::logic::pipeline::{NotificationPipeline, PipelineContext};
use crate::logic::remote::{ClientConfig, HttpClassifierClient, RemoteClassifier};
use crate::logic::settings::SettingsStore;
use crate::logic::storage::{FileStore, KeyValueStore};
use crate::logic::threat::ClassificationEngine;
use crate::logic::trust::TrustListStore;

/// Host-provided capabilities
pub struct PlatformDeps {
    pub surface: Arc<dyn OverlaySurface>,
    pub permission: Arc<dyn PermissionProbe>,
    pub labels: Arc<dyn AppLabelResolver>,
}

pub struct GuardianService {
    pub(crate) config: GuardianConfig,
    pub(crate) remote: Arc<dyn RemoteClassifier>,
    pub(crate) settings: Arc<SettingsStore>,
    pub(crate) trust: Arc<TrustListStore>,
    pub(crate) history: Arc<HistoryStore>,
    pub(crate) presenter: Arc<AlertPresenter>,
    pub(crate) monitor: Arc<ProtectionMonitor>,
    pub(crate) pipeline: NotificationPipeline,
}

impl GuardianService {
    /// Open the on-disk stores, connect to the configured server and start
    /// the background tasks. Must be called from within a tokio runtime.
    pub fn start(config: GuardianConfig, platform: PlatformDeps) -> GuardianResult<Self> {
        let store = Arc::new(FileStore::open(&config.data_dir)?);
        let remote = Arc::new(HttpClassifierClient::new(ClientConfig {
            server_url: config.server_url.clone(),
            timeout_seconds: config.request_timeout_secs,
        })?);
        log::info!("Classifier server: {}", remote.server_url());

        Ok(Self::start_with(config, platform, store, remote))
    }

    /// Same as `start` with caller-supplied storage and classifier
    pub fn start_with(
        config: GuardianConfig,
        platform: PlatformDeps,
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteClassifier>,
    ) -> Self {
        let settings = Arc::new(SettingsStore::open(store.clone()));
        let trust = Arc::new(TrustListStore::open(store.clone()));
        let history = Arc::new(HistoryStore::open(store));
        let presenter = Arc::new(AlertPresenter::new(platform.surface, config.alert_timings()));
        let engine = Arc::new(ClassificationEngine::new(remote.clone(), config.request_timeout()));

        let monitor = Arc::new(ProtectionMonitor::new(
            remote.clone(),
            platform.permission,
            config.poll_interval(),
            config.request_timeout(),
            settings.is_protection_enabled(),
        ));
        monitor.start();

        let context = Arc::new(PipelineContext {
            engine,
            trust: trust.clone(),
            settings: settings.clone(),
            history: history.clone(),
            presenter: presenter.clone(),
            labels: platform.labels,
            self_package: config.self_package.clone(),
        });
        let pipeline = NotificationPipeline::spawn(context, config.queue_capacity);

        log::info!("Guardian service started");
        Self {
            config,
            remote,
            settings,
            trust,
            history,
            presenter,
            monitor,
            pipeline,
        }
    }

    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertEvent> {
        self.presenter.subscribe()
    }

    pub fn subscribe_protection(&self) -> watch::Receiver<ProtectionSnapshot> {
        self.monitor.subscribe()
    }

    /// Drain queued notifications, stop the monitor, dismiss visible alerts
    pub async fn shutdown(&self) {
        log::info!("Guardian service shutting down...");
        self.pipeline.shutdown().await;
        self.monitor.stop().await;
        self.presenter.dismiss_all();
        log::info!("Guardian service stopped");
    }
}
