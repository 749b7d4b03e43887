//! Recording overlay surface for unit tests.

use parking_lot::Mutex;
use uuid::Uuid;

use super::presenter::OverlaySurface;
use super::types::{AlertInstance, AlertSeverity};

#[derive(Default)]
pub(crate) struct RecordingSurface {
    pub no_overlay: bool,
    calls: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn without_overlay() -> Self {
        Self {
            no_overlay: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn shown(&self) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with("show:")).count()
    }
}

impl OverlaySurface for RecordingSurface {
    fn can_draw_overlays(&self) -> bool {
        !self.no_overlay
    }
    fn show(&self, alert: &AlertInstance) {
        self.calls.lock().push(format!("show:{}", alert.message));
    }
    fn begin_exit(&self, _id: Uuid) {
        self.calls.lock().push("exit".to_string());
    }
    fn remove(&self, _id: Uuid) {
        self.calls.lock().push("remove".to_string());
    }
    fn fallback_notice(&self, message: &str, _severity: AlertSeverity) {
        self.calls.lock().push(format!("fallback:{}", message));
    }
}
