use serde::{Deserialize, Serialize};

use crate::logic::history::Stats;
use crate::logic::monitor::{ProtectionSnapshot, ProtectionStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub version: String,
    pub protection: ProtectionStatus,
    pub snapshot: ProtectionSnapshot,
    pub stats: Stats,
    pub active_alerts: usize,
    pub trusted_apps: usize,
    pub trusted_contacts: usize,
}
