//! Runtime Configuration
//!
//! Process-level settings resolved once at startup from the environment.
//! User-editable settings live in `settings`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::alert::AlertTimings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianConfig {
    /// Classifier server base URL
    pub server_url: String,
    /// Timeout of predict/feedback calls in seconds
    pub request_timeout_secs: u64,
    /// Reachability poll interval in seconds
    pub poll_interval_secs: u64,
    /// Where persisted blobs live
    pub data_dir: PathBuf,
    /// Package id of the app itself
    pub self_package: String,
    /// Capacity of the notification intake queue
    pub queue_capacity: usize,
    pub alert_auto_dismiss_ms: u64,
    pub alert_exit_ms: u64,
}

impl GuardianConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            server_url: constants::get_server_url(),
            request_timeout_secs: constants::get_timeout_secs(),
            poll_interval_secs: constants::get_poll_interval_secs(),
            data_dir: constants::get_data_dir(),
            self_package: constants::get_self_package(),
            queue_capacity: constants::get_queue_capacity(),
            alert_auto_dismiss_ms: constants::ALERT_AUTO_DISMISS_MS,
            alert_exit_ms: constants::ALERT_EXIT_MS,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn alert_timings(&self) -> AlertTimings {
        AlertTimings {
            auto_dismiss: Duration::from_millis(self.alert_auto_dismiss_ms),
            exit: Duration::from_millis(self.alert_exit_ms),
        }
    }
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            server_url: constants::DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            poll_interval_secs: constants::DEFAULT_POLL_INTERVAL_SECS,
            data_dir: PathBuf::from(constants::DATA_DIR_NAME),
            self_package: constants::DEFAULT_SELF_PACKAGE.to_string(),
            queue_capacity: constants::DEFAULT_QUEUE_CAPACITY,
            alert_auto_dismiss_ms: constants::ALERT_AUTO_DISMISS_MS,
            alert_exit_ms: constants::ALERT_EXIT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = GuardianConfig::default().alert_timings();
        assert_eq!(timings.auto_dismiss, Duration::from_millis(6000));
        assert_eq!(timings.exit, Duration::from_millis(400));
    }

    #[test]
    fn test_default_poll_interval() {
        assert_eq!(GuardianConfig::default().poll_interval(), Duration::from_secs(5));
    }
}
