//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default classifier server, only edit this file.

/// Default classifier server URL
///
/// This is the fallback URL when no environment variable is set.
/// For the Android emulator: http://10.0.2.2:8550
/// For local development: http://localhost:8550
pub const DEFAULT_SERVER_URL: &str = "http://10.0.2.2:8550";

/// Default request timeout for predict/feedback calls (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default reachability poll interval (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default capacity of the notification intake queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Package id of the app itself (its own notifications are never analyzed)
pub const DEFAULT_SELF_PACKAGE: &str = "com.example.guardianai";

/// Name of the data directory under the platform data dir
pub const DATA_DIR_NAME: &str = "guardian-ai";

/// Sentinel text sent by the reachability probe
pub const PING_TEXT: &str = "ping";

/// Maximum number of history records kept
pub const HISTORY_CAPACITY: usize = 50;

/// Alert auto-dismiss delay (milliseconds)
pub const ALERT_AUTO_DISMISS_MS: u64 = 6_000;

/// Alert exit transition duration (milliseconds)
pub const ALERT_EXIT_MS: u64 = 400;

/// Storage keys
pub mod keys {
    pub const HISTORY: &str = "history_list";
    pub const TRUSTED_APPS: &str = "trusted_apps";
    pub const TRUSTED_CONTACTS: &str = "trusted_contacts";
    pub const SETTINGS: &str = "settings";
}

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Guardian AI";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get classifier server URL from environment or use default
pub fn get_server_url() -> String {
    std::env::var("GUARDIAN_SERVER_URL")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
}

/// Get request timeout from environment or use default
pub fn get_timeout_secs() -> u64 {
    std::env::var("GUARDIAN_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Get reachability poll interval from environment or use default
pub fn get_poll_interval_secs() -> u64 {
    std::env::var("GUARDIAN_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
}

/// Get intake queue capacity from environment or use default
pub fn get_queue_capacity() -> usize {
    std::env::var("GUARDIAN_QUEUE_CAPACITY")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_QUEUE_CAPACITY)
}

/// Get own package id from environment or use default
pub fn get_self_package() -> String {
    std::env::var("GUARDIAN_SELF_PACKAGE")
        .unwrap_or_else(|_| DEFAULT_SELF_PACKAGE.to_string())
}

/// Get data directory from environment or use the platform default
pub fn get_data_dir() -> std::path::PathBuf {
    match std::env::var("GUARDIAN_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => std::path::PathBuf::from(dir),
        _ => dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(DATA_DIR_NAME),
    }
}
