//! User Settings
//!
//! Strict mode, the global protection toggle and the UI theme. Persisted
//! as one blob on every change.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::storage::{load_or_default, save_json, KeyValueStore};
use crate::constants::keys;
use crate::error::GuardianResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Opaque flag forwarded to the classifier
    pub strict_mode: bool,
    pub protection_enabled: bool,
    pub theme_mode: ThemeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict_mode: false,
            protection_enabled: true,
            theme_mode: ThemeMode::System,
        }
    }
}

pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Settings>,
}

impl SettingsStore {
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let settings: Settings = load_or_default(store.as_ref(), keys::SETTINGS);
        log::info!(
            "Settings loaded: protection={}, strict={}",
            settings.protection_enabled,
            settings.strict_mode
        );
        Self {
            store,
            current: RwLock::new(settings),
        }
    }

    pub fn get(&self) -> Settings {
        self.current.read().clone()
    }

    pub fn is_strict_mode(&self) -> bool {
        self.current.read().strict_mode
    }

    pub fn is_protection_enabled(&self) -> bool {
        self.current.read().protection_enabled
    }

    pub fn set_strict_mode(&self, enabled: bool) -> GuardianResult<()> {
        self.update(|s| s.strict_mode = enabled)
    }

    pub fn set_protection_enabled(&self, enabled: bool) -> GuardianResult<()> {
        self.update(|s| s.protection_enabled = enabled)
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> GuardianResult<()> {
        self.update(|s| s.theme_mode = mode)
    }

    fn update<F: FnOnce(&mut Settings)>(&self, edit: F) -> GuardianResult<()> {
        let mut current = self.current.write();
        let mut next = current.clone();
        edit(&mut next);
        if next == *current {
            return Ok(());
        }

        save_json(self.store.as_ref(), keys::SETTINGS, &next)?;
        *current = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::storage::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = SettingsStore::open(Arc::new(MemoryStore::new()));
        assert!(settings.is_protection_enabled());
        assert!(!settings.is_strict_mode());
        assert_eq!(settings.get().theme_mode, ThemeMode::System);
    }

    #[test]
    fn test_changes_survive_reopen() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let settings = SettingsStore::open(kv.clone());
        settings.set_strict_mode(true).unwrap();
        settings.set_protection_enabled(false).unwrap();
        settings.set_theme_mode(ThemeMode::Dark).unwrap();

        let reopened = SettingsStore::open(kv);
        assert_eq!(
            reopened.get(),
            Settings {
                strict_mode: true,
                protection_enabled: false,
                theme_mode: ThemeMode::Dark,
            }
        );
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let kv = Arc::new(MemoryStore::new());
        kv.put(keys::SETTINGS, br#"{"strict_mode": true}"#).unwrap();

        let settings = SettingsStore::open(kv);
        assert!(settings.is_strict_mode());
        assert!(settings.is_protection_enabled());
    }
}
