//! Trust List - user-curated allowlist
//!
//! Trusted app ids skip analysis entirely; trusted contact names are matched
//! as substrings of the notification title. Every mutation is persisted
//! before it becomes visible.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::storage::{load_or_default, save_json, KeyValueStore};
use crate::constants::keys;
use crate::error::GuardianResult;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustList {
    pub apps: BTreeSet<String>,
    pub contacts: BTreeSet<String>,
}

impl TrustList {
    pub fn is_trusted_app(&self, package: &str) -> bool {
        self.apps.contains(package)
    }

    /// Trusted contact whose name appears in the title (case-insensitive)
    pub fn matching_contact(&self, title: &str) -> Option<&str> {
        let title = title.to_lowercase();
        self.contacts
            .iter()
            .find(|c| title.contains(&c.to_lowercase()))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Apps,
    Contacts,
}

impl ListKind {
    fn key(self) -> &'static str {
        match self {
            ListKind::Apps => keys::TRUSTED_APPS,
            ListKind::Contacts => keys::TRUSTED_CONTACTS,
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct TrustListStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Arc<TrustList>>,
}

impl TrustListStore {
    /// Load both sets; a missing or corrupt blob yields an empty set
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let list = TrustList {
            apps: load_entries(store.as_ref(), keys::TRUSTED_APPS),
            contacts: load_entries(store.as_ref(), keys::TRUSTED_CONTACTS),
        };
        log::info!(
            "Trust list loaded: {} apps, {} contacts",
            list.apps.len(),
            list.contacts.len()
        );

        Self {
            store,
            current: RwLock::new(Arc::new(list)),
        }
    }

    /// Consistent view of both sets
    pub fn snapshot(&self) -> Arc<TrustList> {
        self.current.read().clone()
    }

    pub fn add_trusted_app(&self, package: &str) -> GuardianResult<()> {
        self.add_trusted_apps(&[package.to_string()])
    }

    pub fn add_trusted_apps(&self, packages: &[String]) -> GuardianResult<()> {
        self.mutate(ListKind::Apps, |set| {
            for p in packages {
                let p = p.trim();
                if !p.is_empty() {
                    set.insert(p.to_string());
                }
            }
        })
    }

    pub fn remove_trusted_app(&self, package: &str) -> GuardianResult<()> {
        self.remove_trusted_apps(&[package.to_string()])
    }

    pub fn remove_trusted_apps(&self, packages: &[String]) -> GuardianResult<()> {
        self.mutate(ListKind::Apps, |set| {
            for p in packages {
                set.remove(p.trim());
            }
        })
    }

    pub fn add_trusted_contact(&self, name: &str) -> GuardianResult<()> {
        self.add_trusted_contacts(&[name.to_string()])
    }

    pub fn add_trusted_contacts(&self, names: &[String]) -> GuardianResult<()> {
        self.mutate(ListKind::Contacts, |set| {
            for n in names {
                let n = n.trim();
                if !n.is_empty() {
                    set.insert(n.to_string());
                }
            }
        })
    }

    pub fn remove_trusted_contact(&self, name: &str) -> GuardianResult<()> {
        self.remove_trusted_contacts(&[name.to_string()])
    }

    pub fn remove_trusted_contacts(&self, names: &[String]) -> GuardianResult<()> {
        self.mutate(ListKind::Contacts, |set| {
            for n in names {
                set.remove(n.trim());
            }
        })
    }

    /// Read-modify-write under the lock. The new set is persisted first and
    /// only then published; on write failure nothing changes.
    fn mutate<F>(&self, kind: ListKind, edit: F) -> GuardianResult<()>
    where
        F: FnOnce(&mut BTreeSet<String>),
    {
        let mut current = self.current.write();
        let mut next = (**current).clone();

        edit(match kind {
            ListKind::Apps => &mut next.apps,
            ListKind::Contacts => &mut next.contacts,
        });

        if **current == next {
            return Ok(());
        }

        let set = match kind {
            ListKind::Apps => &next.apps,
            ListKind::Contacts => &next.contacts,
        };
        save_json(self.store.as_ref(), kind.key(), set)?;
        log::info!("Trust list updated ({}): {} entries", kind.key(), set.len());

        *current = Arc::new(next);
        Ok(())
    }
}

/// Persisted set with blank entries dropped; a blank contact would match every title
fn load_entries(store: &dyn KeyValueStore, key: &str) -> BTreeSet<String> {
    let raw: BTreeSet<String> = load_or_default(store, key);
    raw.into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}
