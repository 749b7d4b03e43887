use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::{HistoryRecord, Stats};
use crate::constants::{keys, HISTORY_CAPACITY};
use crate::error::{GuardianError, GuardianResult};
use crate::logic::storage::{load_or_default, save_json, KeyValueStore};
use crate::logic::threat::Verdict;

/// Bounded newest-first log of classifications
///
/// Each mutation is one critical section: copy, edit, persist the whole
/// list, then publish. Readers see the list before or after, never during.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    records: RwLock<Vec<HistoryRecord>>,
    capacity: usize,
}

impl HistoryStore {
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, HISTORY_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        let mut records: Vec<HistoryRecord> = load_or_default(store.as_ref(), keys::HISTORY);
        records.truncate(capacity);
        log::info!("History loaded: {} records", records.len());

        Self {
            store,
            records: RwLock::new(records),
            capacity,
        }
    }

    /// Create a record for `verdict` and append it
    pub fn record_from_verdict(&self, text: &str, verdict: &Verdict) -> GuardianResult<HistoryRecord> {
        let mut records = self.records.write();
        let id = next_id(records.first().map(|r| r.id));
        let record = HistoryRecord::from_verdict(id, text, verdict);
        self.commit(&mut records, |list| list.insert(0, record.clone()))?;
        Ok(record)
    }

    /// Insert at the front, evicting the oldest record past capacity.
    /// Ids are unique: an id already in the log is rejected.
    pub fn append(&self, record: HistoryRecord) -> GuardianResult<()> {
        let mut records = self.records.write();
        if records.iter().any(|r| r.id == record.id) {
            return Err(GuardianError::DuplicateRecord(record.id));
        }
        self.commit(&mut records, |list| list.insert(0, record))
    }

    pub fn list(&self) -> Vec<HistoryRecord> {
        self.records.read().clone()
    }

    pub fn get(&self, id: i64) -> Option<HistoryRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Remove exactly the matching records; returns how many were removed
    pub fn delete_by_ids(&self, ids: &HashSet<i64>) -> GuardianResult<usize> {
        let mut records = self.records.write();
        let before = records.len();
        if !records.iter().any(|r| ids.contains(&r.id)) {
            return Ok(0);
        }

        self.commit(&mut records, |list| list.retain(|r| !ids.contains(&r.id)))?;
        let removed = before - records.len();
        log::info!("Deleted {} history records", removed);
        Ok(removed)
    }

    pub fn clear(&self) -> GuardianResult<()> {
        let mut records = self.records.write();
        self.store.remove(keys::HISTORY)?;
        records.clear();
        log::info!("History cleared");
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        Stats::from_records(&self.records.read())
    }

    fn commit<F>(&self, records: &mut Vec<HistoryRecord>, edit: F) -> GuardianResult<()>
    where
        F: FnOnce(&mut Vec<HistoryRecord>),
    {
        let mut next = records.clone();
        edit(&mut next);
        next.truncate(self.capacity);

        save_json(self.store.as_ref(), keys::HISTORY, &next)?;
        *records = next;
        Ok(())
    }
}

/// Current time in milliseconds, bumped past the newest existing id
fn next_id(newest: Option<i64>) -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    match newest {
        Some(last) if last >= now => last + 1,
        _ => now,
    }
}
