//! History Module - bounded log of past classifications
//!
//! # Architecture
//! - `types.rs`: `HistoryRecord`, `Stats`
//! - `store.rs`: `HistoryStore` (newest first, capped, persisted on every change)
//!
//! # Failure Strategy
//! Corrupt persisted history -> start from an empty log and keep running.

pub mod types;
pub mod store;

pub use types::{HistoryRecord, Stats, TIMESTAMP_FORMAT};
pub use store::HistoryStore;
