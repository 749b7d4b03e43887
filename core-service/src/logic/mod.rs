//! Logic Module - Detection Pipeline & Stores
//!
//! ## Architecture
//! - `remote/` - Remote classifier client (predict, feedback, ping)
//! - `threat/` - Classification engine (local rules + remote model)
//! - `intake/` - Notification intake filter
//! - `alert/` - Alert presentation state machine
//! - `history/` - Bounded history log and derived stats
//! - `monitor` - Connectivity/permission monitor
//! - `pipeline` - Bounded notification queue, single consumer
//!
//! Stores (`storage`, `trust`, `settings`) are injected, never global.

// Core engines
pub mod remote;
pub mod threat;
pub mod intake;
pub mod alert;
pub mod history;
pub mod monitor;
pub mod pipeline;

// Stores & configuration
pub mod storage;
pub mod trust;
pub mod settings;
pub mod config;

// Host protocol
pub mod events;
