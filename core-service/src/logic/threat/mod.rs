//! Threat Module
//!
//! Classifies a message as SAFE / WARNING / DANGEROUS.
//! This is the CORE STEP: local rules + remote model decide the verdict.
//!
//! ## Structure
//! - `types`: Verdict, VerdictCategory, ExplanationFactor
//! - `context`: Message (classification input)
//! - `rules`: Fixed lists, scores and matchers
//! - `classifier`: ClassificationEngine and rule pipeline
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{ClassificationEngine, VerdictCategory};
//!
//! let verdict = engine.classify(text, strict_mode, &context).await?;
//! match verdict.category() {
//!     VerdictCategory::Safe => println!("Safe"),
//!     VerdictCategory::Warning => println!("Caution"),
//!     VerdictCategory::Dangerous => println!("Scam"),
//! }
//! ```

pub mod types;
pub mod context;
pub mod rules;
pub mod classifier;

pub use types::{ExplanationFactor, FactorKind, Verdict, VerdictCategory};

pub use context::Message;

pub use classifier::{apply_post_rules, classify_local, ClassificationEngine};
