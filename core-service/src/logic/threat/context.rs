//! Message
//!
//! Input of one classification request: the text plus where it came from.

use serde::{Deserialize, Serialize};

/// One message to classify. Built per request, never mutated after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Human-readable origin, e.g. the label of the app that posted it
    pub source_context: Vec<String>,
}

impl Message {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source_context: Vec::new(),
        }
    }

    /// Add one origin label
    pub fn with_source(mut self, label: &str) -> Self {
        self.source_context.push(label.to_string());
        self
    }
}
