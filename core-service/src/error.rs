//! Error handling

use thiserror::Error;

use crate::logic::remote::ClientError;

pub type GuardianResult<T> = Result<T, GuardianError>;

#[derive(Debug, Error)]
pub enum GuardianError {
    /// Remote classifier call failed or timed out
    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// A stored blob could not be decoded
    #[error("Persisted data under '{key}' is corrupt: {reason}")]
    PersistenceCorrupt { key: String, reason: String },

    /// "Draw over other apps" capability is not granted
    #[error("Overlay permission unavailable")]
    PermissionUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("History record {0} not found")]
    RecordNotFound(i64),

    #[error("History record {0} already exists")]
    DuplicateRecord(i64),

    #[error("Notification pipeline is closed")]
    PipelineClosed,
}

impl From<ClientError> for GuardianError {
    fn from(err: ClientError) -> Self {
        GuardianError::ClassifierUnavailable(err.to_string())
    }
}

impl GuardianError {
    /// True for failures the caller may retry once the server is back
    pub fn is_unavailable(&self) -> bool {
        matches!(self, GuardianError::ClassifierUnavailable(_))
    }
}
