//! Session and transcript management
//!
//! Everything here is best-effort: snapshot and summary failures are logged
//! and swallowed so the chat itself keeps working when the backend or the
//! local store is unavailable.

pub mod snapshot;
pub mod summary;
pub mod timer;

pub use snapshot::{record_visit, snapshot_of, FileSnapshotStore, SnapshotStore, SNAPSHOT_KEY};
pub use summary::{build_summary, submit_on_close, HttpSummarySink, SummarySink};
pub use timer::ReplyTimer;

use thiserror::Error;

/// Session persistence errors.
///
/// These never propagate to the chat surface; callers log and continue.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Submission error: {0}")]
    Submission(String),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Submission(err.to_string())
    }
}
