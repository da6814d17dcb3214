//! Record error types.

use thiserror::Error;

/// Errors raised when a record invariant would be broken.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record is already linked to a GitHub issue.
    #[error("{key} is already linked to GitHub issue #{existing}")]
    AlreadyLinked { key: String, existing: u64 },
}
