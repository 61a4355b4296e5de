//! Archive client error types
//!
//! The classification here exists for the log only. The session controller
//! treats every variant the same way: the exchange failed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Transport-level failure: connect, timeout, read
    #[error("network error: {0}")]
    Network(String),

    /// The archive answered with a non-success status
    #[error("archive returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body did not decode into an answer
    #[error("malformed answer: {0}")]
    Malformed(String),
}

impl ArchiveError {
    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ArchiveError::Network(_) => "network",
            ArchiveError::Status { .. } => "status",
            ArchiveError::Malformed(_) => "malformed",
        }
    }
}
