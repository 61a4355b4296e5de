//! Remote archive abstraction
//!
//! Provides a common interface for asking the question-answering service,
//! so the session runtime can be exercised without real I/O.

mod client;
mod error;

pub use client::ArchiveClient;
pub use error::ArchiveError;

use async_trait::async_trait;
use std::sync::Arc;

/// Interface to the remote question-answering service
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Submit one question and await its answer text
    async fn ask(&self, question: &str) -> Result<String, ArchiveError>;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn ask(&self, question: &str) -> Result<String, ArchiveError> {
        (**self).ask(question).await
    }
}

/// Logging wrapper for answer services
pub struct LoggingService<A> {
    inner: A,
}

impl<A: AnswerService> LoggingService<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: AnswerService> AnswerService for LoggingService<A> {
    async fn ask(&self, question: &str) -> Result<String, ArchiveError> {
        let start = std::time::Instant::now();
        let result = self.inner.ask(question).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    answer_chars = answer.chars().count(),
                    "Archive request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    duration_ms = %duration.as_millis(),
                    kind = e.kind(),
                    error = %e,
                    "Archive request failed"
                );
            }
        }

        result
    }
}
