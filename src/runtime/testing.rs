//! Mock implementations for testing
//!
//! These mocks enable exercising the runtime without real I/O.

use crate::archive::{AnswerService, ArchiveError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock answer service that returns queued outcomes
pub struct MockAnswerService {
    outcomes: Mutex<VecDeque<Result<String, ArchiveError>>>,
    /// Record of all questions asked
    questions: Mutex<Vec<String>>,
}

impl MockAnswerService {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful answer
    pub fn queue_answer(&self, text: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub fn queue_failure(&self, error: ArchiveError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded questions
    pub fn recorded_questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, question: &str) -> Result<String, ArchiveError> {
        self.questions.lock().unwrap().push(question.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ArchiveError::Network("no mock outcome queued".to_string())))
    }
}
