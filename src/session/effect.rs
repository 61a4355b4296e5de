//! Effects produced by state transitions

use crate::session::log::Origin;

/// Effects to be executed after a state transition
///
/// The transition function stays pure; timestamps and message ids are
/// stamped by the log when the runtime executes an append.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the conversation log
    AppendMessage { origin: Origin, text: String },

    /// Issue the question to the remote archive
    AskArchive { question: String },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            origin: Origin::User,
            text: text.into(),
        }
    }

    pub fn append_agent(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            origin: Origin::Agent,
            text: text.into(),
        }
    }

    pub fn ask(question: impl Into<String>) -> Self {
        Effect::AskArchive {
            question: question.into(),
        }
    }
}
