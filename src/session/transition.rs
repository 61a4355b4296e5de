//! Pure state transition function

use super::{Effect, Event, Phase, SessionState};
use thiserror::Error;

/// Fixed apology substituted for any failed exchange. The archive always
/// replies, even when the reply is an apology.
pub const FALLBACK_TEXT: &str = "Forgive me, the connection to the archive seems to be \
severed. Please ensure the keeper's server is awakened.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Rejected events
///
/// These never reach the user as faults; the runtime logs them and moves on,
/// so a rejected submission behaves as a no-op.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("an exchange is already pending")]
    SessionBusy,
    #[error("draft is blank")]
    DraftEmpty,
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same state and event this always produces the same result,
/// with no I/O side effects.
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        // ============================================================
        // Input buffer
        // ============================================================

        // Typing stays possible in every phase; only submission is gated.
        (phase, Event::DraftChanged { text }) => {
            Ok(TransitionResult::new(SessionState { phase, draft: text }))
        }

        // ============================================================
        // Submission
        // ============================================================

        (Phase::Idle, Event::SubmitRequested) => {
            if state.draft.trim().is_empty() {
                return Err(TransitionError::DraftEmpty);
            }
            // The question keeps the literal draft text, untrimmed.
            let question = state.draft.clone();
            Ok(TransitionResult::new(SessionState {
                phase: Phase::Pending,
                draft: String::new(),
            })
            .with_effect(Effect::append_user(question.clone()))
            .with_effect(Effect::ask(question)))
        }

        (Phase::Pending, Event::SubmitRequested) => Err(TransitionError::SessionBusy),

        // ============================================================
        // Exchange resolution
        // ============================================================

        (Phase::Pending, Event::AnswerReceived { text }) => {
            Ok(TransitionResult::new(SessionState {
                phase: Phase::Idle,
                draft: state.draft.clone(),
            })
            .with_effect(Effect::append_agent(text)))
        }

        // Every failure resolves the same way: the fixed apology. Transport
        // errors, bad statuses, and malformed bodies are not distinguished.
        (Phase::Pending, Event::ExchangeFailed { .. }) => {
            Ok(TransitionResult::new(SessionState {
                phase: Phase::Idle,
                draft: state.draft.clone(),
            })
            .with_effect(Effect::append_agent(FALLBACK_TEXT)))
        }

        // ============================================================
        // Invalid transitions
        // ============================================================

        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "no transition from {phase:?} with event {event:?}"
        ))),
    }
}
