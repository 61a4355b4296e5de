//! Property-based tests for the session state machine
//!
//! These drive random event sequences through the pure transition function,
//! applying append effects to a real log the way the runtime does, and check
//! that the conversation invariants hold at every step.

use super::log::{Conversation, Origin};
use super::transition::{transition, TransitionError, FALLBACK_TEXT};
use super::{Effect, Event, Phase, SessionState};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_draft_event() -> impl Strategy<Value = Event> {
    "[a-zA-Z ]{0,30}".prop_map(|text| Event::DraftChanged { text })
}

fn arb_answer_event() -> impl Strategy<Value = Event> {
    "[a-zA-Z .]{1,40}".prop_map(|text| Event::AnswerReceived { text })
}

fn arb_failure_event() -> impl Strategy<Value = Event> {
    "[a-z ]{1,20}".prop_map(|reason| Event::ExchangeFailed { reason })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_draft_event(),
        Just(Event::SubmitRequested),
        arb_answer_event(),
        arb_failure_event(),
    ]
}

// ============================================================================
// Model Driver
// ============================================================================

/// Replays events the way the runtime does: rejected events are no-ops,
/// accepted ones update state and apply their append effects to the log.
struct Driver {
    state: SessionState,
    log: Conversation,
    /// Questions issued but not yet resolved (len is 0 or 1)
    outstanding: Vec<String>,
}

impl Driver {
    fn new() -> Self {
        Self {
            state: SessionState::default(),
            log: Conversation::seeded(),
            outstanding: Vec::new(),
        }
    }

    fn apply(&mut self, event: Event) {
        let resolves = matches!(
            event,
            Event::AnswerReceived { .. } | Event::ExchangeFailed { .. }
        );
        // The runtime only feeds back resolutions for exchanges it issued.
        if resolves && self.outstanding.is_empty() {
            assert_rejected_as_invalid(&self.state, event);
            return;
        }

        match transition(&self.state, event) {
            Ok(result) => {
                self.state = result.new_state;
                for effect in result.effects {
                    match effect {
                        Effect::AppendMessage { origin, text } => {
                            self.log.push(origin, text);
                        }
                        Effect::AskArchive { question } => {
                            self.outstanding.push(question);
                        }
                    }
                }
                if resolves {
                    self.outstanding.pop();
                }
            }
            Err(
                TransitionError::SessionBusy
                | TransitionError::DraftEmpty
                | TransitionError::InvalidTransition(_),
            ) => {
                // No-op by design: nothing appended, nothing issued.
            }
        }
    }
}

/// A resolution with no outstanding exchange must be rejected as invalid.
fn assert_rejected_as_invalid(state: &SessionState, event: Event) {
    assert!(matches!(
        transition(state, event),
        Err(TransitionError::InvalidTransition(_))
    ));
}

fn user_count(log: &Conversation) -> usize {
    log.messages()
        .iter()
        .filter(|m| m.origin == Origin::User)
        .count()
}

fn agent_reply_count(log: &Conversation) -> usize {
    // Skip the seed greeting
    log.messages()
        .iter()
        .skip(1)
        .filter(|m| m.origin == Origin::Agent)
        .count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Ids stay strictly increasing no matter what the user does.
    #[test]
    fn prop_ids_strictly_increasing(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut driver = Driver::new();
        for event in events {
            driver.apply(event);
        }
        let ids: Vec<_> = driver.log.messages().iter().map(|m| m.id).collect();
        for pair in ids.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    /// Exactly one message ever lacks a timestamp: the seed greeting.
    #[test]
    fn prop_only_seed_is_untimed(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut driver = Driver::new();
        for event in events {
            driver.apply(event);
        }
        let untimed = driver
            .log
            .messages()
            .iter()
            .filter(|m| m.timestamp.is_none())
            .count();
        prop_assert_eq!(untimed, 1);
        prop_assert!(driver.log.messages()[0].timestamp.is_none());
    }

    /// Exchanges never interleave: each user message is answered before the
    /// next can be appended, so replies pair off one-to-one with questions
    /// (modulo the one possibly-outstanding exchange).
    #[test]
    fn prop_exchanges_never_interleave(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut driver = Driver::new();
        for event in events {
            driver.apply(event);

            let users = user_count(&driver.log);
            let replies = agent_reply_count(&driver.log);
            match driver.state.phase {
                // Pending exactly between the user append and its resolution
                Phase::Pending => prop_assert_eq!(users, replies + 1),
                Phase::Idle => prop_assert_eq!(users, replies),
            }
            prop_assert!(driver.outstanding.len() <= 1);
        }
    }

    /// Message order alternates question/reply after the seed.
    #[test]
    fn prop_replies_follow_their_questions(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut driver = Driver::new();
        for event in events {
            driver.apply(event);
        }
        let mut expecting = Origin::User;
        for msg in driver.log.messages().iter().skip(1) {
            prop_assert_eq!(msg.origin, expecting);
            expecting = match expecting {
                Origin::User => Origin::Agent,
                Origin::Agent => Origin::User,
            };
        }
    }

    /// A submission issues the request for exactly the appended text.
    #[test]
    fn prop_submit_issues_literal_question(draft in "[a-zA-Z ]{1,30}") {
        prop_assume!(!draft.trim().is_empty());
        let state = SessionState { phase: Phase::Idle, draft: draft.clone() };
        let result = transition(&state, Event::SubmitRequested).unwrap();
        prop_assert_eq!(result.new_state.phase, Phase::Pending);
        prop_assert_eq!(
            result.effects,
            vec![Effect::append_user(draft.clone()), Effect::ask(draft)]
        );
    }

    /// Failures always surface as the fixed apology, whatever the reason.
    #[test]
    fn prop_any_failure_yields_fallback(reason in ".{0,60}") {
        let state = SessionState { phase: Phase::Pending, draft: String::new() };
        let result = transition(&state, Event::ExchangeFailed { reason }).unwrap();
        prop_assert_eq!(result.new_state.phase, Phase::Idle);
        prop_assert_eq!(result.effects, vec![Effect::append_agent(FALLBACK_TEXT)]);
    }
}
