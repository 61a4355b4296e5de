//! Session runtime
//!
//! Owns the conversation log and session state, applies pure transitions,
//! and executes their effects. The only suspension point is the network
//! exchange, which runs as a spawned task and reports back through the
//! event channel; the `Pending` phase strictly serializes exchanges.

#[cfg(test)]
pub mod testing;

use crate::archive::AnswerService;
use crate::session::{transition, Conversation, Effect, Event, SessionState, TransitionError};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct SessionRuntime<A: AnswerService> {
    state: SessionState,
    conversation: Conversation,
    service: Arc<A>,
    event_tx: mpsc::Sender<Event>,
}

impl<A: AnswerService + 'static> SessionRuntime<A> {
    /// Create a runtime around a fresh, seeded conversation.
    ///
    /// `event_tx` is the channel exchange outcomes are delivered on; the
    /// caller owns the receiving end and feeds events back into `handle`.
    pub fn new(service: A, event_tx: mpsc::Sender<Event>) -> Self {
        Self {
            state: SessionState::default(),
            conversation: Conversation::seeded(),
            service: Arc::new(service),
            event_tx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Apply one event
    ///
    /// Rejected events are logged and dropped: nothing is appended and no
    /// request is issued. No fault ever propagates to the caller.
    pub fn handle(&mut self, event: Event) {
        match transition(&self.state, event) {
            Ok(result) => {
                self.state = result.new_state;
                for effect in result.effects {
                    self.execute(effect);
                }
            }
            Err(TransitionError::SessionBusy) => {
                tracing::debug!("submission rejected, exchange already pending");
            }
            Err(TransitionError::DraftEmpty) => {
                tracing::debug!("submission rejected, draft is blank");
            }
            Err(TransitionError::InvalidTransition(detail)) => {
                tracing::warn!(%detail, "event dropped");
            }
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { origin, text } => {
                let msg = self.conversation.push(origin, text);
                tracing::debug!(id = %msg.id, origin = ?msg.origin, "Message appended");
            }
            Effect::AskArchive { question } => {
                tracing::info!(
                    question_chars = question.chars().count(),
                    "Asking the archive"
                );
                let service = Arc::clone(&self.service);
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let event = match service.ask(&question).await {
                        Ok(text) => Event::AnswerReceived { text },
                        Err(e) => Event::ExchangeFailed {
                            reason: e.to_string(),
                        },
                    };
                    // Send fails only when the session is shutting down.
                    let _ = tx.send(event).await;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockAnswerService;
    use super::*;
    use crate::archive::ArchiveError;
    use crate::session::{Origin, FALLBACK_TEXT};

    fn draft(text: &str) -> Event {
        Event::DraftChanged {
            text: text.to_string(),
        }
    }

    async fn resolve(
        runtime: &mut SessionRuntime<MockAnswerService>,
        rx: &mut mpsc::Receiver<Event>,
    ) {
        let outcome = rx.recv().await.expect("exchange outcome");
        runtime.handle(outcome);
    }

    #[tokio::test]
    async fn successful_exchange_appends_question_then_answer() {
        let service = MockAnswerService::new();
        service.queue_answer("He is a spren.");
        let (tx, mut rx) = mpsc::channel(8);
        let mut runtime = SessionRuntime::new(service, tx);

        runtime.handle(draft("Who is the Stormfather?"));
        runtime.handle(Event::SubmitRequested);

        // User message appended immediately, exchange outstanding
        assert!(runtime.state().is_pending());
        assert!(runtime.state().draft.is_empty());
        assert_eq!(runtime.conversation().len(), 2);
        let question = runtime.conversation().last().unwrap();
        assert_eq!(question.origin, Origin::User);
        assert_eq!(question.text, "Who is the Stormfather?");
        assert!(question.timestamp.is_some());

        resolve(&mut runtime, &mut rx).await;

        assert!(!runtime.state().is_pending());
        assert_eq!(runtime.conversation().len(), 3);
        let answer = runtime.conversation().last().unwrap();
        assert_eq!(answer.origin, Origin::Agent);
        assert_eq!(answer.text, "He is a spren.");
        assert!(answer.timestamp.is_some());
    }

    #[tokio::test]
    async fn whitespace_submit_is_a_no_op() {
        let service = MockAnswerService::new();
        let (tx, mut rx) = mpsc::channel(8);
        let mut runtime = SessionRuntime::new(service, tx);

        runtime.handle(draft("   "));
        runtime.handle(Event::SubmitRequested);

        assert!(!runtime.state().is_pending());
        assert_eq!(runtime.conversation().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn submit_while_pending_is_rejected() {
        let service = MockAnswerService::new();
        service.queue_answer("first answer");
        let (tx, mut rx) = mpsc::channel(8);
        let mut runtime = SessionRuntime::new(service, tx);

        runtime.handle(draft("Hello"));
        runtime.handle(Event::SubmitRequested);

        // A second submission before the first resolves is a no-op
        runtime.handle(draft("Again"));
        runtime.handle(Event::SubmitRequested);

        let users: Vec<_> = runtime
            .conversation()
            .messages()
            .iter()
            .filter(|m| m.origin == Origin::User)
            .map(|m| m.text.clone())
            .collect();
        assert_eq!(users, vec!["Hello".to_string()]);

        resolve(&mut runtime, &mut rx).await;

        // The rejected draft survives for the user to resubmit
        assert_eq!(runtime.state().draft, "Again");
        assert_eq!(runtime.conversation().len(), 3);
        // Only one question ever reached the service
        assert_eq!(
            runtime.service.recorded_questions(),
            vec!["Hello".to_string()]
        );
    }

    #[tokio::test]
    async fn transport_failure_yields_fallback_message() {
        let service = MockAnswerService::new();
        service.queue_failure(ArchiveError::Network("connection refused".to_string()));
        let (tx, mut rx) = mpsc::channel(8);
        let mut runtime = SessionRuntime::new(service, tx);

        runtime.handle(draft("X"));
        runtime.handle(Event::SubmitRequested);
        resolve(&mut runtime, &mut rx).await;

        assert!(!runtime.state().is_pending());
        let reply = runtime.conversation().last().unwrap();
        assert_eq!(reply.origin, Origin::Agent);
        assert_eq!(reply.text, FALLBACK_TEXT);
        assert_eq!(runtime.conversation().len(), 3);
    }

    #[tokio::test]
    async fn bad_status_yields_fallback_message() {
        let service = MockAnswerService::new();
        service.queue_failure(ArchiveError::Status {
            status: 503,
            body: "sleeping".to_string(),
        });
        let (tx, mut rx) = mpsc::channel(8);
        let mut runtime = SessionRuntime::new(service, tx);

        runtime.handle(draft("Is the keeper awake?"));
        runtime.handle(Event::SubmitRequested);
        resolve(&mut runtime, &mut rx).await;

        assert_eq!(runtime.conversation().last().unwrap().text, FALLBACK_TEXT);
    }

    #[tokio::test]
    async fn consecutive_exchanges_do_not_interleave() {
        let service = MockAnswerService::new();
        service.queue_answer("answer one");
        service.queue_answer("answer two");
        let (tx, mut rx) = mpsc::channel(8);
        let mut runtime = SessionRuntime::new(service, tx);

        runtime.handle(draft("question one"));
        runtime.handle(Event::SubmitRequested);
        resolve(&mut runtime, &mut rx).await;

        runtime.handle(draft("question two"));
        runtime.handle(Event::SubmitRequested);
        resolve(&mut runtime, &mut rx).await;

        let texts: Vec<_> = runtime
            .conversation()
            .messages()
            .iter()
            .skip(1)
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec!["question one", "answer one", "question two", "answer two"]
        );

        let ids: Vec<_> = runtime
            .conversation()
            .messages()
            .iter()
            .map(|m| m.id)
            .collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
