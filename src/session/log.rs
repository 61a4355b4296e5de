//! Append-only conversation log

use chrono::{DateTime, Local};

/// Greeting shown before any exchange has taken place.
///
/// Carries no timestamp: it does not arise from a real exchange, so
/// presenting a time for it would be misleading.
pub const GREETING: &str = "Greetings, seeker of knowledge. I am the CosmereArchivist, \
keeper of the ancient archives. What wisdom do you seek from the depths of the Cosmere?";

/// Which side of the conversation a message is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Agent,
}

/// Stable, strictly increasing message identifier
///
/// Used for ordering and as a stable render key within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in the conversation log
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub origin: Origin,
    /// `None` only for the seed greeting
    pub timestamp: Option<DateTime<Local>>,
}

/// Ordered, append-only sequence of messages for one session
///
/// Insertion order is display order. No message is ever edited or removed;
/// the single writer is the session runtime. Observers watch `len()` to
/// react to appends.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

impl Conversation {
    /// Create the log with its seed greeting already in place
    pub fn seeded() -> Self {
        let mut log = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        log.append(Origin::Agent, GREETING, None);
        log
    }

    /// Append a message stamped with the current instant
    pub fn push(&mut self, origin: Origin, text: impl Into<String>) -> &Message {
        self.append(origin, text, Some(Local::now()))
    }

    fn append(
        &mut self,
        origin: Origin,
        text: impl Into<String>,
        timestamp: Option<DateTime<Local>>,
    ) -> &Message {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: text.into(),
            origin,
            timestamp,
        });
        // Just pushed, so the slot exists
        self.messages.last().unwrap()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)] // Used in tests
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::seeded()
    }
}
