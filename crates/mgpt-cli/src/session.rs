//! Per-session chat state

use uuid::Uuid;

use crate::shortcuts::Shortcut;
use mgpt_core::{ChatTurn, Conversation};

/// Opening line of every session
pub const GREETING: &str = "Pranam, seeker of truth. I am the chronicler of the Great War. Ask, and I shall recite from the ancient texts.";

/// Mutable state owned by one chat session: the turn history and the
/// shortcut question waiting for the next render cycle.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    conversation: Conversation,
    pending: Option<String>,
}

impl ChatSession {
    /// Create an empty session; call [`ChatSession::bootstrap`] before use
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation: Conversation::new(),
            pending: None,
        }
    }

    /// Create a session that already carries the greeting
    pub fn started() -> Self {
        let mut session = Self::new();
        session.bootstrap();
        session
    }

    /// Seed the greeting. Does nothing once the conversation has turns.
    pub fn bootstrap(&mut self) {
        if self.conversation.is_empty() {
            self.conversation.push(ChatTurn::assistant(GREETING));
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn turns(&self) -> &[ChatTurn] {
        self.conversation.turns()
    }

    /// Queue a shortcut's question for the next render cycle.
    ///
    /// A later activation before consumption replaces the earlier one.
    pub fn queue_shortcut(&mut self, shortcut: &Shortcut) {
        self.queue_query(shortcut.query);
    }

    /// Queue any question for the next render cycle; blank text is ignored
    pub fn queue_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if !query.trim().is_empty() {
            self.pending = Some(query);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the queued question, leaving nothing behind to replay
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub(crate) fn push_user(&mut self, text: &str) {
        self.conversation.push(ChatTurn::user(text));
    }

    pub(crate) fn push_assistant(&mut self, text: &str) {
        self.conversation.push(ChatTurn::assistant(text));
    }

    pub(crate) fn rollback_user_turn(&mut self) -> Option<ChatTurn> {
        self.conversation.rollback_user_turn()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
