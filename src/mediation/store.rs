//! In-memory mediation state
//!
//! Setters here have no side effects. Barrier evaluation, phase changes and
//! I/O live in the state machine and runtime.

use super::phase::{ConversationContext, Phase};
use super::{Message, Side, SidePair};
use crate::mediation::prompts::GREETING;
use serde::Serialize;

/// State container for one mediation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediationState {
    messages: Vec<Message>,
    contexts: SidePair<ConversationContext>,
    loading: SidePair<bool>,
    errors: SidePair<Option<String>>,
    completion: SidePair<bool>,
    #[serde(skip)]
    next_sequence: u64,
}

impl Default for MediationState {
    fn default() -> Self {
        Self::new()
    }
}

impl MediationState {
    /// Fresh session with each side greeted
    pub fn new() -> Self {
        let mut state = Self::empty();
        for side in Side::BOTH {
            state.greet(side);
        }
        state
    }

    /// Fresh session with no messages at all
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            contexts: SidePair::default(),
            loading: SidePair::default(),
            errors: SidePair::default(),
            completion: SidePair::default(),
            next_sequence: 1,
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add_message(&mut self, mut message: Message) {
        message.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.messages.push(message);
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages.clear();
        for message in messages {
            self.add_message(message);
        }
    }

    /// Swap out one side's messages, keeping the other side's in place
    pub fn replace_side_messages(&mut self, side: Side, messages: Vec<Message>) {
        self.messages.retain(|m| m.side != side);
        for message in messages {
            self.add_message(message);
        }
    }

    /// Add the greeting if the side has nothing yet
    pub fn greet(&mut self, side: Side) {
        if !self.messages.iter().any(|m| m.side == side) {
            self.add_message(Message::assistant(side, GREETING));
        }
    }

    pub fn set_context(&mut self, side: Side, context: ConversationContext) {
        self.contexts.set(side, context);
    }

    pub fn set_loading(&mut self, side: Side, loading: bool) {
        self.loading.set(side, loading);
    }

    pub fn set_error(&mut self, side: Side, error: Option<String>) {
        self.errors.set(side, error);
    }

    pub fn set_completion(&mut self, side: Side, complete: bool) {
        self.completion.set(side, complete);
    }

    /// Drop the side's messages and restore its context, error and completion
    pub fn reset_conversation(&mut self, side: Side) {
        self.messages.retain(|m| m.side != side);
        self.contexts.set(side, ConversationContext::default());
        self.errors.set(side, None);
        self.completion.set(side, false);
        self.loading.set(side, false);
    }

    // ------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn messages_for(&self, side: Side) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.side == side)
            .cloned()
            .collect()
    }

    pub fn context(&self, side: Side) -> &ConversationContext {
        self.contexts.get(side)
    }

    pub fn phase(&self, side: Side) -> Phase {
        self.contexts.get(side).phase
    }

    pub fn is_loading(&self, side: Side) -> bool {
        *self.loading.get(side)
    }

    pub fn error(&self, side: Side) -> Option<&str> {
        self.errors.get(side).as_deref()
    }

    pub fn is_complete(&self, side: Side) -> bool {
        *self.completion.get(side)
    }

    pub fn completion(&self) -> &SidePair<bool> {
        &self.completion
    }
}
