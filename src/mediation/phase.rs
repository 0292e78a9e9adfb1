//! Per-side conversation phases
//!
//! A side starts in `Understanding` and moves to `Classification` once the
//! assistant's reply carries [`COMPLETION_MARKER`]. There is no way back
//! except resetting the side.

use super::barrier::confirmed_statement;
use super::classifier::UnderstandingProgress;
use super::{Message, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Substring an assistant reply carries once the person has confirmed the
/// restatement. Case-sensitive.
pub const COMPLETION_MARKER: &str = "Got it!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Understanding,
    Classification,
}

impl Phase {
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Understanding => Some(Phase::Classification),
            Phase::Classification => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Understanding => f.write_str("UNDERSTANDING"),
            Phase::Classification => f.write_str("CLASSIFICATION"),
        }
    }
}

/// Label attached to a side's argument after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArgumentType {
    #[default]
    Unclassified,
}

/// Per-side conversation context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    pub phase: Phase,
    pub understanding: UnderstandingProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_argument: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ArgumentType>,
}

pub fn contains_marker(reply: &str) -> bool {
    reply.contains(COMPLETION_MARKER)
}

/// Rewrites a side's messages when that side enters a phase
pub trait MessageTransformer: Send + Sync {
    fn transform(&self, side: Side, messages: Vec<Message>) -> Vec<Message>;
}

/// Replaces the side's history with a single assistant message holding the
/// confirmed statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseToConfirmedStatement;

impl MessageTransformer for CollapseToConfirmedStatement {
    fn transform(&self, side: Side, messages: Vec<Message>) -> Vec<Message> {
        let statement = confirmed_statement(&messages);
        vec![Message::assistant(side, statement)]
    }
}

/// Transformers keyed by destination phase
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    transformers: HashMap<Phase, Arc<dyn MessageTransformer>>,
}

impl TransformerRegistry {
    #[must_use]
    pub fn with(mut self, phase: Phase, transformer: impl MessageTransformer + 'static) -> Self {
        self.transformers.insert(phase, Arc::new(transformer));
        self
    }

    pub fn apply(&self, phase: Phase, side: Side, messages: Vec<Message>) -> Vec<Message> {
        match self.transformers.get(&phase) {
            Some(t) => t.transform(side, messages),
            None => messages,
        }
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("phases", &self.transformers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Result of feeding an assistant reply to the phase machine
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutcome {
    pub phase: Phase,
    pub messages: Vec<Message>,
    pub transitioned: bool,
}

/// Pure phase transition for one side.
///
/// `messages` is the side's transcript, already including the reply.
pub fn advance_phase(
    phase: Phase,
    side: Side,
    reply: &str,
    messages: Vec<Message>,
    transformers: &TransformerRegistry,
) -> PhaseOutcome {
    match phase.next().filter(|_| contains_marker(reply)) {
        Some(next) => PhaseOutcome {
            phase: next,
            messages: transformers.apply(next, side, messages),
            transitioned: true,
        },
        None => PhaseOutcome {
            phase,
            messages,
            transitioned: false,
        },
    }
}
