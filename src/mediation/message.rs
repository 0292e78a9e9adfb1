//! Chat transcript entries

use super::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

/// What a message was created for; used as the id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    Error,
    Resolution,
}

impl MessageKind {
    fn prefix(self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "ai",
            MessageKind::Error => "error",
            MessageKind::Resolution => "resolution",
        }
    }

    fn author(self) -> Author {
        match self {
            MessageKind::User => Author::User,
            MessageKind::Assistant | MessageKind::Error | MessageKind::Resolution => {
                Author::Assistant
            }
        }
    }
}

/// A single transcript entry.
///
/// `sequence` is stamped by the store on insertion and is strictly increasing
/// across both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sequence: u64,
    pub content: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
    pub side: Side,
}

impl Message {
    pub fn new(kind: MessageKind, side: Side, content: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}-{}", kind.prefix(), side, uuid::Uuid::new_v4()),
            sequence: 0,
            content: content.into(),
            author: kind.author(),
            timestamp: Utc::now(),
            side,
        }
    }

    pub fn user(side: Side, content: impl Into<String>) -> Self {
        Self::new(MessageKind::User, side, content)
    }

    pub fn assistant(side: Side, content: impl Into<String>) -> Self {
        Self::new(MessageKind::Assistant, side, content)
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}
