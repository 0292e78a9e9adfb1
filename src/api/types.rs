//! API request and response types

use crate::llm::LlmMessage;
use serde::{Deserialize, Serialize};

/// Request to send a message on one side
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// Response for a queued message
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Request to mark a side complete or not
#[derive(Debug, Deserialize)]
pub struct SetCompletionRequest {
    pub complete: bool,
}

/// Response for reset and completion
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// One prior turn sent to the chat proxy
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryEntry {
    #[serde(default)]
    pub is_user: bool,
    pub content: String,
}

impl From<ChatHistoryEntry> for LlmMessage {
    fn from(entry: ChatHistoryEntry) -> Self {
        if entry.is_user {
            LlmMessage::user(entry.content)
        } else {
            LlmMessage::assistant(entry.content)
        }
    }
}

/// Raw completion request, independent of the mediation state
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatHistoryEntry>,
    pub system_instructions: Option<String>,
}

/// Reply from the chat proxy
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
