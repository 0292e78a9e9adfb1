//! Common types for LLM interactions

use serde::{Deserialize, Serialize};

/// LLM request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Message in conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// LLM response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// What the mediation core asks of the completion collaborator: a prompt,
/// the role-tagged history before it, and system instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub history: Vec<LlmMessage>,
    pub instructions: String,
}

impl CompletionRequest {
    /// Request with no history, as used for resolutions
    pub fn single(prompt: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            history: Vec::new(),
            instructions: instructions.into(),
        }
    }

    /// Instructions first, then history, then the prompt as the final user turn
    pub fn to_llm_request(&self) -> LlmRequest {
        let mut messages = self.history.clone();
        messages.push(LlmMessage::user(self.prompt.clone()));
        LlmRequest {
            system: Some(self.instructions.clone()),
            messages,
            max_tokens: None,
            temperature: None,
        }
    }
}
