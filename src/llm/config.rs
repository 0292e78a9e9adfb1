//! LLM provider configuration

use super::{LlmError, LlmService, LoggingService, OpenAIService};
use async_trait::async_trait;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Configuration for the completion provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable numbers fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: lookup("MEDIATOR_MODEL").unwrap_or(defaults.model),
            temperature: lookup("MEDIATOR_TEMPERATURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            max_tokens: lookup("MEDIATOR_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }

    /// Build the service, wrapped with logging. Without a key every call fails.
    pub fn build_service(&self) -> Result<Arc<dyn LlmService>, LlmError> {
        let inner: Arc<dyn LlmService> = match &self.api_key {
            Some(key) => Arc::new(OpenAIService::new(key.clone(), self)?),
            None => Arc::new(UnconfiguredService {
                model_id: self.model.clone(),
            }),
        };
        Ok(Arc::new(LoggingService::new(inner)))
    }
}

/// Stand-in used when no API key is present
pub struct UnconfiguredService {
    model_id: String,
}

#[async_trait]
impl LlmService for UnconfiguredService {
    async fn complete(
        &self,
        _request: &super::LlmRequest,
    ) -> Result<super::LlmResponse, LlmError> {
        Err(LlmError::not_configured("OpenAI API key not configured"))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
