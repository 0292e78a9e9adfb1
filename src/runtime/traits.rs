//! Trait abstractions for runtime I/O
//!
//! The completion collaborator is the only I/O the mediation core performs;
//! the trait lets tests drive the executor with mocks.

use crate::llm::{CompletionRequest, LlmError, LlmService};
use async_trait::async_trait;
use std::sync::Arc;

/// The opaque "ask(prompt, history, instructions) -> reply" collaborator
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn ask(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn ask(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        (**self).ask(request).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use an `LlmService` as the completion collaborator
#[derive(Clone)]
pub struct ServiceCompletionClient {
    service: Arc<dyn LlmService>,
}

impl ServiceCompletionClient {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CompletionClient for ServiceCompletionClient {
    async fn ask(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let response = self.service.complete(&request.to_llm_request()).await?;
        Ok(response.text)
    }
}
