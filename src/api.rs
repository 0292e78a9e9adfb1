//! HTTP API for the mediation session

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::llm::LlmService;
use crate::runtime::MediationHandle;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mediation: MediationHandle,
    /// Used directly by the chat proxy route
    pub llm: Arc<dyn LlmService>,
}

impl AppState {
    pub fn new(mediation: MediationHandle, llm: Arc<dyn LlmService>) -> Self {
        Self { mediation, llm }
    }
}
