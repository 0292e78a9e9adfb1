//! Effects produced by state transitions

use crate::llm::CompletionRequest;
use crate::mediation::{ResolutionRequest, Side};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the completion collaborator for a side's next reply
    RequestReply {
        side: Side,
        request: CompletionRequest,
    },

    /// Fetch both resolutions concurrently and report them together
    RequestResolutions(ResolutionRequest),

    /// Publish the new state to readers
    PublishSnapshot,
}

impl Effect {
    pub fn request_reply(side: Side, request: CompletionRequest) -> Self {
        Effect::RequestReply { side, request }
    }
}
