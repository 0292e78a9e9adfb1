//! Events that can occur in a mediation

use crate::mediation::{Side, SidePair};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // User events
    UserMessage {
        side: Side,
        text: String,
    },
    ResetConversation {
        side: Side,
    },
    /// Mark a side complete (or not) outside the reply flow
    SetCompletion {
        side: Side,
        complete: bool,
    },

    // Completion collaborator events
    ReplyReceived {
        side: Side,
        text: String,
    },
    ReplyFailed {
        side: Side,
        message: String,
    },
    ResolutionsReady {
        outcomes: SidePair<Result<String, String>>,
    },
}
