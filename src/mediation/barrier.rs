//! Completion barrier
//!
//! Detection is pure and happens inside the state transition; the paired
//! resolution fetch is an effect executed by the runtime, whose outcome is
//! applied back through [`apply_resolutions`].

use super::store::MediationState;
use super::{Message, MessageKind, Side, SidePair};
use serde::Serialize;

/// Substituted for a side whose resolution request failed
pub const RESOLUTION_FALLBACK: &str = "Unable to generate resolution advice at this time.";

/// The statement a side confirmed: the assistant restatement that preceded
/// the final confirmation reply.
///
/// Takes the second-to-last assistant message, or the only one when there is
/// a single assistant message, or an empty string when there are none. This
/// assumes the confirmation reply is the last assistant message; extra
/// follow-ups after it shift the pick.
pub fn confirmed_statement(messages: &[Message]) -> String {
    let assistant: Vec<&Message> = messages.iter().filter(|m| !m.is_user()).collect();
    let pick = match assistant.len() {
        0 => None,
        1 => assistant.first(),
        n => assistant.get(n - 2),
    };
    pick.map(|m| m.content.clone()).unwrap_or_default()
}

/// Emitted once both sides are complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRequest {
    pub statements: SidePair<String>,
}

/// Fire the barrier if both sides are complete.
///
/// Clears both completion flags before returning the request, so a side
/// marked complete again while resolutions are in flight cannot fire it twice.
pub fn check(state: &mut MediationState) -> Option<ResolutionRequest> {
    if !state.completion().both() {
        return None;
    }

    for side in Side::BOTH {
        state.set_completion(side, false);
    }

    let statements = SidePair::from_fn(|side| confirmed_statement(&state.messages_for(side)));
    tracing::info!("Both sides understood, requesting resolutions");
    Some(ResolutionRequest { statements })
}

/// Replace the whole transcript with one resolution per side.
///
/// Failures are isolated: a failed side gets [`RESOLUTION_FALLBACK`], the
/// other side's text is used as-is.
pub fn apply_resolutions(state: &mut MediationState, outcomes: SidePair<Result<String, String>>) {
    let resolved = outcomes.map(|side, outcome| match outcome {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(side = %side, error = %e, "Resolution failed, using fallback");
            RESOLUTION_FALLBACK.to_string()
        }
    });

    state.set_messages(vec![
        Message::new(MessageKind::Resolution, Side::Left, resolved.left),
        Message::new(MessageKind::Resolution, Side::Right, resolved.right),
    ]);
}
