//! Fixed assistant text and per-phase system instructions

use super::phase::{Phase, COMPLETION_MARKER};

pub const GREETING: &str = "What seems to be the issue?";

pub const EMPTY_MESSAGE_ERROR: &str = "Message cannot be empty";

pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

pub const WAITING_FOR_OTHER_SIDE: &str = "Got it! Waiting for the other person to finish...";

pub const RESOLVING: &str = "Got it! Coming up with a resolution...";

const UNDERSTANDING_INSTRUCTIONS: &str = "You are a neutral mediator talking privately with \
one side of a conflict. Your only goal right now is to understand this person's side. Ask short, \
open questions about what happened and how they feel. When you believe you understand, restate \
their position in two or three sentences using their own details and ask whether you have it \
right. If they confirm, reply with exactly \"{marker}\" and nothing else. If they correct you, \
restate again. Never take sides and never suggest a resolution.";

const CLASSIFICATION_INSTRUCTIONS: &str = "You are a neutral mediator. You have already \
understood this person's side of the conflict and are waiting for the other person to finish \
explaining theirs. Keep replies brief and reassuring, do not reopen the discussion, and do not \
suggest a resolution yet.";

/// System instructions for a side's current phase
pub fn instructions_for(phase: Phase) -> String {
    match phase {
        Phase::Understanding => UNDERSTANDING_INSTRUCTIONS.replace("{marker}", COMPLETION_MARKER),
        Phase::Classification => CLASSIFICATION_INSTRUCTIONS.to_string(),
    }
}

/// Instructions for generating one side's resolution advice
pub fn resolution_instructions(statement: &str) -> String {
    format!(
        "Based on this person's perspective of the conflict: \"{statement}\", provide a single \
paragraph of specific, actionable advice for what this person can do to help resolve the \
conflict. Focus on what this specific person can do, not what the other person should do. \
Important: Be VERY SPECIFIC TO THE SCENARIO. Use SPECIFIC DETAILS pertaining to what each side \
is thinking, feeling and how to resolve. Almost use TOO MANY specific details about the \
scenario. In your resolution to this person, use wording that seems to take their side, but say \
what needs to be done in order to resolve the conflict."
    )
}

/// Status line stored in place of the assistant's confirmation reply
pub fn confirmation_status(other_side_complete: bool) -> &'static str {
    if other_side_complete {
        RESOLVING
    } else {
        WAITING_FOR_OTHER_SIDE
    }
}
