//! Pure state transition function
//!
//! Given the same state and event it produces the same state and effects.
//! The only non-determinism is the id and timestamp of messages it creates.

use super::{Effect, Event, MediationContext};
use crate::llm::{CompletionRequest, LlmMessage};
use crate::mediation::barrier::{self, confirmed_statement};
use crate::mediation::phase::{advance_phase, contains_marker, ArgumentType, Phase};
use crate::mediation::prompts::{
    confirmation_status, instructions_for, APOLOGY, EMPTY_MESSAGE_ERROR,
};
use crate::mediation::{MediationState, Message, MessageKind, Side};

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: MediationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: MediationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

pub fn transition(
    state: &MediationState,
    context: &MediationContext,
    event: Event,
) -> TransitionResult {
    let mut next = state.clone();

    match event {
        Event::UserMessage { side, text } => {
            next.set_error(side, None);
            if text.trim().is_empty() {
                next.set_error(side, Some(EMPTY_MESSAGE_ERROR.to_string()));
                return TransitionResult::new(next).with_effect(Effect::PublishSnapshot);
            }

            let request = build_reply_request(&next, side, &text);

            if next.phase(side) == Phase::Understanding {
                let mut ctx = next.context(side).clone();
                ctx.understanding = ctx.understanding.advance(&text, context.classifier.as_ref());
                next.set_context(side, ctx);
            }

            next.add_message(Message::user(side, text));
            next.set_loading(side, true);

            TransitionResult::new(next).with_effects([
                Effect::PublishSnapshot,
                Effect::request_reply(side, request),
            ])
        }

        Event::ReplyReceived { side, text } => {
            next.set_loading(side, false);
            let phase = next.phase(side);

            let content = if phase == Phase::Understanding && contains_marker(&text) {
                confirmation_status(next.is_complete(side.other())).to_string()
            } else {
                text.clone()
            };
            next.add_message(Message::assistant(side, content));

            let side_messages = next.messages_for(side);
            let statement = confirmed_statement(&side_messages);
            let outcome = advance_phase(
                phase,
                side,
                &text,
                side_messages.clone(),
                &context.transformers,
            );

            let mut effects = vec![Effect::PublishSnapshot];
            if outcome.transitioned {
                tracing::info!(side = %side, phase = %outcome.phase, "Side understood");

                let mut ctx = next.context(side).clone();
                ctx.phase = outcome.phase;
                ctx.user_argument = Some(statement);
                ctx.classification = Some(ArgumentType::Unclassified);
                next.set_context(side, ctx);

                if outcome.messages != side_messages {
                    next.replace_side_messages(side, outcome.messages);
                }

                next.set_completion(side, true);
                if let Some(request) = barrier::check(&mut next) {
                    effects.push(Effect::RequestResolutions(request));
                }
            }

            TransitionResult::new(next).with_effects(effects)
        }

        Event::ReplyFailed { side, message } => {
            tracing::warn!(side = %side, error = %message, "Reply request failed");
            next.set_loading(side, false);
            next.set_error(side, Some(message));
            next.add_message(Message::new(MessageKind::Error, side, APOLOGY));
            TransitionResult::new(next).with_effect(Effect::PublishSnapshot)
        }

        Event::SetCompletion { side, complete } => {
            next.set_completion(side, complete);
            let mut result = TransitionResult::new(next);
            if complete {
                if let Some(request) = barrier::check(&mut result.new_state) {
                    result = result.with_effect(Effect::RequestResolutions(request));
                }
            }
            result.with_effect(Effect::PublishSnapshot)
        }

        Event::ResolutionsReady { outcomes } => {
            barrier::apply_resolutions(&mut next, outcomes);
            TransitionResult::new(next).with_effect(Effect::PublishSnapshot)
        }

        Event::ResetConversation { side } => {
            next.reset_conversation(side);
            next.greet(side);
            TransitionResult::new(next).with_effect(Effect::PublishSnapshot)
        }
    }
}

/// History is the side's transcript before the new user message; the message
/// itself travels as the prompt.
fn build_reply_request(state: &MediationState, side: Side, text: &str) -> CompletionRequest {
    let history = state
        .messages_for(side)
        .into_iter()
        .map(|m| {
            if m.is_user() {
                LlmMessage::user(m.content)
            } else {
                LlmMessage::assistant(m.content)
            }
        })
        .collect();

    CompletionRequest {
        prompt: text.to_string(),
        history,
        instructions: instructions_for(state.phase(side)),
    }
}
