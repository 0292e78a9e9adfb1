//! Mediation domain: sides, transcripts, phases, the completion barrier and
//! the affirmative-response classifier.

pub mod barrier;
pub mod classifier;
mod message;
pub mod phase;
pub mod prompts;
mod side;
pub mod store;

#[allow(unused_imports)] // Public API re-exports
pub use barrier::{ResolutionRequest, RESOLUTION_FALLBACK};
#[allow(unused_imports)]
pub use classifier::{KeywordClassifier, ResponseClassifier, UnderstandingStep};
#[allow(unused_imports)]
pub use message::{Author, Message, MessageKind};
#[allow(unused_imports)]
pub use phase::{ConversationContext, Phase, TransformerRegistry, COMPLETION_MARKER};
#[allow(unused_imports)]
pub use side::{Side, SidePair, UnknownSide};
pub use store::MediationState;
