//! Affirmative-response detection and the understanding sub-steps it drives
//!
//! Matching is plain substring containment on the lowercased reply, so a
//! negated answer that happens to contain a token ("not right") still counts
//! as affirmative. Known weakness of the heuristic; swap the classifier to
//! change it.

use serde::{Deserialize, Serialize};

const AFFIRMATIVE_TOKENS: &[&str] = &[
    "yes", "yeah", "yep", "yup", "ya",
    "correct", "right", "exactly", "precisely",
    "indeed", "absolutely", "definitely", "certainly",
    "sure", "naturally", "undoubtedly", "indubitably",
    "uh-huh", "mhm", "yessir", "yessiree",
    "you bet", "you betcha", "righto", "roger",
    "aye", "totally", "totes", "fo sho",
    "positively", "unquestionably",
    "without doubt", "beyond doubt", "for sure",
    "most certainly", "by all means", "affirmative",
    "oui", "si", "ja", "hai", "da",
    "of course", "you know it", "absolutely yes",
    "sure thing", "obviously",
    "definitely yes", "without a doubt",
    "acknowledged", "confirmed", "verified",
    "affirmed", "approved", "granted",
    "concurred", "assented", "agreed",
];

/// Decides whether a user reply confirms the assistant's restatement
pub trait ResponseClassifier: Send + Sync {
    fn is_affirmative(&self, text: &str) -> bool;
}

/// Keyword list classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl ResponseClassifier for KeywordClassifier {
    fn is_affirmative(&self, text: &str) -> bool {
        is_affirmative(text)
    }
}

pub fn is_affirmative(text: &str) -> bool {
    let lowered = text.to_lowercase();
    AFFIRMATIVE_TOKENS
        .iter()
        .any(|token| lowered.contains(token))
}

/// Sub-steps of the understanding phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderstandingStep {
    #[default]
    Initial,
    GettingSide,
    Verifying,
    Understood,
}

/// Progress through the understanding sub-steps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnderstandingProgress {
    pub step: UnderstandingStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_content: Option<String>,
}

impl UnderstandingProgress {
    /// Advance on a user reply. Only `Verifying` consults the classifier.
    #[must_use]
    pub fn advance(&self, reply: &str, classifier: &dyn ResponseClassifier) -> Self {
        match self.step {
            UnderstandingStep::Initial => Self {
                step: UnderstandingStep::GettingSide,
                verified_content: self.verified_content.clone(),
            },
            UnderstandingStep::GettingSide => Self {
                step: UnderstandingStep::Verifying,
                verified_content: Some(reply.to_string()),
            },
            UnderstandingStep::Verifying if classifier.is_affirmative(reply) => Self {
                step: UnderstandingStep::Understood,
                verified_content: self.verified_content.clone(),
            },
            UnderstandingStep::Verifying | UnderstandingStep::Understood => self.clone(),
        }
    }
}
