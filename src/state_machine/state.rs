//! Immutable configuration the transition function consults

use crate::mediation::phase::CollapseToConfirmedStatement;
use crate::mediation::{KeywordClassifier, Phase, ResponseClassifier, TransformerRegistry};
use std::fmt;
use std::sync::Arc;

/// Context for a mediation session (immutable configuration)
#[derive(Clone)]
pub struct MediationContext {
    pub classifier: Arc<dyn ResponseClassifier>,
    pub transformers: TransformerRegistry,
}

impl Default for MediationContext {
    fn default() -> Self {
        Self {
            classifier: Arc::new(KeywordClassifier),
            transformers: TransformerRegistry::default(),
        }
    }
}

impl MediationContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `MEDIATOR_COLLAPSE_CONFIRMED` collapses a side's transcript to its
    /// confirmed statement once it is understood. Off unless set to a truthy value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let collapse = lookup("MEDIATOR_COLLAPSE_CONFIRMED").is_some_and(|v| {
            matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
        });

        let mut transformers = TransformerRegistry::default();
        if collapse {
            transformers = transformers.with(Phase::Classification, CollapseToConfirmedStatement);
        }
        Self::default().with_transformers(transformers)
    }

    #[allow(dead_code)] // Embedders swap the heuristic; the server keeps the keyword list
    pub fn with_classifier(mut self, classifier: impl ResponseClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_transformers(mut self, transformers: TransformerRegistry) -> Self {
        self.transformers = transformers;
        self
    }
}

impl fmt::Debug for MediationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediationContext")
            .field("transformers", &self.transformers)
            .finish_non_exhaustive()
    }
}
