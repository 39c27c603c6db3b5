use crate::i18n::LanguageCode;
use serde::{Deserialize, Serialize};

/// One `(text, from, to)` translation to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
}

/// A finished translation. `from` is the effective source language: the
/// detected one when the request asked for `auto` and the provider was
/// confident, the requested one otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub original: String,
    pub translated: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
}

/// A target language whose translation failed within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFailure {
    pub to: LanguageCode,
    pub message: String,
}

/// Everything one orchestrator run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Reconciled and filtered results, in target order
    pub results: Vec<TranslationResult>,
    pub failures: Vec<TargetFailure>,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.failures.is_empty()
    }
}
