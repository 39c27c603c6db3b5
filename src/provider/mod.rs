//! Translation provider seam.
//!
//! The engine never talks HTTP directly. It goes through `TranslateProvider`,
//! which returns the provider's raw view of one translation (text, detected
//! source language, confidence flag) or a structured error with a kind
//! discriminator. `GoogleTranslateProvider` is the production implementation
//! and `MockProvider` is a scripted stand-in for unit tests.

mod google;
#[cfg(test)]
mod mock;

pub use google::{GoogleTranslateProvider, DEFAULT_API_URL};
#[cfg(test)]
pub use mock::MockProvider;

use crate::i18n::LanguageCode;
use async_trait::async_trait;
use std::fmt;

/// What the provider returned for one `(text, from, to)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTranslation {
    pub translated_text: String,
    /// Source language the provider detected, when it reports one
    pub detected_source_language: Option<String>,
    /// Provider is unsure about the detected language ("did you mean")
    pub did_you_mean: bool,
}

/// Discriminator for provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Too many requests; worth retrying after a pause
    RateLimited,
    /// Anything else: network, HTTP error, malformed body
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Other,
            message: message.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == ProviderErrorKind::RateLimited
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderError {}

/// A machine translation backend.
#[async_trait]
pub trait TranslateProvider: Send + Sync {
    /// Translate `text` from `from` (possibly `auto`) into `to`.
    async fn translate(
        &self,
        text: &str,
        from: &LanguageCode,
        to: &LanguageCode,
    ) -> Result<ProviderTranslation, ProviderError>;

    /// Name used in logs.
    fn provider_name(&self) -> &str;
}

/// A spelling correction service.
#[async_trait]
pub trait Spellchecker: Send + Sync {
    /// `Ok(Some(corrected))` when a correction differs from `text`,
    /// `Ok(None)` when there is nothing to suggest.
    async fn spellcheck(&self, text: &str) -> Result<Option<String>, ProviderError>;
}
