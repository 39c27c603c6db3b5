//! Scripted translate provider for unit tests.
//!
//! Unscripted requests echo the input back, reporting the requested source
//! language as detected (or nothing when it was `auto`).
//!
//! # Example
//!
//! ```ignore
//! let mock = MockProvider::new()
//!     .with_translation("bonjour", "en", "hello", Some("fr"))
//!     .with_failure("de", ProviderError::other("boom"));
//! ```

use crate::i18n::LanguageCode;
use crate::provider::{
    ProviderError, ProviderTranslation, Spellchecker, TranslateProvider,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockProvider {
    /// (text, to) → response
    translations: HashMap<(String, String), ProviderTranslation>,
    /// to → error returned for every request into that language
    failures: HashMap<String, ProviderError>,
    /// text → simulated latency
    delays: HashMap<String, Duration>,
    /// text → corrected spelling
    spellings: HashMap<String, String>,
    spellcheck_error: Option<ProviderError>,
    /// Number of upcoming translate calls that answer "too many requests"
    throttled_calls: AtomicU32,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(
        mut self,
        text: &str,
        to: &str,
        translated: &str,
        detected: Option<&str>,
    ) -> Self {
        self.translations.insert(
            (text.to_string(), to.to_string()),
            ProviderTranslation {
                translated_text: translated.to_string(),
                detected_source_language: detected.map(str::to_string),
                did_you_mean: false,
            },
        );
        self
    }

    /// Like `with_translation`, but the provider is unsure of the detected language.
    pub fn with_uncertain_translation(
        mut self,
        text: &str,
        to: &str,
        translated: &str,
        detected: &str,
    ) -> Self {
        self.translations.insert(
            (text.to_string(), to.to_string()),
            ProviderTranslation {
                translated_text: translated.to_string(),
                detected_source_language: Some(detected.to_string()),
                did_you_mean: true,
            },
        );
        self
    }

    pub fn with_failure(mut self, to: &str, error: ProviderError) -> Self {
        self.failures.insert(to.to_string(), error);
        self
    }

    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Answer the next `count` translate calls with a rate-limit error.
    pub fn with_rate_limits(self, count: u32) -> Self {
        self.throttled_calls.store(count, Ordering::SeqCst);
        self
    }

    pub fn with_spelling(mut self, text: &str, corrected: &str) -> Self {
        self.spellings
            .insert(text.to_string(), corrected.to_string());
        self
    }

    pub fn with_spellcheck_error(mut self, error: ProviderError) -> Self {
        self.spellcheck_error = Some(error);
        self
    }

    /// Number of translate calls received so far, throttled ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslateProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        from: &LanguageCode,
        to: &LanguageCode,
    ) -> Result<ProviderTranslation, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }

        let throttled = self
            .throttled_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if throttled {
            return Err(ProviderError::rate_limited("429 Too Many Requests"));
        }

        if let Some(error) = self.failures.get(to.as_str()) {
            return Err(error.clone());
        }

        let key = (text.to_string(), to.as_str().to_string());
        Ok(self
            .translations
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ProviderTranslation {
                translated_text: text.to_string(),
                detected_source_language: (!from.is_auto()).then(|| from.to_string()),
                did_you_mean: false,
            }))
    }

    fn provider_name(&self) -> &str {
        "Mock Provider"
    }
}

#[async_trait]
impl Spellchecker for MockProvider {
    async fn spellcheck(&self, text: &str) -> Result<Option<String>, ProviderError> {
        if let Some(error) = &self.spellcheck_error {
            return Err(error.clone());
        }
        Ok(self.spellings.get(text).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(c: &str) -> LanguageCode {
        LanguageCode::parse(c).unwrap()
    }

    #[tokio::test]
    async fn test_scripted_translation() {
        let mock = MockProvider::new().with_translation("bonjour", "en", "hello", Some("fr"));

        let result = mock
            .translate("bonjour", &LanguageCode::auto(), &code("en"))
            .await
            .unwrap();

        assert_eq!(result.translated_text, "hello");
        assert_eq!(result.detected_source_language.as_deref(), Some("fr"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_unscripted_echoes_input() {
        let mock = MockProvider::new();

        let result = mock.translate("salut", &code("fr"), &code("de")).await.unwrap();
        assert_eq!(result.translated_text, "salut");
        assert_eq!(result.detected_source_language.as_deref(), Some("fr"));

        let auto = mock
            .translate("salut", &LanguageCode::auto(), &code("de"))
            .await
            .unwrap();
        assert_eq!(auto.detected_source_language, None);
    }

    #[tokio::test]
    async fn test_rate_limits_run_out() {
        let mock = MockProvider::new().with_rate_limits(2);
        let (en, fr) = (code("en"), code("fr"));

        assert!(mock.translate("a", &en, &fr).await.unwrap_err().is_rate_limited());
        assert!(mock.translate("a", &en, &fr).await.unwrap_err().is_rate_limited());
        assert!(mock.translate("a", &en, &fr).await.is_ok());
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_spellcheck() {
        let mock = MockProvider::new().with_spelling("helo", "hello");

        assert_eq!(mock.spellcheck("helo").await.unwrap().as_deref(), Some("hello"));
        assert_eq!(mock.spellcheck("fine").await.unwrap(), None);
    }
}
