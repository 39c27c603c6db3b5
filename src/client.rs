//! Cache-aware single translation call.

use crate::cache::{CacheKey, TranslationCache};
use crate::error::TranslateError;
use crate::i18n::LanguageCode;
use crate::metrics::TranslationMetrics;
use crate::provider::{ProviderError, TranslateProvider};
use crate::retry::{retry_when, Exhausted, RetryConfig};
use crate::types::{TranslationRequest, TranslationResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Translates one `(text, from, to)` triple, consulting the shared cache first.
///
/// Rate-limit errors are retried with exponential backoff inside the call;
/// every other provider error fails the call immediately. Only successful
/// results are cached.
#[derive(Clone)]
pub struct TranslateClient {
    provider: Arc<dyn TranslateProvider>,
    cache: Arc<TranslationCache>,
    retry: RetryConfig,
    metrics: Arc<TranslationMetrics>,
}

impl TranslateClient {
    pub fn new(provider: Arc<dyn TranslateProvider>, cache: Arc<TranslationCache>) -> Self {
        Self {
            provider,
            cache,
            retry: RetryConfig::rate_limit(),
            metrics: Arc::new(TranslationMetrics::new()),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    pub async fn translate_request(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslateError> {
        self.translate(&request.text, &request.from, &request.to).await
    }

    pub async fn translate(
        &self,
        text: &str,
        from: &LanguageCode,
        to: &LanguageCode,
    ) -> Result<TranslationResult, TranslateError> {
        if text.is_empty() {
            return Ok(TranslationResult {
                original: String::new(),
                translated: String::new(),
                from: from.clone(),
                to: to.clone(),
            });
        }

        let key = CacheKey::new(from, to, text);
        if let Some(cached) = self.cache.get(&key) {
            self.metrics.record_cache_hit();
            debug!("Cache hit for {} -> {}", from, to);
            return Ok(cached);
        }
        self.metrics.record_cache_miss();

        let label = format!("Translate {} -> {}", from, to);
        let provider = self.provider.as_ref();
        let metrics = self.metrics.as_ref();
        let response = retry_when(
            &self.retry,
            &label,
            move || async move {
                metrics.record_provider_call();
                let outcome = provider.translate(text, from, to).await;
                if matches!(&outcome, Err(e) if e.is_rate_limited()) {
                    metrics.record_rate_limited();
                }
                outcome
            },
            ProviderError::is_rate_limited,
        )
        .await
        .map_err(|exhausted| {
            self.metrics.record_provider_failure();
            classify(exhausted)
        })?;

        let effective_from = match response.detected_source_language.as_deref() {
            Some(detected) if from.is_auto() && !response.did_you_mean && !detected.is_empty() => {
                LanguageCode::parse(detected)
                    .unwrap_or_else(|_| LanguageCode::from_provider(detected))
            }
            Some(detected) if from.is_auto() && response.did_you_mean => {
                debug!(
                    "{} is unsure about detected language {}, keeping {}",
                    self.provider.provider_name(),
                    detected,
                    from
                );
                from.clone()
            }
            _ => from.clone(),
        };

        let result = TranslationResult {
            original: text.to_string(),
            translated: response.translated_text,
            from: effective_from,
            to: to.clone(),
        };

        self.cache.set(key, result.clone());
        Ok(result)
    }
}

fn classify(exhausted: Exhausted<ProviderError>) -> TranslateError {
    let Exhausted { error, attempts } = exhausted;
    if error.is_rate_limited() {
        warn!("Rate limit persisted after {} attempts", attempts);
        TranslateError::RateLimited {
            attempts,
            message: error.message,
        }
    } else {
        TranslateError::Provider(error.message)
    }
}
