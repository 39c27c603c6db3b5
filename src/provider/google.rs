//! Google Translate (`translate_a/single`, `client=gtx`) provider.
//!
//! The endpoint answers with a positional JSON array rather than an object:
//!
//! - `[0]`: translated sentences, each `[translated, original, ...]`
//! - `[2]`: detected source language
//! - `[7]`: spelling suggestion `[marked_up, plain, ...]` (with `dt=qc`)
//! - `[8]`: language detection candidates, `[[code, ...], ...]`
//!
//! When the first detection candidate disagrees with `[2]` the provider is
//! not confident about the source language; that is reported as
//! `did_you_mean`.

use crate::config::Config;
use crate::i18n::LanguageCode;
use crate::provider::{ProviderError, ProviderTranslation, Spellchecker, TranslateProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://translate.googleapis.com/translate_a/single";

static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Clone)]
pub struct GoogleTranslateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build a provider with its own HTTP client, honoring the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to build HTTP client for translate provider")?;

        Ok(Self::new(client, config.translate_api_url.clone()))
    }

    async fn fetch(&self, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::other(format!("Translate request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::rate_limited(format!(
                "Translate API rate limit ({})",
                status
            )));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::other(format!(
                "Translate API error ({}): {}",
                status, body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::other(format!("Failed to parse translate response: {}", e)))
    }
}

#[async_trait]
impl TranslateProvider for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        from: &LanguageCode,
        to: &LanguageCode,
    ) -> Result<ProviderTranslation, ProviderError> {
        let body = self
            .fetch(&[
                ("client", "gtx"),
                ("sl", from.as_str()),
                ("tl", to.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .await?;

        parse_translation(&body)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

#[async_trait]
impl Spellchecker for GoogleTranslateProvider {
    async fn spellcheck(&self, text: &str) -> Result<Option<String>, ProviderError> {
        let body = self
            .fetch(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", "en"),
                ("dt", "qc"),
                ("q", text),
            ])
            .await?;

        let suggestion = parse_spelling_suggestion(&body);
        debug!("Spellcheck suggestion for {:?}: {:?}", text, suggestion);
        Ok(suggestion.filter(|s| s != text))
    }
}

fn parse_translation(body: &Value) -> Result<ProviderTranslation, ProviderError> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::other("Translate response has no sentences"))?;

    let translated_text: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    let detected_source_language = body.get(2).and_then(Value::as_str).map(str::to_string);

    let confident_language = body
        .get(8)
        .and_then(|candidates| candidates.get(0))
        .and_then(|codes| codes.get(0))
        .and_then(Value::as_str);

    let did_you_mean = match (&detected_source_language, confident_language) {
        (Some(detected), Some(confident)) => detected != confident,
        _ => false,
    };

    Ok(ProviderTranslation {
        translated_text,
        detected_source_language,
        did_you_mean,
    })
}

fn parse_spelling_suggestion(body: &Value) -> Option<String> {
    let suggestion = body.get(7)?;

    if let Some(plain) = suggestion.get(1).and_then(Value::as_str) {
        if !plain.is_empty() {
            return Some(plain.to_string());
        }
    }

    let marked_up = suggestion.get(0).and_then(Value::as_str)?;
    let markup = MARKUP_REGEX.get_or_init(|| Regex::new(r"</?[bi]>").expect("valid regex"));
    let plain = markup.replace_all(marked_up, "").to_string();
    (!plain.is_empty()).then_some(plain)
}
