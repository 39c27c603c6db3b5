use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::diff::{DEFAULT_DIFF_CACHE_CAPACITY, DEFAULT_MAX_DIFF_CHARS};
use crate::i18n::LanguageCode;
use crate::provider::DEFAULT_API_URL;
use crate::retry::RetryConfig;
use anyhow::{bail, Context, Result};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Provider
    pub translate_api_url: String,
    pub http_timeout_secs: u64,

    // Languages
    pub source_language: LanguageCode,
    pub target_languages: Vec<LanguageCode>,

    // Caches
    pub cache_capacity: usize,
    pub diff_cache_capacity: usize,
    pub diff_max_chars: usize,

    // Input
    pub debounce_ms: u64,

    // Rate limiting
    pub rate_limit_max_attempts: u32,
    pub rate_limit_initial_delay_ms: u64,
    pub rate_limit_max_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Missing variables take their
    /// defaults; present but malformed ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let source_language = match lookup("SOURCE_LANGUAGE") {
            Some(raw) => LanguageCode::parse(&raw).context("SOURCE_LANGUAGE is not a known language")?,
            None => LanguageCode::auto(),
        };

        let target_languages = parse_targets(
            lookup("TARGET_LANGUAGES")
                .as_deref()
                .unwrap_or("en,es"),
        )?;

        let config = Self {
            translate_api_url: lookup("TRANSLATE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            http_timeout_secs: parse_var(&lookup, "HTTP_TIMEOUT_SECS", 10)?,

            source_language,
            target_languages,

            cache_capacity: parse_var(&lookup, "CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?,
            diff_cache_capacity: parse_var(&lookup, "DIFF_CACHE_CAPACITY", DEFAULT_DIFF_CACHE_CAPACITY)?,
            diff_max_chars: parse_var(&lookup, "DIFF_MAX_CHARS", DEFAULT_MAX_DIFF_CHARS)?,

            debounce_ms: parse_var(&lookup, "DEBOUNCE_MS", DEFAULT_DEBOUNCE.as_millis() as u64)?,

            rate_limit_max_attempts: parse_var(&lookup, "RATE_LIMIT_MAX_ATTEMPTS", 5)?,
            rate_limit_initial_delay_ms: parse_var(&lookup, "RATE_LIMIT_INITIAL_DELAY_MS", 500)?,
            rate_limit_max_delay_ms: parse_var(&lookup, "RATE_LIMIT_MAX_DELAY_MS", 8000)?,
        };

        if config.cache_capacity == 0 {
            bail!("CACHE_CAPACITY must be at least 1");
        }

        Ok(config)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(
            self.rate_limit_max_attempts,
            Duration::from_millis(self.rate_limit_initial_delay_ms),
        )
        .with_max_delay(Duration::from_millis(self.rate_limit_max_delay_ms))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        None => Ok(default),
    }
}

fn parse_targets(raw: &str) -> Result<Vec<LanguageCode>> {
    let mut targets = Vec::new();
    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let language = LanguageCode::parse(code)
            .with_context(|| format!("TARGET_LANGUAGES contains an unknown language: {}", code))?;
        if language.is_auto() {
            bail!("TARGET_LANGUAGES cannot contain auto");
        }
        if !targets.contains(&language) {
            targets.push(language);
        }
    }

    if targets.is_empty() {
        bail!("TARGET_LANGUAGES must name at least one language");
    }
    Ok(targets)
}
