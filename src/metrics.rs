//! Translate-call counters.
//!
//! Each `TranslateClient` owns one `TranslationMetrics`; clones of a client
//! share it through an `Arc`. Counters are relaxed atomics since they are
//! only read for reporting.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct TranslationMetrics {
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    /// Requests sent to the provider, retries included
    provider_calls: AtomicUsize,
    /// Translate calls that ended in an error after retries
    provider_failures: AtomicUsize,
    /// Provider calls answered with "too many requests"
    rate_limited_calls: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_failure(&self) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::Relaxed)
    }

    pub fn provider_failures(&self) -> usize {
        self.provider_failures.load(Ordering::Relaxed)
    }

    pub fn rate_limited_calls(&self) -> usize {
        self.rate_limited_calls.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let lookups = hits + misses;
        let cache_hit_rate = if lookups > 0 {
            (hits as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        let failures = self.provider_failures();
        let success_rate = if misses > 0 {
            (misses.saturating_sub(failures) as f64 / misses as f64) * 100.0
        } else {
            100.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            provider_calls: self.provider_calls(),
            provider_failures: failures,
            rate_limited_calls: self.rate_limited_calls(),
            success_rate,
        }
    }
}

/// Point-in-time snapshot of `TranslationMetrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Percentage (0-100)
    pub cache_hit_rate: f64,
    pub provider_calls: usize,
    pub provider_failures: usize,
    pub rate_limited_calls: usize,
    /// Percentage of provider-bound translations that succeeded (0-100)
    pub success_rate: f64,
}
