//! Bounded memoization of translate calls.
//!
//! Keys are the exact `(from, to, text)` triple with no normalization, so
//! `"hello"` and `"hello "` are different entries. The cache is shared
//! between concurrent fan-out calls; access goes through a mutex that is
//! never held across an `.await`.

use crate::i18n::LanguageCode;
use crate::types::TranslationResult;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub text: String,
}

impl CacheKey {
    pub fn new(from: &LanguageCode, to: &LanguageCode, text: &str) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            text: text.to_string(),
        }
    }
}

/// Least-recently-used store of translation results.
pub struct TranslationCache {
    entries: Mutex<LruCache<CacheKey, TranslationResult>>,
}

impl TranslationCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a key, marking it as most recently used on a hit.
    pub fn get(&self, key: &CacheKey) -> Option<TranslationResult> {
        self.lock().get(key).cloned()
    }

    /// Insert or overwrite an entry, evicting the least recently used one when full.
    pub fn set(&self, key: CacheKey, value: TranslationResult) {
        if let Some((evicted, _)) = self.lock().push(key.clone(), value) {
            if evicted != key {
                debug!(
                    "Translation cache full, evicted {} -> {} ({} chars)",
                    evicted.from,
                    evicted.to,
                    evicted.text.chars().count()
                );
            }
        }
    }

    /// Whether a key is present, without touching its recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, TranslationResult>> {
        // Entries are immutable values, so a panic elsewhere cannot leave one half-written.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
