//! One interactive translation session.
//!
//! A session ties the pieces together for a stream of user inputs: it parses
//! the inline hint, fans the text out through the orchestrator, and keeps the
//! latest batch as its current state. Every run is tagged with a sequence
//! number; a run that finishes after a newer one was issued is discarded
//! instead of overwriting fresher results.

use crate::cache::TranslationCache;
use crate::client::TranslateClient;
use crate::config::Config;
use crate::diff::{DiffArtifact, DiffRenderer};
use crate::hint::parse_language_hint;
use crate::i18n::LanguageCode;
use crate::notify::NotificationSink;
use crate::orchestrator::Orchestrator;
use crate::provider::{Spellchecker, TranslateProvider};
use crate::roundtrip::{RoundTripCheck, RoundTripState, RoundTripVerifier};
use crate::types::{BatchOutcome, TranslationResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// The most recently applied run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Sequence number of the run that produced this state (0 = none yet)
    pub sequence: u64,
    /// Input text after hint removal and trimming
    pub text: String,
    /// Source language the run was issued with
    pub source: LanguageCode,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The run was the latest one and its batch is now the current state
    Applied(BatchOutcome),
    /// A newer run was issued while this one was in flight
    Stale { sequence: u64, latest: u64 },
}

/// A spelling correction and how it differs from the input.
#[derive(Debug, Clone)]
pub struct Spelling {
    pub corrected: String,
    /// `None` when the pair was too large to render
    pub diff: Option<Arc<DiffArtifact>>,
}

/// Round-trip check of one selected result, with a diff when it drifted.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub result: TranslationResult,
    pub round_trip: RoundTripCheck,
    /// Original input against the back-translation
    pub diff: Option<Arc<DiffArtifact>>,
}

pub struct TranslationSession {
    orchestrator: Orchestrator,
    verifier: RoundTripVerifier,
    diffs: DiffRenderer,
    spellchecker: Option<Arc<dyn Spellchecker>>,
    source: LanguageCode,
    targets: Vec<LanguageCode>,
    sequence: AtomicU64,
    current: Mutex<SessionState>,
}

impl TranslationSession {
    pub fn new(
        orchestrator: Orchestrator,
        diffs: DiffRenderer,
        source: LanguageCode,
        targets: Vec<LanguageCode>,
    ) -> Self {
        let verifier = RoundTripVerifier::new(orchestrator.client().clone());
        Self {
            orchestrator,
            verifier,
            diffs,
            spellchecker: None,
            source,
            targets,
            sequence: AtomicU64::new(0),
            current: Mutex::new(SessionState::default()),
        }
    }

    /// Wire up a session from configuration: a fresh translation cache,
    /// the configured retry policy and a diff renderer.
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn TranslateProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let cache = Arc::new(TranslationCache::new(config.cache_capacity));
        let client = TranslateClient::new(provider, cache).with_retry(config.retry_config());
        Self::new(
            Orchestrator::new(client, notifier),
            DiffRenderer::new(config.diff_cache_capacity, config.diff_max_chars),
            config.source_language.clone(),
            config.target_languages.clone(),
        )
    }

    pub fn with_spellchecker(mut self, spellchecker: Arc<dyn Spellchecker>) -> Self {
        self.spellchecker = Some(spellchecker);
        self
    }

    pub fn client(&self) -> &TranslateClient {
        self.orchestrator.client()
    }

    pub fn targets(&self) -> &[LanguageCode] {
        &self.targets
    }

    /// Snapshot of the latest applied run.
    pub fn current(&self) -> SessionState {
        self.lock().clone()
    }

    /// Translate `raw` into every target language.
    ///
    /// An inline hint overrides the configured source language. The batch
    /// only replaces the current state if no newer run was issued meanwhile.
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let parsed = parse_language_hint(raw);
        let text = parsed.text.trim();
        let source = if parsed.hint.is_auto() {
            self.source.clone()
        } else {
            debug!("Input hint sets source language to {}", parsed.hint);
            parsed.hint.clone()
        };

        let outcome = self
            .orchestrator
            .translate_all(text, &source, &self.targets)
            .await;

        let mut current = self.lock();
        let latest = self.sequence.load(Ordering::SeqCst);
        if sequence != latest {
            debug!("Discarding run {} (latest is {})", sequence, latest);
            return SubmitOutcome::Stale { sequence, latest };
        }

        *current = SessionState {
            sequence,
            text: text.to_string(),
            source,
            outcome: outcome.clone(),
        };
        SubmitOutcome::Applied(outcome)
    }

    /// Submit every value from `input` as it arrives.
    ///
    /// Runs overlap when inputs arrive faster than translations finish; the
    /// sequence guard keeps only the newest. The task ends once `input`
    /// closes and all runs have settled.
    pub fn drive(self: Arc<Self>, mut input: mpsc::Receiver<String>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut runs = JoinSet::new();
            while let Some(raw) = input.recv().await {
                let session = Arc::clone(&self);
                runs.spawn(async move {
                    session.submit(&raw).await;
                });
            }
            while runs.join_next().await.is_some() {}
            info!("Input stream closed");
        })
    }

    /// Ask the spellchecker for a correction of `text`.
    ///
    /// Any spellcheck failure is treated as "no suggestion".
    pub async fn spellcheck(&self, text: &str) -> Option<Spelling> {
        let spellchecker = self.spellchecker.as_ref()?;
        if text.trim().is_empty() {
            return None;
        }

        let corrected = match spellchecker.spellcheck(text).await {
            Ok(Some(corrected)) => corrected,
            Ok(None) => return None,
            Err(e) => {
                debug!("Spellcheck failed, no suggestion: {}", e);
                return None;
            }
        };

        let diff = self.render_diff(text, &corrected);
        Some(Spelling { corrected, diff })
    }

    /// Verify a selected result by translating it back.
    pub async fn inspect(&self, result: &TranslationResult) -> Inspection {
        let round_trip = self.verifier.check(result).await;
        let diff = match (&round_trip.state, &round_trip.back_translation) {
            (RoundTripState::Different, Some(back)) => self.render_diff(&result.original, back),
            _ => None,
        };

        Inspection {
            result: result.clone(),
            round_trip,
            diff,
        }
    }

    fn render_diff(&self, from: &str, to: &str) -> Option<Arc<DiffArtifact>> {
        match self.diffs.diff(from, to) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!("Diff not rendered: {}", e);
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
