//! Round-trip verification: translate a result back into its source
//! language and check that the original comes back.

use crate::client::TranslateClient;
use crate::orchestrator::same_text;
use crate::types::TranslationResult;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundTripState {
    /// Back-translation in flight, or it could not be obtained
    Pending,
    /// The back-translation matches the original input
    Same,
    /// The back-translation differs from the original input
    Different,
}

impl RoundTripState {
    /// Compare a back-translation with the original input, ignoring case and
    /// surrounding whitespace.
    pub fn classify(back_translation: &str, original: &str) -> Self {
        if same_text(back_translation, original) {
            RoundTripState::Same
        } else {
            RoundTripState::Different
        }
    }
}

/// Outcome of one verification, with the text that came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripCheck {
    pub state: RoundTripState,
    pub back_translation: Option<String>,
}

#[derive(Clone)]
pub struct RoundTripVerifier {
    client: TranslateClient,
}

impl RoundTripVerifier {
    /// Uses the same cache-aware client as the forward translations, so
    /// re-verifying a result is a cache hit.
    pub fn new(client: TranslateClient) -> Self {
        Self { client }
    }

    /// Translate `result` back and classify it. Never fails: a back-translation
    /// error leaves the state `Pending`.
    pub async fn check(&self, result: &TranslationResult) -> RoundTripCheck {
        let pending = RoundTripCheck {
            state: RoundTripState::Pending,
            back_translation: None,
        };

        if result.from.is_auto() {
            debug!("Source language of {:?} unknown, skipping round trip", result.original);
            return pending;
        }

        match self
            .client
            .translate(&result.translated, &result.to, &result.from)
            .await
        {
            Ok(back) => RoundTripCheck {
                state: RoundTripState::classify(&back.translated, &result.original),
                back_translation: Some(back.translated),
            },
            Err(e) => {
                warn!(
                    "Round trip {} -> {} failed, leaving it pending: {}",
                    result.to, result.from, e
                );
                pending
            }
        }
    }

    pub async fn verify(&self, result: &TranslationResult) -> RoundTripState {
        self.check(result).await.state
    }

    /// Verify in the background. The receiver reads `Pending` until the
    /// back-translation resolves.
    pub fn spawn(&self, result: TranslationResult) -> watch::Receiver<RoundTripState> {
        let (tx, rx) = watch::channel(RoundTripState::Pending);
        let verifier = self.clone();

        tokio::spawn(async move {
            let state = verifier.verify(&result).await;
            // Nobody listening any more is fine.
            let _ = tx.send(state);
        });

        rx
    }
}
