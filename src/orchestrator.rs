//! Concurrent fan-out of one input to many target languages.

use crate::client::TranslateClient;
use crate::i18n::LanguageCode;
use crate::notify::NotificationSink;
use crate::types::{BatchOutcome, TargetFailure, TranslationRequest, TranslationResult};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Translates one text into every target language at once.
///
/// A failing target never aborts the batch: successful results are returned
/// alongside the failures, and the batch emits a single notice through the
/// notification sink when anything failed.
#[derive(Clone)]
pub struct Orchestrator {
    client: TranslateClient,
    notifier: Arc<dyn NotificationSink>,
}

impl Orchestrator {
    pub fn new(client: TranslateClient, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { client, notifier }
    }

    pub fn client(&self) -> &TranslateClient {
        &self.client
    }

    pub async fn translate_all(
        &self,
        text: &str,
        from: &LanguageCode,
        targets: &[LanguageCode],
    ) -> BatchOutcome {
        if text.trim().is_empty() {
            return BatchOutcome::default();
        }

        let mut seen = BTreeSet::new();
        let requests: Vec<TranslationRequest> = targets
            .iter()
            .filter(|to| seen.insert(*to))
            .map(|to| TranslationRequest {
                text: text.to_string(),
                from: from.clone(),
                to: to.clone(),
            })
            .collect();

        debug!("Dispatching {} translations from {}", requests.len(), from);
        let settled = join_all(requests.iter().map(|request| async move {
            (&request.to, self.client.translate_request(request).await)
        }))
        .await;

        let mut results = Vec::with_capacity(settled.len());
        let mut failures = Vec::new();
        for (to, outcome) in settled {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => failures.push(TargetFailure {
                    to: to.clone(),
                    message: e.to_string(),
                }),
            }
        }

        if !failures.is_empty() {
            self.notifier.notify(&failure_notice(&failures));
        }

        let received = results.len();
        let results = reconcile(results);
        info!(
            "Translated into {}/{} languages ({} shown, {} failed)",
            received,
            requests.len(),
            results.len(),
            failures.len()
        );

        BatchOutcome { results, failures }
    }
}

/// Drop identity translations when every result agrees on the source language.
///
/// With a single detected source, results into that same language, or whose
/// text only differs from the input by case or surrounding whitespace, carry
/// no information. With disagreeing sources everything is kept so the
/// disagreement stays visible.
pub fn reconcile(results: Vec<TranslationResult>) -> Vec<TranslationResult> {
    let sources: BTreeSet<&LanguageCode> = results.iter().map(|r| &r.from).collect();
    if sources.len() != 1 {
        return results;
    }

    results
        .into_iter()
        .filter(|r| r.to != r.from && !same_text(&r.translated, &r.original))
        .collect()
}

/// Case- and whitespace-insensitive equality used for identity checks.
pub(crate) fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn failure_notice(failures: &[TargetFailure]) -> String {
    match failures {
        [only] => format!("could not translate: {}", only.message),
        [first, ..] => format!(
            "could not translate into {} languages: {}",
            failures.len(),
            first.message
        ),
        [] => String::new(),
    }
}
