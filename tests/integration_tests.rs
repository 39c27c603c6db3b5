//! Integration tests for the multi-target translation engine
//!
//! These tests run the whole pipeline (session, orchestrator, client, cache,
//! retry, HTTP provider) against a mocked translate endpoint.

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use multi_translate::{
    cache::{CacheKey, TranslationCache},
    config::Config,
    diff::DiffRenderer,
    error::DiffRenderError,
    i18n::LanguageCode,
    notify::CollectingNotifier,
    orchestrator::{reconcile, Orchestrator},
    provider::GoogleTranslateProvider,
    roundtrip::RoundTripState,
    session::{SubmitOutcome, TranslationSession},
    types::TranslationResult,
    TranslateClient,
};

// ==================== Test Helpers ====================

const API_PATH: &str = "/translate_a/single";

fn code(c: &str) -> LanguageCode {
    LanguageCode::parse(c).expect("catalog code")
}

/// Config pointing at the mock server, with fast rate-limit backoff
fn create_test_config(server: &MockServer, targets: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("TRANSLATE_API_URL", format!("{}{}", server.uri(), API_PATH)),
        ("TARGET_LANGUAGES", targets.to_string()),
        ("RATE_LIMIT_MAX_ATTEMPTS", "3".to_string()),
        ("RATE_LIMIT_INITIAL_DELAY_MS", "1".to_string()),
        ("RATE_LIMIT_MAX_DELAY_MS", "5".to_string()),
        ("HTTP_TIMEOUT_SECS", "5".to_string()),
    ]);
    Config::from_lookup(|name| vars.get(name).cloned()).expect("valid test config")
}

fn create_session(config: &Config) -> (TranslationSession, Arc<CollectingNotifier>) {
    let provider = Arc::new(GoogleTranslateProvider::from_config(config).expect("provider"));
    let notifier = Arc::new(CollectingNotifier::new());
    let session = TranslationSession::from_config(config, provider.clone(), notifier.clone())
        .with_spellchecker(provider);
    (session, notifier)
}

/// A `gtx` response body: one sentence plus the detected language
fn gtx_body(translated: &str, original: &str, detected: &str) -> serde_json::Value {
    json!([[[translated, original, null, null, 10]], null, detected])
}

async fn mount_translation(
    server: &MockServer,
    text: &str,
    from: &str,
    to: &str,
    translated: &str,
    detected: &str,
) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("dt", "t"))
        .and(query_param("q", text))
        .and(query_param("sl", from))
        .and(query_param("tl", to))
        .respond_with(ResponseTemplate::new(200).set_body_json(gtx_body(translated, text, detected)))
        .mount(server)
        .await;
}

fn targets_of(results: &[TranslationResult]) -> Vec<&str> {
    results.iter().map(|r| r.to.as_str()).collect()
}

// ==================== Pipeline Tests ====================

#[tokio::test]
async fn test_detected_source_is_filtered_out() {
    let server = MockServer::start().await;
    mount_translation(&server, "bonjour le monde", "auto", "en", "hello world", "fr").await;
    mount_translation(&server, "bonjour le monde", "auto", "es", "hola mundo", "fr").await;
    mount_translation(&server, "bonjour le monde", "auto", "fr", "bonjour le monde", "fr").await;

    let config = create_test_config(&server, "en,es,fr");
    let (session, notifier) = create_session(&config);

    let outcome = session.submit("bonjour le monde").await;

    let SubmitOutcome::Applied(batch) = outcome else {
        panic!("expected applied run, got {:?}", outcome);
    };
    assert_eq!(targets_of(&batch.results), vec!["en", "es"]);
    assert!(batch.results.iter().all(|r| r.from == code("fr")));
    assert!(batch.failures.is_empty());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_inline_hint_sets_source_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("sl", "de"))
        .and(query_param("tl", "en"))
        .and(query_param("q", "Gift"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gtx_body("poison", "Gift", "de")))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, "en");
    let (session, _) = create_session(&config);

    session.submit("Gift -> DE").await;

    let current = session.current();
    assert_eq!(current.text, "Gift");
    assert_eq!(current.source, code("de"));
    assert_eq!(current.outcome.results[0].translated, "poison");
}

#[tokio::test]
async fn test_uncertain_detection_keeps_auto() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("tl", "fr"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([
                [["cadeau", "gift", null, null, 3]],
                null,
                "en",
                null,
                null,
                null,
                null,
                null,
                [["de"], null, [0.6], ["de"]]
            ])),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server, "fr");
    let (session, _) = create_session(&config);

    session.submit("gift").await;

    let results = session.current().outcome.results;
    assert_eq!(results.len(), 1);
    assert!(results[0].from.is_auto());
}

#[tokio::test]
async fn test_repeat_input_is_served_from_cache() {
    let server = MockServer::start().await;
    for (to, translated) in [("en", "thank you"), ("it", "grazie")] {
        Mock::given(method("GET"))
            .and(path(API_PATH))
            .and(query_param("tl", to))
            .respond_with(ResponseTemplate::new(200).set_body_json(gtx_body(translated, "danke", "de")))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = create_test_config(&server, "en,it");
    let (session, _) = create_session(&config);

    let first = session.submit("danke").await;
    let second = session.submit("danke").await;

    assert_eq!(first, second);
    let report = session.client().metrics().report();
    assert_eq!(report.cache_hits, 2);
    assert_eq!(report.cache_misses, 2);
}

#[tokio::test]
async fn test_empty_input_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, "en,fr");
    let (session, _) = create_session(&config);

    let outcome = session.submit("").await;

    assert_eq!(outcome, SubmitOutcome::Applied(Default::default()));
    assert!(session.client().cache().is_empty());
}

// ==================== Rate Limiting ====================

#[tokio::test]
async fn test_rate_limit_recovers_after_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_translation(&server, "hello", "auto", "fr", "bonjour", "en").await;

    let config = create_test_config(&server, "fr");
    let (session, notifier) = create_session(&config);

    session.submit("hello").await;

    let current = session.current();
    assert_eq!(current.outcome.results[0].translated, "bonjour");
    assert!(notifier.messages().is_empty());
    let report = session.client().metrics().report();
    assert_eq!(report.rate_limited_calls, 2);
    assert_eq!(report.provider_calls, 3);
}

#[tokio::test]
async fn test_persistent_rate_limit_fails_only_that_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("tl", "ja"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;
    mount_translation(&server, "hello", "auto", "fr", "bonjour", "en").await;

    let config = create_test_config(&server, "fr,ja");
    let (session, notifier) = create_session(&config);

    session.submit("hello").await;

    let outcome = session.current().outcome;
    assert_eq!(targets_of(&outcome.results), vec!["fr"]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].to, code("ja"));
    assert_eq!(notifier.messages().len(), 1);
    assert!(notifier.messages()[0].starts_with("could not translate:"));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, "de");
    let (session, notifier) = create_session(&config);

    session.submit("hello").await;

    assert!(session.current().outcome.results.is_empty());
    assert!(notifier.messages()[0].contains("internal error"));
}

// ==================== Round Trip, Spellcheck, Diff ====================

#[tokio::test]
async fn test_round_trip_over_http() {
    let server = MockServer::start().await;
    mount_translation(&server, "see you later", "auto", "es", "hasta luego", "en").await;
    mount_translation(&server, "hasta luego", "es", "en", "see you soon", "es").await;

    let config = create_test_config(&server, "es");
    let (session, _) = create_session(&config);
    session.submit("see you later").await;
    let result = session.current().outcome.results[0].clone();

    let inspection = session.inspect(&result).await;

    assert_eq!(inspection.round_trip.state, RoundTripState::Different);
    assert_eq!(inspection.round_trip.back_translation.as_deref(), Some("see you soon"));
    let diff = inspection.diff.expect("diff for drifted round trip");
    assert_eq!(diff.plain, "see you [-later-]{+soon+}");
}

#[tokio::test]
async fn test_spellcheck_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("dt", "qc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            null,
            null,
            "en",
            null,
            null,
            null,
            null,
            ["<b><i>hello</i></b> world", ""]
        ])))
        .mount(&server)
        .await;

    let config = create_test_config(&server, "fr");
    let (session, _) = create_session(&config);

    let spelling = session.spellcheck("helo world").await.expect("suggestion");

    assert_eq!(spelling.corrected, "hello world");
    assert_eq!(spelling.diff.expect("diff").plain, "hel{+l+}o world");
}

#[tokio::test]
async fn test_spellcheck_server_failure_is_no_suggestion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(&server, "fr");
    let (session, _) = create_session(&config);

    assert!(session.spellcheck("helo").await.is_none());
}

#[test]
fn test_diff_limit_from_config() {
    let vars: HashMap<&str, String> = HashMap::from([("DIFF_MAX_CHARS", "10".to_string())]);
    let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();
    let renderer = DiffRenderer::new(config.diff_cache_capacity, config.diff_max_chars);

    assert!(renderer.diff("short", "shirt").is_ok());
    assert_eq!(
        renderer.diff("much longer", "text").unwrap_err(),
        DiffRenderError::TooLarge { chars: 15, limit: 10 }
    );
}

// ==================== Building Blocks ====================

#[test]
fn test_cache_evicts_least_recently_used() {
    let cache = TranslationCache::new(2);
    let entry = |text: &str| TranslationResult {
        original: text.to_string(),
        translated: text.to_uppercase(),
        from: code("en"),
        to: code("fr"),
    };
    let key = |text: &str| CacheKey::new(&code("en"), &code("fr"), text);

    cache.set(key("a"), entry("a"));
    cache.set(key("b"), entry("b"));
    cache.get(&key("a"));
    cache.set(key("c"), entry("c"));

    assert!(cache.contains(&key("a")));
    assert!(!cache.contains(&key("b")));
    assert!(cache.contains(&key("c")));
}

#[test]
fn test_reconcile_keeps_ambiguous_batches() {
    let results = vec![
        TranslationResult {
            original: "gift".to_string(),
            translated: "Gift".to_string(),
            from: code("de"),
            to: code("en"),
        },
        TranslationResult {
            original: "gift".to_string(),
            translated: "regalo".to_string(),
            from: code("en"),
            to: code("es"),
        },
    ];

    assert_eq!(reconcile(results.clone()), results);
}

#[tokio::test]
async fn test_orchestrator_with_shared_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("tl", "pt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gtx_body("obrigado", "thanks", "en")))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, "pt");
    let provider = Arc::new(GoogleTranslateProvider::from_config(&config).unwrap());
    let cache = Arc::new(TranslationCache::new(config.cache_capacity));
    let notifier = Arc::new(CollectingNotifier::new());

    // Two orchestrators over one cache share its entries.
    let first = Orchestrator::new(TranslateClient::new(provider.clone(), cache.clone()), notifier.clone());
    let second = Orchestrator::new(TranslateClient::new(provider, cache.clone()), notifier);

    let a = first.translate_all("thanks", &LanguageCode::auto(), &[code("pt")]).await;
    let b = second.translate_all("thanks", &LanguageCode::auto(), &[code("pt")]).await;

    assert_eq!(a, b);
    assert_eq!(cache.len(), 1);
}
