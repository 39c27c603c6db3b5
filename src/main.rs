use anyhow::{Context, Result};
use futures::future::join_all;
use multi_translate::config::Config;
use multi_translate::debounce::debounce;
use multi_translate::notify::TracingNotifier;
use multi_translate::provider::GoogleTranslateProvider;
use multi_translate::roundtrip::RoundTripState;
use multi_translate::session::{Inspection, Spelling, TranslationSession};
use multi_translate::types::{TargetFailure, TranslationResult};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

const USAGE: &str = "usage: multi-translate [--json] [--watch] [TEXT...]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    json: bool,
    watch: bool,
    help: bool,
    text: Vec<String>,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    for arg in argv {
        match arg.as_str() {
            "--json" => args.json = true,
            "--watch" => args.watch = true,
            "-h" | "--help" => args.help = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown flag {}\n{}", flag, USAGE),
            _ => args.text.push(arg),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file when present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multi_translate=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }
    let config = Config::from_env()?;

    let provider = Arc::new(GoogleTranslateProvider::from_config(&config)?);
    let session = Arc::new(
        TranslationSession::from_config(&config, provider.clone(), Arc::new(TracingNotifier))
            .with_spellchecker(provider),
    );

    if args.watch {
        info!("Watching stdin, debounce {:?}", config.debounce());
        let (tx, rx) = mpsc::channel(64);
        let runs = Arc::clone(&session).drive(debounce(rx, config.debounce()));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
            if tx.send(line).await.is_err() {
                break;
            }
        }
        drop(tx);
        runs.await.context("Input task panicked")?;
    } else {
        let input = if args.text.is_empty() {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        } else {
            args.text.join(" ")
        };

        info!(
            "Translating into {}",
            session
                .targets()
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        session.submit(input.trim_end()).await;
    }

    print_current(&session, args.json).await?;

    let report = session.client().metrics().report();
    info!("Run metrics: {}", serde_json::to_string(&report)?);
    Ok(())
}

#[derive(Serialize)]
struct ResultRow<'a> {
    #[serde(flatten)]
    result: &'a TranslationResult,
    round_trip: RoundTripState,
    back_translation: Option<&'a str>,
    diff: Option<&'a str>,
}

#[derive(Serialize)]
struct Report<'a> {
    text: &'a str,
    results: Vec<ResultRow<'a>>,
    failures: &'a [TargetFailure],
    suggestion: Option<&'a str>,
}

async fn print_current(session: &TranslationSession, json: bool) -> Result<()> {
    let state = session.current();
    if state.outcome.is_empty() {
        info!("Nothing to translate");
        return Ok(());
    }

    let inspections: Vec<Inspection> =
        join_all(state.outcome.results.iter().map(|r| session.inspect(r))).await;
    let spelling = session.spellcheck(&state.text).await;

    if json {
        let report = Report {
            text: &state.text,
            results: inspections
                .iter()
                .map(|i| ResultRow {
                    result: &i.result,
                    round_trip: i.round_trip.state,
                    back_translation: i.round_trip.back_translation.as_deref(),
                    diff: i.diff.as_ref().map(|d| d.plain.as_str()),
                })
                .collect(),
            failures: &state.outcome.failures,
            suggestion: spelling.as_ref().map(|s| s.corrected.as_str()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(Spelling { corrected, diff }) = &spelling {
        match diff {
            Some(diff) => println!("Did you mean: {}  ({})", corrected, diff.plain),
            None => println!("Did you mean: {}", corrected),
        }
    }

    for inspection in &inspections {
        let result = &inspection.result;
        let state = match inspection.round_trip.state {
            RoundTripState::Same => "round trip ok",
            RoundTripState::Different => "round trip differs",
            RoundTripState::Pending => "round trip unavailable",
        };
        println!(
            "[{} -> {}] {}  ({})",
            result.from, result.to, result.translated, state
        );
        if let Some(diff) = &inspection.diff {
            println!("    back: {}", diff.plain);
        }
    }

    for failure in &state.outcome.failures {
        println!("[{}] failed: {}", failure.to, failure.message);
    }

    Ok(())
}
