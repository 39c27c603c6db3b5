//! Multi-target translation engine.
//!
//! One input text is translated into several target languages at once
//! through a cache-aware, rate-limit-tolerant client. Results can be checked
//! by translating them back, and differences are rendered as character diffs.

pub mod cache;
pub mod client;
pub mod config;
pub mod debounce;
pub mod diff;
pub mod error;
pub mod hint;
pub mod i18n;
pub mod metrics;
pub mod notify;
pub mod orchestrator;
pub mod provider;
pub mod retry;
pub mod roundtrip;
pub mod session;
pub mod types;

pub use client::TranslateClient;
pub use config::Config;
pub use error::{DiffRenderError, TranslateError};
pub use i18n::LanguageCode;
pub use orchestrator::Orchestrator;
pub use session::TranslationSession;
pub use types::{BatchOutcome, TranslationResult};
