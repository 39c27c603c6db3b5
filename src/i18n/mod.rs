//! Language catalog.
//!
//! - `registry`: the closed list of supported languages and their names
//! - `language`: the `LanguageCode` type, including the `auto` sentinel
//!
//! # Example
//!
//! ```rust,ignore
//! use multi_translate::i18n::{LanguageCode, LanguageRegistry};
//!
//! let french = LanguageCode::parse("fr")?;
//! let name = LanguageRegistry::get().display_name(french.as_str());
//! ```

mod language;
mod registry;

pub use language::LanguageCode;
pub use registry::{LanguageConfig, LanguageRegistry};
