//! Language codes as they flow through the engine.
//!
//! A `LanguageCode` is either a catalog code, the `auto` sentinel, or a code
//! reported back by the provider (which may fall outside the catalog).

use crate::i18n::LanguageRegistry;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const AUTO: &str = "auto";

/// A language identifier, or `auto` for "detect from provider response".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// The detection sentinel.
    pub fn auto() -> Self {
        LanguageCode(AUTO.to_string())
    }

    /// Parse a user-supplied code against the catalog.
    ///
    /// Matching is case-insensitive and the catalog spelling is kept, so
    /// `"ZH-cn"` becomes `"zh-CN"`. `"auto"` is accepted in any case.
    ///
    /// # Example
    /// ```ignore
    /// let french = LanguageCode::parse("FR")?;
    /// assert_eq!(french.as_str(), "fr");
    /// ```
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.eq_ignore_ascii_case(AUTO) {
            return Ok(Self::auto());
        }

        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(LanguageCode(config.code.to_string())),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Wrap a code reported by the provider without catalog validation.
    pub fn from_provider(code: impl Into<String>) -> Self {
        LanguageCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == AUTO
    }

    /// English display name, when the code is in the catalog.
    pub fn name(&self) -> Option<&'static str> {
        LanguageRegistry::get().display_name(&self.0)
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::auto()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
