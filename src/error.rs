use thiserror::Error;

/// Failure of a single translate call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// Generic upstream failure: network, malformed response, or any provider
    /// error kind we don't recognize. The provider's message is kept verbatim.
    #[error("{0}")]
    Provider(String),

    /// The provider kept throttling us until the retry budget ran out.
    #[error("rate limited after {attempts} attempts: {message}")]
    RateLimited { attempts: u32, message: String },
}

impl TranslateError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, TranslateError::RateLimited { .. })
    }
}

/// Failure to render one diff artifact. Terminal for that artifact only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffRenderError {
    #[error("diff input too large to render ({chars} chars, limit {limit})")]
    TooLarge { chars: usize, limit: usize },
}
