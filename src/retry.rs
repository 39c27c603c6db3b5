use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Exponential backoff settings for provider throttling.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first call included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Growth factor applied per retry
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset for rate-limited translate calls.
    /// Delays: 500ms, 1s, 2s, 4s (5 attempts, capped at 8s)
    pub fn rate_limit() -> Self {
        Self::new(5, Duration::from_millis(500)).with_max_delay(Duration::from_secs(8))
    }

    /// Delay to wait before retry number `retry` (0 = first retry).
    fn backoff_delay(&self, retry: u32) -> Duration {
        let scaled_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(retry.min(i32::MAX as u32) as i32);
        let capped_ms = scaled_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_ms as u64)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::rate_limit()
    }
}

/// The error that ended a retry loop, with how many attempts were spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhausted<E> {
    pub error: E,
    pub attempts: u32,
}

/// Run `operation`, retrying with backoff while `should_retry` accepts the error.
///
/// Errors rejected by `should_retry` are returned straight away. A config
/// with `max_attempts == 0` still makes one attempt.
pub async fn retry_when<T, E, F, Fut, P>(
    config: &RetryConfig,
    label: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{}: succeeded on attempt {}/{}", label, attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !should_retry(&error) {
            debug!("{}: not retryable, giving up: {}", label, error);
            return Err(Exhausted {
                error,
                attempts: attempt,
            });
        }

        if attempt >= max_attempts {
            warn!(
                "{}: giving up after {} attempts. Last error: {}",
                label, attempt, error
            );
            return Err(Exhausted {
                error,
                attempts: attempt,
            });
        }

        let delay = config.backoff_delay(attempt - 1);
        warn!(
            "{}: attempt {}/{} failed ({}), backing off {:?}",
            label, attempt, max_attempts, error, delay
        );
        sleep(delay).await;
        attempt += 1;
    }
}
