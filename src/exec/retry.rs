//! Retry with exponential back-off
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | `Ok` result with `success = true` | Return immediately |
//! | `Ok` result with `success = false` | Retry, message from `error_message` |
//! | `Err(e)` | Retry, message from `e.to_string()` |
//! | Budget exhausted | Return `Exhausted` with attempt count and last message |
//! | Deadline reached | Return `DeadlineExceeded` |
//!
//! The delay before retry `n` (0-based) is `min(base * 2^n, max_delay) + U(0, jitter)`.

use crate::config::RetryConfig;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Result of a single fetch attempt as reported by a fetch engine
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<T> {
    pub success: bool,
    pub error_message: Option<String>,
    pub payload: Option<T>,
}

impl<T> FetchResult<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            error_message: None,
            payload: Some(payload),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            payload: None,
        }
    }
}

/// Retry budget and back-off timing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Upper bound of the uniform jitter added to each delay
    pub jitter: Duration,
    /// Cap on the exponential part of a delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            jitter: Duration::from_millis(config.jitter_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Total number of attempts, first try included
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Computes the sleep before retry number `attempt` (0-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let exponential = self.base_delay.saturating_mul(factor).min(self.max_delay);

        if self.jitter.is_zero() {
            return exponential;
        }

        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms));
        exponential + jitter
    }
}

/// Final result of [`execute_with_retry`]
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T> {
    /// An attempt succeeded; no further attempts were made
    Success { result: FetchResult<T>, attempts: u32 },

    /// Every attempt failed
    Exhausted { attempts: u32, last_error: String },

    /// The caller's deadline passed before an attempt succeeded
    DeadlineExceeded {
        attempts: u32,
        last_error: Option<String>,
    },
}

impl<T> RetryOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Number of times the operation was invoked
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::DeadlineExceeded { attempts, .. } => *attempts,
        }
    }

    /// The payload of a successful attempt
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success { result, .. } => result.payload.as_ref(),
            _ => None,
        }
    }

    /// Human-readable failure description, `None` on success
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Exhausted {
                attempts,
                last_error,
            } => Some(format!(
                "Failed after {} attempts. Last error: {}",
                attempts, last_error
            )),
            Self::DeadlineExceeded {
                attempts,
                last_error,
            } => Some(format!(
                "Deadline exceeded after {} attempts. Last error: {}",
                attempts,
                last_error.as_deref().unwrap_or("none")
            )),
        }
    }

    /// Flattens the outcome into a plain fetch result
    ///
    /// Failures become a synthesized `success = false` result carrying
    /// [`failure_message`](Self::failure_message).
    pub fn into_fetch_result(self) -> FetchResult<T> {
        match self {
            Self::Success { result, .. } => result,
            other => FetchResult::failed(other.failure_message().unwrap_or_default()),
        }
    }
}

/// Runs `op` until it succeeds or the retry budget is spent
///
/// `op` is invoked at most `policy.max_retries + 1` times, strictly one after
/// another. Both `Err` returns and `Ok` results with `success = false` count
/// as failures. This function never fails itself: every failure class ends
/// up in the returned [`RetryOutcome`].
///
/// With a `deadline`, an attempt still running at the deadline is abandoned
/// and no back-off sleep is started that would end past it.
///
/// # Example
///
/// ```
/// use hound_relay::exec::{execute_with_retry, FetchResult, RetryPolicy};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy = RetryPolicy::new(2, Duration::from_millis(1)).with_jitter(Duration::ZERO);
/// let outcome = execute_with_retry(&policy, None, || async {
///     Err::<FetchResult<()>, _>("connection reset")
/// })
/// .await;
///
/// assert_eq!(outcome.attempts(), 3);
/// assert!(outcome.failure_message().unwrap().contains("connection reset"));
/// # }
/// ```
pub async fn execute_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    deadline: Option<Instant>,
    mut op: F,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<FetchResult<T>, E>>,
    E: Display,
{
    let mut last_error: Option<String> = None;

    for attempt in 0..policy.total_attempts() {
        let attempts = attempt + 1;

        let result = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, op()).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("Attempt {} abandoned at deadline", attempts);
                    return RetryOutcome::DeadlineExceeded {
                        attempts,
                        last_error: Some("attempt timed out at deadline".to_string()),
                    };
                }
            },
            None => op().await,
        };

        match result {
            Ok(result) if result.success => {
                tracing::debug!("Attempt {} succeeded", attempts);
                return RetryOutcome::Success { result, attempts };
            }
            Ok(result) => {
                last_error = Some(
                    result
                        .error_message
                        .unwrap_or_else(|| "unknown error".to_string()),
                );
            }
            Err(e) => {
                last_error = Some(e.to_string());
            }
        }

        if attempt < policy.max_retries {
            let delay = policy.backoff_delay(attempt);

            if let Some(deadline) = deadline {
                if Instant::now() + delay >= deadline {
                    tracing::warn!(
                        "Skipping retry after attempt {}: back-off of {:?} passes the deadline",
                        attempts,
                        delay
                    );
                    return RetryOutcome::DeadlineExceeded {
                        attempts,
                        last_error,
                    };
                }
            }

            tracing::warn!(
                "Attempt {}/{} failed ({}), retrying in {:?}",
                attempts,
                policy.total_attempts(),
                last_error.as_deref().unwrap_or("unknown error"),
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    RetryOutcome::Exhausted {
        attempts: policy.total_attempts(),
        last_error: last_error.unwrap_or_else(|| "unknown error".to_string()),
    }
}
