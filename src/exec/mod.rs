//! Resilient execution: retry with back-off and bounded concurrency
//!
//! Callers wrap each fetch in [`execute_with_retry`] and hand the wrapped
//! futures to [`ConcurrencyLimiter::run_bounded`]; the limiter itself never
//! retries.

mod limiter;
mod retry;

pub use limiter::{ConcurrencyLimiter, TaskFailure};
pub use retry::{execute_with_retry, FetchResult, RetryOutcome, RetryPolicy};

use crate::config::ConcurrencyConfig;

impl From<&ConcurrencyConfig> for ConcurrencyLimiter {
    fn from(config: &ConcurrencyConfig) -> Self {
        ConcurrencyLimiter::new(config.max_concurrent as usize)
    }
}
