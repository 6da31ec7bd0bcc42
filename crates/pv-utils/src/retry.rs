//! Retry with exponential backoff and capped attempts
//!
//! Every transient external call in the workspace goes through this one
//! helper instead of growing its own ad-hoc loop. The policy is parameterized
//! by max attempts and base delay; whether an error is worth retrying is
//! decided by the caller's predicate.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use pv_types::{AppError, AppResult};

/// Bounded exponential backoff: attempt `n` (1-indexed) that fails waits
/// `base_delay * 2^(n-1)` before attempt `n + 1`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after a failed attempt `n` (1-indexed).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Run `op` up to `policy.max_attempts` times, backing off between failures.
///
/// `op` receives the 1-indexed attempt number so callers can scale per-attempt
/// timeouts. The first success returns immediately; a non-retryable error
/// (per `is_retryable`) returns immediately; otherwise the last error is
/// surfaced after the final attempt.
pub async fn retry_with_backoff<T, F, Fut, P>(
    policy: RetryPolicy,
    is_retryable: P,
    mut op: F,
) -> AppResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AppResult<T>>,
    P: Fn(&AppError) -> bool,
{
    debug_assert!(policy.max_attempts >= 1);

    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && is_retryable(&err) => {
                let delay = policy.backoff_delay(attempt);
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, backing off: {}",
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn always_retryable(_: &AppError) -> bool {
        true
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt_makes_one_call() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(RetryPolicy::default(), always_retryable, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42u32) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_call_after_success() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(RetryPolicy::default(), always_retryable, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(AppError::Audit("flaky".into()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_most_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> =
            retry_with_backoff(RetryPolicy::default(), always_retryable, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::Audit("down".into())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_schedule_1s_2s() {
        // Three failing attempts with a 1s base wait 1s then 2s between them.
        let start = Instant::now();
        let result: AppResult<()> =
            retry_with_backoff(RetryPolicy::default(), always_retryable, |_| async {
                Err(AppError::Audit("down".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = retry_with_backoff(
            RetryPolicy::default(),
            |e| e.is_retryable(),
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::Config("missing credential".into())) }
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
    }
}
