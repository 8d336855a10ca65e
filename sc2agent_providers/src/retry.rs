use rand::Rng;
use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Exponential backoff with additive jitter.
///
/// The delay after attempt `k` (zero-based) is `base * 2^k` plus a uniform
/// offset in `[0, jitter)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub jitter: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        }
    }
}

impl Backoff {
    #[must_use]
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    #[must_use]
    pub fn delay(&self, attempt: usize) -> Duration {
        let factor = u32::try_from(attempt)
            .ok()
            .and_then(|exp| 2u32.checked_pow(exp))
            .unwrap_or(u32::MAX);
        let jitter = if self.jitter.is_zero() {
            Duration::ZERO
        } else {
            rand::thread_rng().gen_range(Duration::ZERO..self.jitter)
        };
        self.base.saturating_mul(factor).saturating_add(jitter)
    }
}

/// How a retried operation ended without producing a value.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The operation failed with an error the caller marked as final.
    Aborted(E),
    /// Every allowed attempt failed; `last` is `None` only when no attempt was allowed.
    Exhausted { attempts: usize, last: Option<E> },
}

/// Retry an async operation with exponential backoff.
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `max_attempts` - Total number of attempts, including the first
/// * `backoff` - Delay schedule between attempts
/// * `should_retry` - Errors for which this returns `false` end the loop immediately
///
/// No delay follows the final attempt.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut operation: F,
    max_attempts: usize,
    backoff: &Backoff,
    should_retry: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut last_error = None;

    for attempt in 0..max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !should_retry(&e) => return Err(RetryError::Aborted(e)),
            Err(e) => {
                if attempt + 1 < max_attempts {
                    let delay = backoff.delay(attempt);
                    warn!(
                        "Request failed (attempt {}/{}): {e}. Retrying after {:.3}s...",
                        attempt + 1,
                        max_attempts,
                        delay.as_secs_f64()
                    );
                    sleep(delay).await;
                } else {
                    warn!(
                        "Request failed (attempt {}/{}): {e}. No attempts left",
                        attempt + 1,
                        max_attempts
                    );
                }
                last_error = Some(e);
            }
        }
    }

    Err(RetryError::Exhausted {
        attempts: max_attempts,
        last: last_error,
    })
}
