use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Delay before the next attempt, given how many attempts already failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// base, 2*base, 4*base, ...
    Exponential { base: Duration },
}

impl Backoff {
    pub fn delay(&self, failed_attempts: u32) -> Duration {
        match *self {
            Backoff::Fixed(d) => d,
            Backoff::Exponential { base } => {
                let shift = failed_attempts.saturating_sub(1).min(16);
                base.saturating_mul(1 << shift)
            }
        }
    }
}

/// Bounded retry: `max_attempts` counts the first try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Fixed(Duration::from_secs(1)),
        }
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Runs `operation` until it succeeds or the policy runs out of attempts,
/// sleeping through `sleeper` between failures.
pub async fn retry_with_policy<F, Fut, T, E>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    operation: F,
) -> std::result::Result<T, RetryExhausted<E>>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: fmt::Display,
{
    retry_when(policy, sleeper, operation, |_| true).await
}

/// Like `retry_with_policy`, but an error for which `is_retryable` is false
/// ends the loop at once.
pub async fn retry_when<F, Fut, T, E, R>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    operation: F,
    is_retryable: R,
) -> std::result::Result<T, RetryExhausted<E>>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: fmt::Display,
    R: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if attempt >= max_attempts || !is_retryable(&e) {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }

                let delay = policy.backoff.delay(attempt);
                log::warn!(
                    "attempt {}/{} failed, retrying in {}ms: {}",
                    attempt,
                    max_attempts,
                    delay.as_millis(),
                    e
                );
                sleeper.sleep(delay).await;
            }
        }
    }
}
