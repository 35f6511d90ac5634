//! Retry policies for the dashboard client.
//!
//! A freshly established session can race its own cookie/token and get a
//! transient `401`. [`retry_unauthorized`] retries exactly that case with a
//! short linear backoff. It is never used between adapters and upstream
//! providers.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base * attempt`.
    Linear,
    /// `base * 2^(attempt - 1)`.
    Exponential,
}

/// Policy for retrying failed requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay unit.
    pub base_delay: Duration,
    /// Growth of the delay.
    pub backoff: Backoff,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a linear policy.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            backoff: Backoff::Linear,
            max_delay: Duration::from_secs(60),
        }
    }

    /// Two retries at 200ms then 400ms, for session-establishment races.
    pub fn auth_race() -> Self {
        Self::new(2, Duration::from_millis(200))
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Sets the backoff.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Calculates the delay after a failed attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = match self.backoff {
            Backoff::Linear => self.base_delay.saturating_mul(attempt),
            Backoff::Exponential => self
                .base_delay
                .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1))),
        };
        delay.min(self.max_delay)
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::auth_race()
    }
}

/// Something that carries an HTTP status.
pub trait StatusCarrier {
    /// The HTTP status code.
    fn status_code(&self) -> u16;
}

impl StatusCarrier for reqwest::Response {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

/// Runs `op`, retrying while it yields a `401` response.
///
/// Any non-401 response and any error are returned immediately. When every
/// attempt yields `401`, the last `401` is returned as-is.
pub async fn retry_unauthorized<R, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<R, E>
where
    R: StatusCarrier,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let mut attempt = 1;
    loop {
        let response = op().await?;
        if response.status_code() != 401 || attempt > policy.max_retries {
            if response.status_code() == 401 {
                warn!(attempts = attempt, "Still unauthorized after retries");
            }
            return Ok(response);
        }

        let delay = policy.delay_for_attempt(attempt);
        debug!(attempt, ?delay, "Unauthorized, retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[derive(Debug)]
    struct Status(u16);

    impl StatusCarrier for Status {
        fn status_code(&self) -> u16 {
            self.0
        }
    }

    #[test]
    fn test_linear_delays() {
        let policy = RetryPolicy::auth_race();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn test_exponential_backoff_cap() {
        let policy =
            RetryPolicy::new(10, Duration::from_secs(10)).with_backoff(Backoff::Exponential);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(40));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_two_unauthorized() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<Status, ()> = retry_unauthorized(&RetryPolicy::auth_race(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Status(if n < 2 { 401 } else { 200 })) }
        })
        .await;

        assert_eq!(result.unwrap().0, 200);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(650), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_unauthorized() {
        let calls = AtomicU32::new(0);

        let result: Result<Status, ()> = retry_unauthorized(&RetryPolicy::auth_race(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Status(401)) }
        })
        .await;

        assert_eq!(result.unwrap().0, 401);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_statuses_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<Status, ()> = retry_unauthorized(&RetryPolicy::auth_race(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Status(503)) }
        })
        .await;

        assert_eq!(result.unwrap().0, 503);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<Status, &str> = retry_unauthorized(&RetryPolicy::auth_race(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("connection refused") }
        })
        .await;

        assert_eq!(result.unwrap_err(), "connection refused");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
