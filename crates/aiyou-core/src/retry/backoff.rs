//! Exponential backoff executor

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, ErrorKind, Result};

/// Backoff parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    #[serde(with = "crate::config::duration_millis")]
    pub initial_delay: Duration,
    /// Upper bound on a single backoff sleep
    #[serde(with = "crate::config::duration_millis")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// A config that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

/// Whether an error is worth another attempt
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::RateLimit)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `max_retries` retries have been spent
///
/// The operation is invoked at most `max_retries + 1` times. Backoff sleeps
/// race `cancel`; a cancelled sleep returns [`Error::Cancelled`]. When retries
/// are exhausted the last error is returned unchanged.
pub async fn retry_operation<T, F, Fut>(
    cancel: &CancellationToken,
    config: &RetryConfig,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = config.initial_delay.min(config.max_delay);
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    info!("Operation succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(err) if !err.is_retryable() => {
                debug!("Not retrying {} error: {}", err.kind(), err);
                return Err(err);
            }
            Err(err) if attempt >= config.max_retries => {
                warn!(
                    "Giving up after {} attempts, last error: {}",
                    attempt + 1,
                    err
                );
                return Err(err);
            }
            Err(err) => {
                attempt += 1;
                warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt,
                    config.max_retries + 1,
                    err,
                    delay
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                delay = config.next_delay(delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tokio::time::Instant;

    fn config(max_retries: u32, initial_ms: u64) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_secs(30),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_network_error_makes_n_plus_one_calls() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_operation(&CancellationToken::new(), &config(3, 10), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::network("connection reset")) }
        })
        .await;

        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_returns_after_one_call() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let result: Result<()> = retry_operation(&CancellationToken::new(), &config(5, 100), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::api(400, "bad request")) }
        })
        .await;

        assert_eq!(result.unwrap_err().status(), Some(400));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delays_double_between_attempts() {
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let recorded = stamps.clone();
        let _: Result<()> = retry_operation(&CancellationToken::new(), &config(3, 100), || {
            recorded.lock().push(Instant::now());
            async { Err(Error::server_rate_limit(None)) }
        })
        .await;

        let stamps = stamps.lock();
        assert_eq!(stamps.len(), 4);
        let gaps: Vec<u128> = stamps
            .windows(2)
            .map(|w| (w[1] - w[0]).as_millis())
            .collect();
        assert_eq!(gaps, vec![100, 200, 400]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_clamped_to_max_delay() {
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let recorded = stamps.clone();
        let config = RetryConfig {
            max_retries: 4,
            initial_delay: Duration::from_millis(300),
            max_delay: Duration::from_millis(500),
        };
        let _: Result<()> = retry_operation(&CancellationToken::new(), &config, || {
            recorded.lock().push(Instant::now());
            async { Err(Error::network("timeout")) }
        })
        .await;

        let stamps = stamps.lock();
        let gaps: Vec<u128> = stamps
            .windows(2)
            .map(|w| (w[1] - w[0]).as_millis())
            .collect();
        assert_eq!(gaps, vec![300, 500, 500, 500]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let result = retry_operation(&CancellationToken::new(), &config(3, 10), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(Error::network("flaky"))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_operation(&cancel, &config(3, 1000), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::network("down")) }
        })
        .await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(Error::network("x").is_retryable());
        assert!(Error::client_rate_limit(Duration::from_secs(1)).is_retryable());
        assert!(!Error::authentication("x").is_retryable());
        assert!(!Error::api(500, "x").is_retryable());
        assert!(!Error::Cancelled.is_retryable());
    }

    #[test]
    fn test_config_deserializes_millis() {
        let config: RetryConfig =
            serde_json::from_str(r#"{"max_retries":5,"initial_delay":250}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_delay, Duration::from_millis(250));
        assert_eq!(config.max_delay, Duration::from_secs(30));
    }
}
