//! Client-side token bucket rate limiting
//!
//! Capacity is the configured burst size and tokens accrue at the configured
//! requests-per-second. Refill is lazy: it happens on every `wait` and
//! `wait_time` call from the elapsed time since the previous refill.
//!
//! Callers are admitted first-come-first-served. A waiting caller holds the
//! admission gate while it sleeps, the bucket itself is only locked for the
//! refill/consume step.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};

/// Refill arithmetic leaves tokens a hair below 1.0 after sleeping exactly the
/// computed wait; treat that as a full token.
const TOKEN_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    pub requests_per_second: f64,
    pub burst_size: u32,
    /// Give up immediately when the required wait is longer than this
    #[serde(default, with = "crate::config::option_duration_millis")]
    pub wait_timeout: Option<Duration>,
}

impl RateLimiterConfig {
    pub fn new(requests_per_second: f64, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
            wait_timeout: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.requests_per_second.is_finite() || self.requests_per_second <= 0.0 {
            return Err(Error::Config(format!(
                "requests_per_second must be positive, got {}",
                self.requests_per_second
            )));
        }
        if self.burst_size == 0 {
            return Err(Error::Config("burst_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }

    fn pending_wait(&self) -> Duration {
        if self.tokens + TOKEN_EPSILON >= 1.0 {
            return Duration::ZERO;
        }
        // Rates this slow overflow a Duration; treat as never
        Duration::try_from_secs_f64((1.0 - self.tokens) / self.refill_rate)
            .unwrap_or(Duration::MAX)
    }

    /// Consume a token, or report how long until one accrues
    fn try_acquire(&mut self) -> std::result::Result<(), Duration> {
        self.refill();
        if self.tokens + TOKEN_EPSILON >= 1.0 {
            self.tokens = (self.tokens - 1.0).max(0.0);
            Ok(())
        } else {
            Err(self.pending_wait())
        }
    }
}

/// Token bucket gating outbound requests
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    admission: tokio::sync::Mutex<()>,
    wait_timeout: Option<Duration>,
}

impl RateLimiter {
    /// Create a limiter with a full bucket
    pub fn new(config: &RateLimiterConfig) -> Result<Self> {
        config.validate()?;
        let capacity = f64::from(config.burst_size);
        Ok(Self {
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                capacity,
                refill_rate: config.requests_per_second,
                last_refill: Instant::now(),
            }),
            admission: tokio::sync::Mutex::new(()),
            wait_timeout: config.wait_timeout,
        })
    }

    /// Wait for a token and consume it
    ///
    /// Returns [`Error::Cancelled`] if `cancel` fires first, or a client-side
    /// [`Error::RateLimit`] if the wait would exceed the configured timeout.
    pub async fn wait(&self, cancel: &CancellationToken) -> Result<()> {
        let _turn = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            guard = self.admission.lock() => guard,
        };

        loop {
            let wait = match self.bucket.lock().try_acquire() {
                Ok(()) => return Ok(()),
                Err(wait) => wait,
            };

            if let Some(limit) = self.wait_timeout {
                if wait > limit {
                    debug!(
                        "Rate limiter: wait of {:?} exceeds timeout {:?}",
                        wait, limit
                    );
                    return Err(Error::client_rate_limit(wait));
                }
            }

            debug!("Rate limiter: waiting {:?} for a token", wait);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Time until the next token is available, without consuming one
    pub fn wait_time(&self) -> Duration {
        let mut bucket = self.bucket.lock();
        bucket.refill();
        bucket.pending_wait()
    }

    /// Tokens currently in the bucket, after refill
    pub fn available_tokens(&self) -> f64 {
        let mut bucket = self.bucket.lock();
        bucket.refill();
        bucket.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.bucket.lock().capacity
    }
}
