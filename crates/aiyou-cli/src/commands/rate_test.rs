//! `aiyou rate-test`
//!
//! Fires a batch of concurrent requests through one client to observe the
//! client-side rate limiter.

use std::time::{Duration, Instant};

use aiyou_core::{Client, ClientBuilder, ErrorKind, RateLimiterConfig, RetryConfig};
use anyhow::Result;
use clap::Args;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct RateTestArgs {
    /// Total requests to send
    #[arg(long, default_value_t = 10)]
    pub requests: usize,

    /// Requests per second
    #[arg(long, default_value_t = 2.0)]
    pub rate: f64,

    /// Bucket capacity
    #[arg(long, default_value_t = 3)]
    pub burst: u32,

    /// Requests in flight at once
    #[arg(long, default_value_t = 5)]
    pub concurrency: usize,

    /// Fail requests that would wait longer than this many milliseconds
    #[arg(long)]
    pub wait_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, PartialEq)]
struct Tally {
    succeeded: usize,
    rate_limited: usize,
    failed: usize,
}

impl Tally {
    fn record(&mut self, outcome: Result<(), ErrorKind>) {
        match outcome {
            Ok(()) => self.succeeded += 1,
            Err(ErrorKind::RateLimit) => self.rate_limited += 1,
            Err(_) => self.failed += 1,
        }
    }
}

pub async fn run(builder: ClientBuilder, args: RateTestArgs) -> Result<()> {
    let client: Client = builder
        .rate_limit(RateLimiterConfig {
            requests_per_second: args.rate,
            burst_size: args.burst,
            wait_timeout: args.wait_timeout_ms.map(Duration::from_millis),
        })
        .retry(RetryConfig::no_retry())
        .build()?;

    info!(
        "Sending {} requests at {} req/s (burst {}, concurrency {})",
        args.requests, args.rate, args.burst, args.concurrency
    );
    let start = Instant::now();

    let outcomes: Vec<_> = stream::iter(0..args.requests)
        .map(|i| {
            let client = client.clone();
            async move {
                let sent = Instant::now();
                let outcome = client.get_models().await.map(|_| ()).map_err(|e| {
                    debug!("Request {} failed: {}", i, e);
                    e.kind()
                });
                println!(
                    "request {:>3}: {:<12} after {:>6} ms",
                    i,
                    match &outcome {
                        Ok(()) => "ok".to_string(),
                        Err(kind) => kind.to_string(),
                    },
                    sent.elapsed().as_millis()
                );
                outcome
            }
        })
        .buffer_unordered(args.concurrency.max(1))
        .collect()
        .await;

    let mut tally = Tally::default();
    for outcome in outcomes {
        tally.record(outcome);
    }

    println!(
        "{} succeeded, {} rate limited, {} failed in {:.2}s",
        tally.succeeded,
        tally.rate_limited,
        tally.failed,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_by_kind() {
        let mut tally = Tally::default();
        tally.record(Ok(()));
        tally.record(Ok(()));
        tally.record(Err(ErrorKind::RateLimit));
        tally.record(Err(ErrorKind::Network));
        tally.record(Err(ErrorKind::Api));
        assert_eq!(
            tally,
            Tally {
                succeeded: 2,
                rate_limited: 1,
                failed: 2
            }
        );
    }
}
