//! Retry logic
//!
//! Exponential backoff around a fallible async operation. Only transient
//! failures (network and rate limit) are retried; everything else surfaces on
//! the first attempt.

mod backoff;

pub use backoff::{retry_operation, IsRetryable, RetryConfig};
