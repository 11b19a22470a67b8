//! aiyou-core: client library for the AI.YOU conversational platform
//!
//! - Email/password or bearer token authentication with expiry renewal
//! - Client-side token bucket rate limiting
//! - Exponential backoff for transient failures
//! - Streaming chat completions over SSE
//! - Assistants, models, threads, conversations and audio transcription

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod mask;
pub mod message;
pub mod rate_limit;
pub mod retry;
pub mod sse;
pub mod types;

pub use auth::{Authenticator, CredentialAuthenticator, TokenAuthenticator};
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use message::MessageBuilder;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{retry_operation, IsRetryable, RetryConfig};
pub use sse::StreamReader;
pub use types::*;

pub use reqwest::Method;
pub use tokio_util::sync::CancellationToken;
