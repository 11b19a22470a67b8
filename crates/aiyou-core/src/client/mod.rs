//! AI.YOU API client
//!
//! [`Client`] wraps the request pipeline in `core`; the remaining modules add
//! the endpoint methods as `impl Client` blocks.

mod assistants;
mod audio;
mod chat;
mod conversation;
mod core;
mod models;
mod threads;

pub use self::audio::validate_audio_file;
pub use self::core::Client;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use self::core::ClientInner;
use crate::auth::{Authenticator, CredentialAuthenticator, TokenAuthenticator};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::retry::RetryConfig;
use crate::types::SupportedAudioFormat;

enum Credential {
    Login { email: String, password: String },
    Token(String),
}

/// Builder for [`Client`]
///
/// ```no_run
/// # async fn run() -> aiyou_core::Result<()> {
/// use aiyou_core::{ClientBuilder, RateLimiterConfig};
///
/// let client = ClientBuilder::new()
///     .with_credentials("me@example.com", "secret")
///     .rate_limit(RateLimiterConfig::new(2.0, 5))
///     .build()?;
/// let assistants = client.get_user_assistants().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    credential: Option<Credential>,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let credential = match &self.credential {
            Some(Credential::Login { .. }) => "credentials",
            Some(Credential::Token(_)) => "token",
            None => "none",
        };
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("credential", &credential)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete configuration value
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Log in with email and password
    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.credential = Some(Credential::Login {
            email: email.into(),
            password: password.into(),
        });
        self
    }

    /// Use a pre-issued bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::Token(token.into()));
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn rate_limit(mut self, rate_limit: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(rate_limit);
        self
    }

    pub fn audio_formats(mut self, formats: Vec<SupportedAudioFormat>) -> Self {
        self.config.audio_formats = formats;
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> Result<Client> {
        self.config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let auth = match self.credential {
            Some(Credential::Login { email, password }) => Authenticator::Credentials(
                CredentialAuthenticator::new(email, password, self.config.base_url(), http.clone()),
            ),
            Some(Credential::Token(token)) => {
                Authenticator::Token(TokenAuthenticator::new(token))
            }
            None => {
                return Err(Error::Config(
                    "either credentials or a bearer token is required".to_string(),
                ))
            }
        };

        let limiter = self
            .config
            .rate_limit
            .as_ref()
            .map(RateLimiter::new)
            .transpose()?;

        debug!(
            "Client created for {} (rate limit: {:?})",
            self.config.base_url(),
            self.config.rate_limit
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                auth,
                limiter,
                config: self.config,
            }),
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Client {
    /// Client logging in with email and password against the default base URL
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().with_credentials(email, password).build()
    }

    /// Client using a pre-issued bearer token against the default base URL
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().with_token(token).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_credential() {
        let err = ClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_build_rejects_invalid_rate_limit() {
        let err = ClientBuilder::new()
            .with_token("t")
            .rate_limit(RateLimiterConfig::new(0.0, 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_build_applies_settings() {
        let client = ClientBuilder::new()
            .with_credentials("a@b.io", "pw")
            .base_url("http://localhost:9999/")
            .timeout(Duration::from_secs(5))
            .rate_limit(RateLimiterConfig::new(2.0, 3))
            .build()
            .unwrap();

        assert_eq!(client.config().base_url(), "http://localhost:9999");
        assert_eq!(client.config().timeout, Duration::from_secs(5));
        assert!(client.rate_limiter().is_some());
        assert!(matches!(
            client.authenticator(),
            Authenticator::Credentials(_)
        ));
        assert_eq!(client.authenticator().token(), "");
    }

    #[test]
    fn test_with_cancellation_shares_state() {
        let client = Client::with_token("tok").unwrap();
        let token = CancellationToken::new();
        let scoped = client.with_cancellation(token.clone());

        assert!(Arc::ptr_eq(&client.inner, &scoped.inner));
        token.cancel();
        assert!(scoped.cancellation_token().is_cancelled());
        assert!(!client.cancellation_token().is_cancelled());
    }
}
