//! Email/password login with cached, expiring bearer tokens

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::types::{LoginRequest, LoginResponse};
use crate::error::{Error, Result};
use crate::mask::mask_sensitive;

#[derive(Debug, Clone, Default)]
struct Session {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    fn is_valid(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => !self.token.is_empty() && Utc::now() < expires_at,
            None => false,
        }
    }
}

/// Logs in at `{base}/api/login` and reuses the token until it expires
pub struct CredentialAuthenticator {
    email: String,
    password: String,
    login_url: String,
    http: reqwest::Client,
    session: Mutex<Session>,
    /// Serializes logins so concurrent callers share one round trip. Held
    /// across the login request, so a stalled login blocks other callers
    /// until the HTTP timeout fires.
    login_gate: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for CredentialAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialAuthenticator")
            .field("email", &mask_sensitive(&self.email))
            .field("login_url", &self.login_url)
            .field("expires_at", &self.session.lock().expires_at)
            .finish_non_exhaustive()
    }
}

impl CredentialAuthenticator {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        base_url: &str,
        http: reqwest::Client,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            login_url: format!("{}/api/login", base_url.trim_end_matches('/')),
            http,
            session: Mutex::new(Session::default()),
            login_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Seed a previously obtained token, used until `expires_at`
    pub fn with_session(self, token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        *self.session.lock() = Session {
            token: token.into(),
            expires_at: Some(expires_at),
        };
        self
    }

    /// Log in unless the cached token is still valid
    ///
    /// A failed login leaves the previous token and expiry in place.
    pub async fn authenticate(&self) -> Result<()> {
        if self.session.lock().is_valid() {
            return Ok(());
        }

        let _gate = self.login_gate.lock().await;
        // Another caller may have logged in while we waited
        if self.session.lock().is_valid() {
            return Ok(());
        }

        let login = self.login().await?;
        info!("Authenticated, token valid until {}", login.expires_at);
        *self.session.lock() = Session {
            token: login.token,
            expires_at: Some(login.expires_at),
        };
        Ok(())
    }

    pub fn token(&self) -> String {
        self.session.lock().token.clone()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.session.lock().expires_at
    }

    async fn login(&self) -> Result<LoginResponse> {
        debug!("Logging in as {}", mask_sensitive(&self.email));

        let response = self
            .http
            .post(&self.login_url)
            .json(&LoginRequest {
                email: &self.email,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| {
                warn!("Login request failed: {}", e);
                Error::network(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("Login rejected with status {}", status.as_u16());
            return Err(Error::authentication(format!(
                "login failed with status code {}: {}",
                status.as_u16(),
                mask_sensitive(body.trim())
            )));
        }

        let body = response.bytes().await.map_err(Error::network)?;
        let login: LoginResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::authentication(format!("failed to decode login response: {e}")))?;
        if login.token.is_empty() {
            return Err(Error::authentication("login response carried an empty token"));
        }
        Ok(login)
    }
}
