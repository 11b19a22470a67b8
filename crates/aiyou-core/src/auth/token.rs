//! Pre-issued bearer token

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};

/// Uses a token obtained out of band; never contacts the login endpoint
#[derive(Debug, Default)]
pub struct TokenAuthenticator {
    token: RwLock<String>,
}

impl TokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(token.into()),
        }
    }

    /// Fails only when no token has been supplied
    pub fn authenticate(&self) -> Result<()> {
        if self.token.read().is_empty() {
            return Err(Error::authentication("no bearer token configured"));
        }
        Ok(())
    }

    pub fn token(&self) -> String {
        self.token.read().clone()
    }

    /// Replace the token used by subsequent requests
    pub fn set_token(&self, token: impl Into<String>) {
        debug!("Bearer token replaced");
        *self.token.write() = token.into();
    }
}
