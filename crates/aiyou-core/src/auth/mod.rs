//! Authentication for AI.YOU
//!
//! - Email/password login with token expiry and renewal
//! - Pre-issued bearer tokens

mod credentials;
mod token;
pub mod types;

pub use credentials::CredentialAuthenticator;
pub use token::TokenAuthenticator;
pub use types::{LoginResponse, User};

use crate::error::Result;

/// The credential a client authenticates with
#[derive(Debug)]
pub enum Authenticator {
    Credentials(CredentialAuthenticator),
    Token(TokenAuthenticator),
}

impl Authenticator {
    /// Ensure a usable bearer token is available
    ///
    /// No-op while the current token is valid.
    pub async fn authenticate(&self) -> Result<()> {
        match self {
            Authenticator::Credentials(auth) => auth.authenticate().await,
            Authenticator::Token(auth) => auth.authenticate(),
        }
    }

    /// Current bearer token, empty before the first successful login
    pub fn token(&self) -> String {
        match self {
            Authenticator::Credentials(auth) => auth.token(),
            Authenticator::Token(auth) => auth.token(),
        }
    }
}

impl From<CredentialAuthenticator> for Authenticator {
    fn from(auth: CredentialAuthenticator) -> Self {
        Authenticator::Credentials(auth)
    }
}

impl From<TokenAuthenticator> for Authenticator {
    fn from(auth: TokenAuthenticator) -> Self {
        Authenticator::Token(auth)
    }
}
