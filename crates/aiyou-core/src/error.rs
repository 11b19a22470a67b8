//! Error taxonomy for the AI.YOU client
//!
//! Every error carries a kind tag (see [`ErrorKind`]) that the retry executor
//! uses to decide between retrying and surfacing the failure.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed transport-level cause of a [`Error::Network`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Server-side 429 responses without a `Retry-After` header use this value
pub const DEFAULT_SERVER_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    RateLimit,
    Authentication,
    Api,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::RateLimit => write!(f, "rate limit"),
            ErrorKind::Authentication => write!(f, "authentication"),
            ErrorKind::Api => write!(f, "api"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

fn rate_limit_origin(client_side: &bool) -> &'static str {
    if *client_side {
        "client"
    } else {
        "server"
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Bad, missing or rejected credential
    #[error("authentication error: {message}")]
    Authentication { message: String },

    /// Transport failure (connect, TLS, timeout, broken body)
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// Client- or server-side throttling
    #[error(
        "{}-side rate limit exceeded, retry after {} seconds",
        rate_limit_origin(.client_side),
        .retry_after.as_secs()
    )]
    RateLimit {
        retry_after: Duration,
        client_side: bool,
    },

    /// Non-success application response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    pub fn network(source: impl Into<BoxError>) -> Self {
        Error::Network(source.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    pub fn client_rate_limit(retry_after: Duration) -> Self {
        Error::RateLimit {
            retry_after,
            client_side: true,
        }
    }

    pub fn server_rate_limit(retry_after: Option<Duration>) -> Self {
        Error::RateLimit {
            retry_after: retry_after.unwrap_or(DEFAULT_SERVER_RETRY_AFTER),
            client_side: false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Api { .. } => ErrorKind::Api,
            Error::Decode(_)
            | Error::Io(_)
            | Error::InvalidInput(_)
            | Error::NotFound(_)
            | Error::Cancelled
            | Error::Config(_) => ErrorKind::Other,
        }
    }

    /// Suggested wait before resubmitting, for rate-limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Transport errors from reqwest. Body decode failures are not transport
/// failures and are reported as decode errors instead.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err));
        }
        Error::Network(Box::new(err))
    }
}
