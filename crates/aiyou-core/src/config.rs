//! Client configuration
//!
//! A plain value passed to the client at construction. Nothing here is
//! process-global; two clients in one process can be configured independently.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rate_limit::RateLimiterConfig;
use crate::retry::RetryConfig;
use crate::types::SupportedAudioFormat;

pub const DEFAULT_BASE_URL: &str = "https://ai.dragonflygroup.fr";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_AUDIO_SIZE: u64 = 25 * 1024 * 1024;

/// Default accepted audio uploads
pub fn default_audio_formats() -> Vec<SupportedAudioFormat> {
    vec![
        SupportedAudioFormat::new(".mp3", &["audio/mpeg"], MAX_AUDIO_SIZE),
        SupportedAudioFormat::new(".wav", &["audio/wav", "audio/x-wav"], MAX_AUDIO_SIZE),
        SupportedAudioFormat::new(".m4a", &["audio/mp4", "audio/x-m4a"], MAX_AUDIO_SIZE),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Overall per-request HTTP timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    pub retry: RetryConfig,
    /// No limiter is installed when absent
    pub rate_limit: Option<RateLimiterConfig>,
    pub audio_formats: Vec<SupportedAudioFormat>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            rate_limit: None,
            audio_formats: default_audio_formats(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base_url '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if let Some(limit) = &self.rate_limit {
            limit.validate()?;
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// (De)serialize a `Duration` as whole seconds
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

/// (De)serialize a `Duration` as milliseconds
pub(crate) mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

/// Optional `Duration` as milliseconds
pub(crate) mod option_duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
