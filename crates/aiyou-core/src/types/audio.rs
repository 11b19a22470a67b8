//! Audio transcription payloads

use serde::{Deserialize, Serialize};

/// Options sent with an upload as the `options` form field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioTranscriptionRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTranscriptionResponse {
    #[serde(default)]
    pub transcription: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: String,
}

impl AudioTranscriptionResponse {
    /// The transcribed text, whichever field the server filled
    pub fn transcript(&self) -> &str {
        if self.text.is_empty() {
            &self.transcription
        } else {
            &self.text
        }
    }
}

/// An accepted upload format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedAudioFormat {
    /// Lowercase extension including the leading dot
    pub extension: String,
    pub mime_types: Vec<String>,
    pub max_size: u64,
}

impl SupportedAudioFormat {
    pub fn new(extension: &str, mime_types: &[&str], max_size: u64) -> Self {
        Self {
            extension: extension.to_string(),
            mime_types: mime_types.iter().map(|m| m.to_string()).collect(),
            max_size,
        }
    }

    pub fn primary_mime(&self) -> &str {
        self.mime_types
            .first()
            .map(String::as_str)
            .unwrap_or("application/octet-stream")
    }
}
