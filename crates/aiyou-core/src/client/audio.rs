//! Audio transcription

use std::path::Path;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};

use super::core::{decode_json, expect_status, Client, MultipartUpload, RequestBody};
use crate::error::{Error, Result};
use crate::types::{AudioTranscriptionRequest, AudioTranscriptionResponse, SupportedAudioFormat};

const TRANSCRIPTIONS_PATH: &str = "/api/v1/audio/transcriptions";

/// Check a file against the accepted formats by extension and size
///
/// Returns the matching format.
pub async fn validate_audio_file<'a>(
    path: &Path,
    formats: &'a [SupportedAudioFormat],
) -> Result<&'a SupportedAudioFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    let format = formats
        .iter()
        .find(|format| format.extension.eq_ignore_ascii_case(&extension))
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "unsupported audio format: {}",
                if extension.is_empty() { "<none>" } else { extension.as_str() }
            ))
        })?;

    let size = tokio::fs::metadata(path).await?.len();
    if size > format.max_size {
        return Err(Error::InvalidInput(format!(
            "file size {} exceeds maximum allowed size of {} bytes",
            size, format.max_size
        )));
    }
    Ok(format)
}

impl Client {
    /// Upload an audio file for transcription
    pub async fn transcribe_audio_file(
        &self,
        path: impl AsRef<Path>,
        options: Option<&AudioTranscriptionRequest>,
    ) -> Result<AudioTranscriptionResponse> {
        let path = path.as_ref();
        debug!("Starting audio transcription for {}", path.display());

        let format = validate_audio_file(path, &self.inner.config.audio_formats)
            .await
            .inspect_err(|e| warn!("Invalid audio file {}: {}", path.display(), e))?;

        let data = Bytes::from(tokio::fs::read(path).await?);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("audio{}", format.extension));

        let mut fields = Vec::new();
        if let Some(options) = options {
            fields.push(("options", serde_json::to_string(options)?));
        }

        let upload = MultipartUpload {
            file_name,
            mime: format.primary_mime().to_string(),
            data,
            fields,
        };
        let response = self
            .send(
                Method::POST,
                TRANSCRIPTIONS_PATH,
                RequestBody::Multipart(upload),
            )
            .await?;
        expect_status(&response, &[StatusCode::OK])?;

        let transcription: AudioTranscriptionResponse = decode_json(response).await?;
        info!("Transcribed audio file {}", path.display());
        Ok(transcription)
    }
}
