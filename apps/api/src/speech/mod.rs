//! Speech-to-text for spoken interview answers (OpenAI Whisper REST API).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const MODEL: &str = "whisper-1";
const LANGUAGE: &str = "en";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A recorded clip as received from the browser.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Bytes,
    pub file_name: String,
    pub mime_type: String,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, TranscriptionError>;
}

#[derive(Clone)]
pub struct WhisperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

impl WhisperClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, TranscriptionError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, TranscriptionError> {
        let size = clip.bytes.len();
        let file = Part::bytes(clip.bytes.to_vec())
            .file_name(clip.file_name)
            .mime_str(&clip.mime_type)?;
        let form = Form::new()
            .part("file", file)
            .text("model", MODEL)
            .text("language", LANGUAGE);

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        debug!("Transcribed {size} bytes of audio into {} chars", parsed.text.len());
        Ok(parsed.text)
    }
}
