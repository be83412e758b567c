/// Generative model client: the single point of entry for all model calls.
///
/// ARCHITECTURAL RULE: No other module may call the model provider directly.
/// Handlers talk to the `GenerativeModel` / `FileService` traits carried in `AppState`;
/// `GeminiClient` is the production implementation of both.
///
/// Every call is a single attempt. Failures surface to the endpoint boundary.
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::prompt::Prompt;

pub mod gemini;
#[cfg(test)]
pub mod mock;
pub mod prompts;
pub mod staging;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected provider response: {0}")]
    Protocol(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Reference to a file already uploaded to the provider.
    File { mime_type: String, uri: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

/// Sampling parameters. Unset fields are left to the provider's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// One model call: optional system instruction, ordered turns, sampling config.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    pub config: Option<GenerationConfig>,
}

impl GenerationRequest {
    /// Single-shot completion of one prompt.
    pub fn from_prompt(prompt: Prompt) -> Self {
        Self {
            system: prompt.system,
            turns: vec![Turn {
                role: Role::User,
                parts: vec![Part::Text(prompt.text)],
            }],
            config: None,
        }
    }

    /// Single-shot completion with the prompt and a file in the same turn.
    pub fn with_attachment(prompt: Prompt, file: &RemoteFile) -> Self {
        Self {
            system: prompt.system,
            turns: vec![Turn {
                role: Role::User,
                parts: vec![Part::Text(prompt.text), file.as_part()],
            }],
            config: None,
        }
    }

    /// Chat session whose history is seeded with the file, followed by the prompt message.
    pub fn chat_with_file(prompt: Prompt, file: &RemoteFile) -> Self {
        Self {
            system: prompt.system,
            turns: vec![
                Turn {
                    role: Role::User,
                    parts: vec![file.as_part()],
                },
                Turn {
                    role: Role::User,
                    parts: vec![Part::Text(prompt.text)],
                },
            ],
            config: None,
        }
    }

    pub fn with_config(mut self, config: Option<GenerationConfig>) -> Self {
        self.config = config;
        self
    }
}

/// Processing state of a file held by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    Processing,
    Active,
    Failed,
    #[default]
    #[serde(other)]
    StateUnspecified,
}

impl FileState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileState::StateUnspecified => "STATE_UNSPECIFIED",
            FileState::Processing => "PROCESSING",
            FileState::Active => "ACTIVE",
            FileState::Failed => "FAILED",
        }
    }
}

/// A file registered with the provider's file API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub state: FileState,
}

impl RemoteFile {
    pub fn as_part(&self) -> Part {
        Part::File {
            mime_type: self.mime_type.clone(),
            uri: self.uri.clone(),
        }
    }
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Runs one generation and returns the model's raw text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError>;
}

#[async_trait]
pub trait FileService: Send + Sync {
    async fn upload(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile, LlmError>;

    async fn get(&self, name: &str) -> Result<RemoteFile, LlmError>;
}
