//! The AI-proxy pipeline shared by every model-backed endpoint.
//!
//! Flow: request → `BuildPrompt` → `GenerativeModel` → normalize → feature shaper.
//! Handlers own validation and shaping; this module owns the model call and the
//! mapping of model failures onto `AppError`.

pub mod normalize;
pub mod prompt;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{GenerationRequest, GenerativeModel};
use crate::pipeline::normalize::{interpret, normalize, ModelOutput, Normalized, Shape};
use crate::pipeline::prompt::PromptKind;

/// Rejection of a recovered payload that does not meet the UI's contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected {0}")]
    WrongType(&'static str),

    #[error("item {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("no items generated")]
    Empty,
}

/// A recovered JSON payload plus the model text it came from.
#[derive(Debug, Clone)]
pub struct Structured {
    pub value: Value,
    pub raw: String,
}

/// One model call, no retries.
pub async fn complete(
    model: &dyn GenerativeModel,
    kind: PromptKind,
    request: GenerationRequest,
) -> Result<String, AppError> {
    info!("Calling model for {kind}");
    let raw = model
        .generate(request)
        .await
        .map_err(|e| AppError::llm(format!("{kind} generation failed: {e}")))?;
    info!("Model answered {kind} ({} chars)", raw.len());
    Ok(raw)
}

/// Strict JSON: anything the normalizer cannot recover is an upstream error carrying the raw text.
pub fn into_json(kind: PromptKind, raw: String, shape: Shape) -> Result<Structured, AppError> {
    match interpret(&raw, shape) {
        ModelOutput::Json(value) => Ok(Structured { value, raw }),
        ModelOutput::Text(_) => {
            warn!("{kind}: model returned prose instead of JSON");
            Err(AppError::malformed("AI returned prose instead of JSON", raw))
        }
        ModelOutput::Malformed => {
            warn!("{kind}: could not recover JSON from model output");
            Err(AppError::malformed("Invalid response format from AI", raw))
        }
    }
}

/// Maps a shaping failure to an upstream error that carries the model text.
pub fn shaped<T>(kind: PromptKind, result: Result<T, ShapeError>, raw: &str) -> Result<T, AppError> {
    result.map_err(|e| {
        warn!("{kind}: model output failed validation: {e}");
        AppError::malformed(format!("AI returned invalid content: {e}"), raw)
    })
}

/// Free text: only an empty answer is an error.
pub fn into_text(kind: PromptKind, raw: String) -> Result<String, AppError> {
    let text = raw.trim();
    if text.is_empty() {
        warn!("{kind}: model returned empty text");
        return Err(AppError::llm("AI returned an empty response"));
    }
    Ok(text.to_string())
}

pub async fn run_json(
    model: &dyn GenerativeModel,
    kind: PromptKind,
    request: GenerationRequest,
    shape: Shape,
) -> Result<Structured, AppError> {
    let raw = complete(model, kind, request).await?;
    into_json(kind, raw, shape)
}

/// Lenient JSON: unrecoverable output degrades to `fallback` instead of failing.
pub async fn run_json_lenient(
    model: &dyn GenerativeModel,
    kind: PromptKind,
    request: GenerationRequest,
    fallback: Value,
) -> Result<Normalized, AppError> {
    let raw = complete(model, kind, request).await?;
    let normalized = normalize(&raw, fallback);
    if !normalized.ok {
        warn!("{kind}: using fallback payload; raw output: {}", normalized.raw);
    }
    Ok(normalized)
}

pub async fn run_text(
    model: &dyn GenerativeModel,
    kind: PromptKind,
    request: GenerationRequest,
) -> Result<String, AppError> {
    let raw = complete(model, kind, request).await?;
    into_text(kind, raw)
}
