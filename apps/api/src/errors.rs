use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::llm_client::staging::UploadError;
use crate::pipeline::prompt::PromptError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store-level rejection whose message is safe to show (unique keys, row checks).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The model call failed or produced unusable content.
    /// `raw` carries the model's own output when there was one.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        raw: Option<String>,
    },

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn llm(message: impl Into<String>) -> Self {
        AppError::Llm {
            message: message.into(),
            raw: None,
        }
    }

    /// Upstream answered, but the answer could not be used.
    pub fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        AppError::Llm {
            message: message.into(),
            raw: Some(raw.into()),
        }
    }
}

impl From<PromptError> for AppError {
    fn from(e: PromptError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<String> = None;
        let mut raw: Option<String> = None;

        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Persistence(msg) => {
                tracing::error!("Persistence error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    msg,
                )
            }
            AppError::Llm { message, raw: model_output } => {
                match &model_output {
                    Some(text) => tracing::error!("LLM error: {message}; raw output: {text}"),
                    None => tracing::error!("LLM error: {message}"),
                }
                raw = model_output;
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", message)
            }
            AppError::Upload(e) => {
                tracing::error!("Upload error: {e}");
                details = Some(e.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPLOAD_ERROR",
                    "Failed to process the uploaded file".to_string(),
                )
            }
            AppError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut body = Map::new();
        body.insert("error".to_string(), json!(message));
        body.insert("code".to_string(), json!(code));
        if let Some(details) = details {
            body.insert("details".to_string(), json!(details));
        }
        if let Some(raw) = raw {
            body.insert("raw".to_string(), json!(raw));
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let response = AppError::Validation("domain is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "domain is required");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body.get("raw").is_none());
    }

    #[tokio::test]
    async fn test_prompt_error_becomes_validation() {
        let err: AppError = PromptError::MissingField("categories").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("categories"));
    }

    #[tokio::test]
    async fn test_malformed_llm_output_attaches_raw() {
        let response =
            AppError::malformed("Invalid response format from AI", "not json").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["raw"], "not json");
        assert_eq!(body["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_unauthorized_and_not_found() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("User not found".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_upload_error_carries_details() {
        let err = AppError::Upload(UploadError::Failed {
            name: "files/abc".to_string(),
            state: "FAILED".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["details"].as_str().unwrap().contains("files/abc"));
    }
}
