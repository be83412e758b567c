//! Product feedback left from any page of the app.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::feedback::{NewFeedback, FEEDBACK_SECTIONS, MAX_COMMENT_CHARS};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackInput {
    pub section: Option<String>,
    pub stars: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub success: bool,
    pub feedback_id: Uuid,
}

pub fn validate_feedback(input: FeedbackInput) -> Result<NewFeedback, AppError> {
    let section = input.section.map(|s| s.trim().to_string()).unwrap_or_default();
    if !FEEDBACK_SECTIONS.contains(&section.as_str()) {
        return Err(AppError::Validation("Invalid feedback data".to_string()));
    }
    let stars = match input.stars {
        Some(stars @ 1..=5) => stars as i16,
        _ => return Err(AppError::Validation("Invalid feedback data".to_string())),
    };
    let comment = input.comment.map(|c| c.trim().to_string()).unwrap_or_default();
    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Validation(format!(
            "Comment cannot exceed {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(NewFeedback {
        section,
        stars,
        comment,
    })
}

/// POST /api/v1/feedback
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    AppJson(input): AppJson<FeedbackInput>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let feedback = validate_feedback(input)?;
    let row = state.store.insert_feedback(feedback).await?;
    info!("Stored {}-star feedback for {}", row.stars, row.section);
    Ok(Json(FeedbackResponse {
        success: true,
        feedback_id: row.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::llm_client::mock::ScriptedModel;
    use crate::test_support::{post_json, Harness};

    fn input(section: &str, stars: i64, comment: Option<&str>) -> FeedbackInput {
        FeedbackInput {
            section: Some(section.to_string()),
            stars: Some(stars),
            comment: comment.map(str::to_string),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(validate_feedback(input("interview", 5, None)).is_ok());
        assert!(validate_feedback(input("interview", 0, None)).is_err());
        assert!(validate_feedback(input("interview", 6, None)).is_err());
        assert!(validate_feedback(input("billing", 3, None)).is_err());
        let long = "x".repeat(MAX_COMMENT_CHARS + 1);
        assert!(validate_feedback(input("other", 3, Some(&long))).is_err());
    }

    #[tokio::test]
    async fn test_submit_returns_id() {
        let harness = Harness::new(ScriptedModel::default());
        let (status, body) = harness
            .send(post_json(
                "/api/v1/feedback",
                json!({"section": "resume-analysis", "stars": 4, "comment": "Helpful"}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let stored = harness.store.feedback();
        assert_eq!(stored.len(), 1);
        assert_eq!(body["feedbackId"], stored[0].id.to_string());
        assert_eq!(stored[0].comment, "Helpful");
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_stars() {
        let harness = Harness::new(ScriptedModel::default());
        let (status, body) = harness
            .send(post_json("/api/v1/feedback", json!({"section": "other", "stars": 9})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid feedback data");
        assert!(harness.store.feedback().is_empty());
    }
}
