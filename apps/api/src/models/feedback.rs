use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const FEEDBACK_SECTIONS: [&str; 6] = [
    "assessments",
    "resume-analysis",
    "interview",
    "career-guidance",
    "beginner-assessment",
    "other",
];

pub const MAX_COMMENT_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRow {
    pub id: Uuid,
    pub section: String,
    pub stars: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Validated feedback ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub section: String,
    pub stars: i16,
    pub comment: String,
}
