pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::documents::handlers as documents;
use crate::feedback;
use crate::guidance::handlers as guidance;
use crate::interview::handlers as interview;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assessments
        .route("/api/v1/questions", get(assessment::handle_skill_quiz))
        .route(
            "/api/v1/assessment/questions",
            get(assessment::handle_category_questions),
        )
        .route(
            "/api/v1/assessment/analyze",
            post(assessment::handle_analyze),
        )
        // Mock interviews
        .route(
            "/api/v1/interview/questions",
            post(interview::handle_interview_questions),
        )
        .route(
            "/api/v1/interview/evaluate",
            post(interview::handle_evaluate),
        )
        .route(
            "/api/v1/interview/transcribe",
            post(interview::handle_transcribe),
        )
        // Documents
        .route(
            "/api/v1/resume/analyze",
            post(documents::handle_resume_analysis),
        )
        .route(
            "/api/v1/linkedin/analyze",
            post(documents::handle_linkedin_analysis),
        )
        .route("/api/v1/cover-letter", post(documents::handle_cover_letter))
        // Profile and guidance (session required)
        .route(
            "/api/v1/career-guidance",
            get(guidance::handle_career_guidance),
        )
        .route("/api/v1/users", post(profiles::handle_upsert_profile))
        .route(
            "/api/v1/users/me",
            get(profiles::handle_get_profile).patch(profiles::handle_update_profile),
        )
        .route(
            "/api/v1/users/me/skill-scores",
            post(profiles::handle_skill_score),
        )
        .route("/api/v1/feedback", post(feedback::handle_submit_feedback))
        .with_state(state)
}
