use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::ProfileView;
use crate::profiles::validation::{
    validate_profile, validate_score, validate_update, ProfileInput, ProfileUpdateInput,
    SkillScoreInput,
};
use crate::session::SessionUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: ProfileView,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// GET /api/v1/users/me
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<ProfileView>, AppError> {
    let user = state
        .store
        .find_user(&session.email)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(ProfileView::from(user)))
}

/// POST /api/v1/users
///
/// 201 when the profile is new, 200 when an existing one was replaced.
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    session: SessionUser,
    AppJson(input): AppJson<ProfileInput>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    let profile = validate_profile(&session.email, input)?;
    let (user, created) = state.store.upsert_user(profile).await?;

    let (status, message) = if created {
        (StatusCode::CREATED, "User created successfully")
    } else {
        (StatusCode::OK, "User updated successfully")
    };
    Ok((
        status,
        Json(ProfileResponse {
            message,
            user: user.into(),
        }),
    ))
}

/// PATCH /api/v1/users/me
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: SessionUser,
    AppJson(input): AppJson<ProfileUpdateInput>,
) -> Result<Json<ProfileResponse>, AppError> {
    let update = validate_update(input)?;
    let user = state
        .store
        .update_user(&session.email, update)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(ProfileResponse {
        message: "User updated successfully",
        user: user.into(),
    }))
}

/// POST /api/v1/users/me/skill-scores
pub async fn handle_skill_score(
    State(state): State<AppState>,
    session: SessionUser,
    AppJson(input): AppJson<SkillScoreInput>,
) -> Result<Json<Value>, AppError> {
    let (skill, score) = validate_score(input)?;
    if !state.store.set_skill_score(&session.email, &skill, score).await? {
        return Err(user_not_found());
    }
    info!("Recorded {skill} score {score} for {}", session.email);
    Ok(Json(json!({ "success": true })))
}
