use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::guidance::prompts::GuidanceProfile;
use crate::llm_client::GenerationRequest;
use crate::pipeline::prompt::BuildPrompt;
use crate::pipeline::run_text;
use crate::session::SessionUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GuidanceResponse {
    pub guidance: String,
}

/// GET /api/v1/career-guidance
///
/// Generated once per user; later calls return the stored report.
pub async fn handle_career_guidance(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<GuidanceResponse>, AppError> {
    let user = state
        .store
        .find_user(&session.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.username.trim().is_empty() {
        return Err(AppError::Validation(
            "Please complete your basic profile before requesting career guidance".to_string(),
        ));
    }

    if let Some(guidance) = user.career_guidance.as_deref().filter(|g| !g.is_empty()) {
        info!("Serving stored career guidance for {}", session.email);
        return Ok(Json(GuidanceResponse {
            guidance: guidance.to_string(),
        }));
    }

    if !user.unscored_skills().is_empty() {
        return Err(AppError::Validation(
            "Please complete skill assessments for all skills before requesting career guidance"
                .to_string(),
        ));
    }

    let profile = GuidanceProfile(&user);
    let prompt = profile.build()?;
    let kind = profile.kind();
    let generated = run_text(state.llm.as_ref(), kind, GenerationRequest::from_prompt(prompt)).await?;

    let guidance = state
        .store
        .store_career_guidance_if_absent(&session.email, &generated)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(GuidanceResponse { guidance }))
}
