use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use crate::assessment::models::{
    AnalysisResponse, AssessmentRequest, CategoryQuestionsQuery, QuestionsResponse,
    SkillQuizQuery,
};
use crate::assessment::shaping::{shape_assessment_report, validate_questions};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::llm_client::prompts::creative_config;
use crate::llm_client::{GenerationConfig, GenerationRequest};
use crate::pipeline::normalize::Shape;
use crate::pipeline::prompt::{BuildPrompt, Prompt, PromptKind};
use crate::pipeline::{run_json, shaped};
use crate::state::AppState;

/// Shared by both question endpoints: prompt → model → JSON array → validated batch.
async fn generate_questions(
    state: &AppState,
    kind: PromptKind,
    prompt: Prompt,
    config: Option<GenerationConfig>,
) -> Result<QuestionsResponse, AppError> {
    let request = GenerationRequest::from_prompt(prompt).with_config(config);

    let out = run_json(state.llm.as_ref(), kind, request, Shape::Array).await?;
    let questions = shaped(kind, validate_questions(&out.value), &out.raw)?;
    info!("Generated {} questions for {kind}", questions.len());
    Ok(QuestionsResponse { questions })
}

/// GET /api/v1/questions?skill=
pub async fn handle_skill_quiz(
    State(state): State<AppState>,
    Query(query): Query<SkillQuizQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let prompt = query.build()?;
    let questions =
        generate_questions(&state, query.kind(), prompt, Some(creative_config())).await?;
    Ok(Json(questions))
}

/// GET /api/v1/assessment/questions?skill=&domain=
pub async fn handle_category_questions(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuestionsQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let prompt = query.build()?;
    Ok(Json(generate_questions(&state, query.kind(), prompt, None).await?))
}

/// POST /api/v1/assessment/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(req): AppJson<AssessmentRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let prompt = req.build()?;
    let out = run_json(
        state.llm.as_ref(),
        req.kind(),
        GenerationRequest::from_prompt(prompt),
        Shape::Object,
    )
    .await?;
    Ok(Json(AnalysisResponse {
        results: shape_assessment_report(&out.value),
    }))
}
