use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{error, info};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::form::UploadForm;
use crate::interview::models::{
    EvaluationRequest, InterviewEvaluation, InterviewQuestionsResponse, InterviewSetup,
    TranscriptionResponse,
};
use crate::interview::shaping::{fallback_evaluation, shape_evaluation, validate_interview_questions};
use crate::llm_client::GenerationRequest;
use crate::pipeline::normalize::Shape;
use crate::pipeline::prompt::BuildPrompt;
use crate::pipeline::{run_json, run_json_lenient, shaped};
use crate::speech::AudioClip;
use crate::state::AppState;

/// POST /api/v1/interview/questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    AppJson(setup): AppJson<InterviewSetup>,
) -> Result<Json<InterviewQuestionsResponse>, AppError> {
    let prompt = setup.build()?;
    let out = run_json(
        state.llm.as_ref(),
        setup.kind(),
        GenerationRequest::from_prompt(prompt),
        Shape::Array,
    )
    .await?;
    let questions = shaped(setup.kind(), validate_interview_questions(&out.value), &out.raw)?;
    Ok(Json(InterviewQuestionsResponse { questions }))
}

/// POST /api/v1/interview/evaluate
///
/// Lenient: output that cannot be parsed yields the fallback evaluation, not an error.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    AppJson(req): AppJson<EvaluationRequest>,
) -> Result<Json<InterviewEvaluation>, AppError> {
    let prompt = req.build()?;
    let question_count = req.questions.as_ref().map_or(0, Vec::len);

    let normalized = run_json_lenient(
        state.llm.as_ref(),
        req.kind(),
        GenerationRequest::from_prompt(prompt),
        fallback_evaluation(question_count),
    )
    .await?;
    Ok(Json(shape_evaluation(&normalized.value, question_count)))
}

/// POST /api/v1/interview/transcribe (multipart: `audio`, optional `questionId`)
pub async fn handle_transcribe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, AppError> {
    let transcriber = state
        .transcriber
        .clone()
        .ok_or_else(|| AppError::Unavailable("Transcription is not configured".to_string()))?;

    let form = UploadForm::read(multipart).await?;
    let audio = form.file("audio", "No audio file provided")?;
    let question_id = form.text("questionId").map(str::to_string);

    let clip = AudioClip {
        bytes: audio.bytes.clone(),
        file_name: audio.file_name.clone(),
        mime_type: audio.content_type.clone(),
    };
    let transcription = transcriber.transcribe(clip).await.map_err(|e| {
        error!("Transcription failed: {e}");
        AppError::llm("Failed to transcribe audio")
    })?;
    info!("Transcribed answer for question {:?}", question_id);

    Ok(Json(TranscriptionResponse {
        transcription,
        question_id,
    }))
}
