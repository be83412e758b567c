use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};

use crate::documents::contact::parse_contact_info;
use crate::documents::models::{
    AnalysisResponse, ApplicantInfo, ContactExtraction, CoverLetterRequest, CoverLetterResponse,
    LetterKind, LinkedInReview, ResumeAnalysisRequest,
};
use crate::errors::AppError;
use crate::form::{FilePart, UploadForm};
use crate::llm_client::prompts::plain_text_config;
use crate::llm_client::staging::{stage_upload, Upload};
use crate::llm_client::{GenerationRequest, RemoteFile};
use crate::pipeline::prompt::BuildPrompt;
use crate::pipeline::{complete, run_text};
use crate::state::AppState;

const LINKEDIN_TEMPERATURE: f32 = 1.0;
const COVER_LETTER_TEMPERATURE: f32 = 0.7;
const LETTER_DATE_FORMAT: &str = "%b %-d %Y";

/// POST /api/v1/resume/analyze (multipart: `resume` PDF, `jobDescription`)
pub async fn handle_resume_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let resume = form.file("resume", "No file uploaded")?;
    let job_description = form
        .text("jobDescription")
        .ok_or_else(|| AppError::Validation("No job description provided".to_string()))?
        .to_string();

    let resume_text = extract_pdf_text(resume).await?;
    info!("Extracted {} chars from {}", resume_text.len(), resume.file_name);

    let req = ResumeAnalysisRequest {
        resume_text,
        job_description: Some(job_description),
    };
    let prompt = req.build()?;
    let analysis = run_text(
        state.llm.as_ref(),
        req.kind(),
        GenerationRequest::from_prompt(prompt),
    )
    .await?;
    Ok(Json(AnalysisResponse { analysis }))
}

/// POST /api/v1/linkedin/analyze (multipart: `linkedin` PDF)
///
/// Returns the critique as markdown.
pub async fn handle_linkedin_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let profile = form.file("linkedin", "No file uploaded")?;

    let file = stage(&state, profile).await?;
    let prompt = LinkedInReview.build()?;
    let analysis = run_text(
        state.llm.as_ref(),
        LinkedInReview.kind(),
        GenerationRequest::chat_with_file(prompt, &file)
            .with_config(Some(plain_text_config(LINKEDIN_TEMPERATURE))),
    )
    .await?;
    Ok(Json(AnalysisResponse { analysis }))
}

/// POST /api/v1/cover-letter
///
/// All form checks run before anything is uploaded.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let resume = form.file("resume", "No resume uploaded")?;
    let company_name = form
        .text("companyName")
        .ok_or_else(|| AppError::Validation("No company name provided".to_string()))?;
    let kind = LetterKind::parse(form.text("generationType")).ok_or_else(|| {
        AppError::Validation("generationType must be \"cold\" or \"specific\"".to_string())
    })?;
    let job_position = form.text("jobPosition");
    let job_description = form.text("jobDescription");
    if kind == LetterKind::Specific && (job_position.is_none() || job_description.is_none()) {
        return Err(AppError::Validation(
            "Job position and description are required for specific job applications".to_string(),
        ));
    }

    let file = stage(&state, resume).await?;

    let applicant = match (form.text("applicantName"), form.text("applicantEmail")) {
        (Some(name), Some(email)) => ApplicantInfo {
            name: name.to_string(),
            email: email.to_string(),
        },
        _ => extract_contact(&state, &file).await,
    };

    let req = CoverLetterRequest {
        kind,
        company_name: Some(company_name.to_string()),
        job_position: job_position.map(str::to_string),
        job_description: job_description.map(str::to_string),
        applicant,
        date: Utc::now().format(LETTER_DATE_FORMAT).to_string(),
    };
    let prompt = req.build()?;
    let cover_letter = run_text(
        state.llm.as_ref(),
        req.kind(),
        GenerationRequest::chat_with_file(prompt, &file)
            .with_config(Some(plain_text_config(COVER_LETTER_TEMPERATURE))),
    )
    .await?;

    let CoverLetterRequest { applicant, .. } = req;
    Ok(Json(CoverLetterResponse {
        cover_letter,
        applicant_name: applicant.name,
        applicant_email: applicant.email,
    }))
}

async fn stage(state: &AppState, part: &FilePart) -> Result<RemoteFile, AppError> {
    let file = stage_upload(
        state.files.as_ref(),
        state.sleeper.as_ref(),
        state.poll_policy,
        Upload {
            bytes: &part.bytes,
            mime_type: &part.content_type,
            file_name: &part.file_name,
        },
    )
    .await?;
    Ok(file)
}

/// Asks the model for the applicant's name and e-mail. Never fails: any error
/// yields the placeholder contact.
async fn extract_contact(state: &AppState, file: &RemoteFile) -> ApplicantInfo {
    let prompt = match ContactExtraction.build() {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!("Contact extraction prompt failed: {e}");
            return ApplicantInfo::default();
        }
    };
    match complete(
        state.llm.as_ref(),
        ContactExtraction.kind(),
        GenerationRequest::with_attachment(prompt, file),
    )
    .await
    {
        Ok(raw) => parse_contact_info(&raw),
        Err(e) => {
            warn!("Contact extraction failed, using defaults: {e}");
            ApplicantInfo::default()
        }
    }
}

async fn extract_pdf_text(part: &FilePart) -> Result<String, AppError> {
    if !part.is_pdf() {
        return Err(AppError::Validation("Resume must be a PDF file".to_string()));
    }
    let bytes = part.bytes.clone();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            warn!("PDF extraction task aborted: {e}");
            AppError::Validation("Could not read the uploaded PDF".to_string())
        })?;
    let text = extracted.map_err(|e| {
        warn!("PDF extraction failed: {e}");
        AppError::Validation("Could not read the uploaded PDF".to_string())
    })?;
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "The uploaded PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}
