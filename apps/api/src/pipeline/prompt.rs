//! Prompt building shared by every AI endpoint.
//!
//! Each request type implements [`BuildPrompt`]. Building is pure: it only
//! interpolates fields into the feature's template constants and fails with
//! [`PromptError::MissingField`] when a required field is absent or blank.

use std::fmt;

use thiserror::Error;

/// The prompt templates this service knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SkillQuiz,
    CategoryQuestions,
    AssessmentAnalysis,
    InterviewQuestions,
    InterviewEvaluation,
    CareerGuidance,
    ResumeAnalysis,
    LinkedInReview,
    CoverLetter,
    ContactExtraction,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::SkillQuiz => "skill_quiz",
            PromptKind::CategoryQuestions => "category_questions",
            PromptKind::AssessmentAnalysis => "assessment_analysis",
            PromptKind::InterviewQuestions => "interview_questions",
            PromptKind::InterviewEvaluation => "interview_evaluation",
            PromptKind::CareerGuidance => "career_guidance",
            PromptKind::ResumeAnalysis => "resume_analysis",
            PromptKind::LinkedInReview => "linkedin_review",
            PromptKind::CoverLetter => "cover_letter",
            PromptKind::ContactExtraction => "contact_extraction",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// A fully interpolated prompt, ready for the model client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub system: Option<String>,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            system: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

pub trait BuildPrompt {
    fn kind(&self) -> PromptKind;
    fn build(&self) -> Result<Prompt, PromptError>;
}

/// Returns the trimmed value of a required string field.
pub fn require<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, PromptError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PromptError::MissingField(field)),
    }
}

/// Returns a required, non-empty list field.
pub fn require_list<'a, T>(
    value: Option<&'a [T]>,
    field: &'static str,
) -> Result<&'a [T], PromptError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PromptError::MissingField(field)),
    }
}

/// Fills `{name}` placeholders in a template. Placeholders without a value stay as-is.
///
/// Single pass over the template: substituted text is copied literally, so a value
/// that itself contains `{name}` is never expanded.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
