use serde::Serialize;

/// Resume text (already extracted from the PDF) compared against a job description.
#[derive(Debug, Clone)]
pub struct ResumeAnalysisRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
}

/// LinkedIn profile critique. The profile itself travels as an attached file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedInReview;

/// Name and e-mail lookup on an attached resume.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactExtraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterKind {
    /// Unsolicited application to a company.
    Cold,
    /// Application to a named position with a job description.
    Specific,
}

impl LetterKind {
    /// `cold` or `specific`; absent means `specific`.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            Some("cold") => Some(LetterKind::Cold),
            Some("specific") | Some("") | None => Some(LetterKind::Specific),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct CoverLetterRequest {
    pub kind: LetterKind,
    pub company_name: Option<String>,
    pub job_position: Option<String>,
    pub job_description: Option<String>,
    pub applicant: ApplicantInfo,
    /// Letter date, e.g. `Mar 7 2025`.
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    pub applicant_name: String,
    pub applicant_email: String,
}
