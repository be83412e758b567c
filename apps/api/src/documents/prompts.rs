// Prompt templates for document feedback.

use crate::documents::models::{
    ContactExtraction, CoverLetterRequest, LetterKind, LinkedInReview, ResumeAnalysisRequest,
};
use crate::pipeline::prompt::{fill, require, BuildPrompt, Prompt, PromptError, PromptKind};

pub const RESUME_ANALYSIS_TEMPLATE: &str = r#"I will give you a resume and a job description. Compare the resume against the job description and provide the following.
Resume: {resume}
Job Description: {job_description}
Return only the following, each on a new line:
- A single number score out of 10
- Good points (in a single line)
- Missing points (in a single line)
- Possible additional points (in a single line)
Be concise and to the point."#;

pub const LINKEDIN_SYSTEM: &str = r#"You are a career advisor analyzing a LinkedIn profile in PDF format. Your task is to provide constructive feedback on how to improve the profile to make it more effective.
Analyze the following LinkedIn profile and provide a detailed critique, covering these areas:

Overall Summary:
- Evaluate the clarity and impact of the summary.
- Suggest ways to make it more engaging or informative.
- Advise on whether it effectively highlights key skills and career goals.

Experience Section:
- Assess how well the candidate describes their responsibilities and achievements.
- Provide suggestions on using action verbs, quantifying results, and structuring descriptions for better readability.
- Analyze if the experience descriptions are tailored to the desired job profile.

Skills Section:
- Evaluate the relevance and presentation of the skills listed.
- Suggest additional skills that might be beneficial, if applicable.
- Advise on the importance of endorsements and recommendations.

Education Section:
- Assess the clarity and completeness of the education information.
- Suggest any additional details that could enhance this section (e.g., relevant coursework, GPA, honors).

Recommendations (If Present):
- If recommendations are included, analyze their quality and relevance.
- Provide advice on how to obtain more effective recommendations.

Overall Presentation and Formatting:
- Evaluate the visual appeal and organization of the profile.
- Suggest improvements to formatting, layout, and use of white space.

Actionable Suggestions:
- Provide a list of concrete, actionable steps the candidate can take to improve their LinkedIn profile.

Format your response in markdown with clear headings (using ## for main sections and ### for subsections), bullet points, and sections. Use **bold** for important points. Be specific, constructive, and encouraging in your feedback."#;

pub const LINKEDIN_MESSAGE: &str = "Please analyze this LinkedIn profile PDF and provide detailed \
    feedback as specified in your instructions.";

pub const CONTACT_EXTRACTION_PROMPT: &str = r#"Extract the following information from this resume:
1. Full name of the applicant
2. Email address

Return only the extracted information in this format:
Name: [full name]
Email: [email address]"#;

const LETTER_FORMAT: &str = r#"The cover letter should:
- Begin with the applicant's full name "{name}" on one line
- Email "{email}" on a separate line
- Current date as {date} on its own line
- Address the letter to "Hiring Manager" at the company name
- Start with "Dear Hiring Manager,"
{body_rules}
- Include a call to action for an interview
- End with "Sincerely," on one line
- Then "{name}" on a new line
- Be around 250-300 words

Important: Format this as plain text only, no markdown or HTML. Use line breaks for formatting paragraphs."#;

const COLD_INTRO: &str = "I will give you a resume and a company name. Create a professional cover letter for a cold application to this company.";
const COLD_RULES: &str = "- Highlight the applicant's key skills and experiences from the resume\n\
- Explain why they are interested in the company and how they align with the company's values";

const SPECIFIC_INTRO: &str = "I will give you a resume, job position, and job description. Create a tailored cover letter for this specific job application.";
const SPECIFIC_RULES: &str = "- Match the applicant's skills and experiences from the resume to the job requirements\n\
- Demonstrate understanding of the role and company\n\
- Explain why the applicant is a good fit for this specific position";

const COLD_MESSAGE: &str = "Company Name: {company}\n\n\
Please generate a professional cover letter for a cold application to this company based on the resume I've uploaded.";
const SPECIFIC_MESSAGE: &str = "Company Name: {company}\nJob Position: {position}\nJob Description: {description}\n\n\
Please generate a tailored cover letter for this specific job application based on the resume I've uploaded.";

impl BuildPrompt for ResumeAnalysisRequest {
    fn kind(&self) -> PromptKind {
        PromptKind::ResumeAnalysis
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let resume = require(Some(self.resume_text.as_str()), "resume")?;
        let job_description = require(self.job_description.as_deref(), "jobDescription")?;
        Ok(Prompt::new(fill(
            RESUME_ANALYSIS_TEMPLATE,
            &[("job_description", job_description), ("resume", resume)],
        )))
    }
}

impl BuildPrompt for LinkedInReview {
    fn kind(&self) -> PromptKind {
        PromptKind::LinkedInReview
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        Ok(Prompt::new(LINKEDIN_MESSAGE).with_system(LINKEDIN_SYSTEM))
    }
}

impl BuildPrompt for ContactExtraction {
    fn kind(&self) -> PromptKind {
        PromptKind::ContactExtraction
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        Ok(Prompt::new(CONTACT_EXTRACTION_PROMPT))
    }
}

impl BuildPrompt for CoverLetterRequest {
    fn kind(&self) -> PromptKind {
        PromptKind::CoverLetter
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let company = require(self.company_name.as_deref(), "companyName")?;

        let (intro, rules, message) = match self.kind {
            LetterKind::Cold => (
                COLD_INTRO,
                COLD_RULES,
                fill(COLD_MESSAGE, &[("company", company)]),
            ),
            LetterKind::Specific => {
                let position = require(self.job_position.as_deref(), "jobPosition")?;
                let description = require(self.job_description.as_deref(), "jobDescription")?;
                (
                    SPECIFIC_INTRO,
                    SPECIFIC_RULES,
                    fill(
                        SPECIFIC_MESSAGE,
                        &[
                            ("company", company),
                            ("position", position),
                            ("description", description),
                        ],
                    ),
                )
            }
        };

        let format = fill(
            LETTER_FORMAT,
            &[
                ("body_rules", rules),
                ("date", &self.date),
                ("email", &self.applicant.email),
                ("name", &self.applicant.name),
            ],
        );
        Ok(Prompt::new(message).with_system(format!("{intro}\n\n{format}")))
    }
}
