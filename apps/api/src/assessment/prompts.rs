// Prompt templates for the assessment endpoints.

use crate::assessment::models::{
    group_responses, AssessmentRequest, CategoryQuestionsQuery, SkillQuizQuery,
};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::pipeline::prompt::{fill, require, require_list, BuildPrompt, Prompt, PromptError, PromptKind};

/// Skill quiz template. Replace `{skill}` before sending.
pub const SKILL_QUIZ_TEMPLATE: &str = r#"Generate 10 multiple choice questions to test someone's knowledge of {skill}.
Each question should have 4 options and one correct answer.
Return the response in this exact JSON format:
[
  {
    "question": "Question text here?",
    "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
    "correctAnswer": "The correct option text"
  }
]
Make sure the questions are easy to moderate and cover different aspects of {skill}."#;

pub const CATEGORY_QUESTIONS_SYSTEM: &str =
    "You are a career assessment expert who creates thoughtful, insightful questions \
    to help people discover their career paths.";

const QUESTION_FORMAT: &str = "Format as a JSON array with each object having: \"question\", \
    \"options\" (array of 4 choices), and \"correctAnswer\" (one of the options).";

const APTITUDE_TEMPLATE: &str = "Generate 5 multiple-choice questions to assess a beginner's \
    aptitude and interests in the {domain} field. Each question should help identify natural \
    talents, preferences, and potential strengths. {format} Questions should not have \
    objectively right/wrong answers but help reveal preferences.";

const COMPETENCY_TEMPLATE: &str = "Generate 5 multiple-choice questions to assess a beginner's \
    core competencies relevant to the {domain} field. Focus on reasoning, communication, and \
    problem-solving abilities. {format} Questions should gradually increase in difficulty.";

const VALUES_TEMPLATE: &str = "Generate 5 multiple-choice questions to help beginners discover \
    their values and priorities related to careers in the {domain} field. Questions should help \
    identify what matters most to them (stability, creativity, impact, work-life balance, etc.). \
    {format} There are no right/wrong answers, but the \"correctAnswer\" should indicate what the \
    option suggests about their values.";

const SELF_TEMPLATE: &str = "Generate 5 multiple-choice questions for self-perception assessment \
    related to the {domain} field. Questions should help beginners reflect on what they think \
    they're good at and what careers interest them. {format} There are no right/wrong answers, \
    but the \"correctAnswer\" should be useful for analysis.";

const PERSONALITY_TEMPLATE: &str = "Generate 5 multiple-choice questions to assess personality \
    traits relevant to careers in the {domain} field. Base questions on established frameworks \
    like MBTI, Big Five, or RIASEC. {format} Each option should map to different personality traits.";

const GENERIC_CATEGORY_TEMPLATE: &str = "Generate 5 multiple-choice questions to assess a \
    beginner's knowledge and interest in the {domain} field. {format}";

pub const ANALYSIS_TEMPLATE: &str = "I have responses from a career assessment for someone \
interested in the {domain} field.\nFor each assessment category, here are their responses:\n\n{sections}\n";

/// Report schema for assessment analysis.
pub const ANALYSIS_SYSTEM: &str = r#"You are a career assessment AI specializing in balanced, non-prescriptive career guidance.

Based on assessment responses, generate a detailed career assessment report with the following structure:
{
  "summary": "A balanced 2-3 sentence overview acknowledging both potential fit for traditional and emerging roles in the chosen field",
  "strengths": ["List 4-5 specific strengths based on responses, noting how they might apply to different career paths"],
  "careerPaths": [
    {"traditional": "A traditional career path", "description": "Brief description with realistic success metrics"},
    {"traditional": "Another established career path", "description": "Brief description with realistic success metrics"},
    {"alternative": "An alternative path others have successfully taken", "description": "How this differs from traditional routes"},
    {"emerging": "An emerging role that didn't exist 5-10 years ago", "description": "Why this field is growing and required skills"}
  ],
  "detailedAnalysis": [
    "Balanced paragraph analyzing aptitude & interests, noting multiple ways these could manifest professionally",
    "Paragraph on core competencies that acknowledges both strengths and areas for development",
    "Paragraph on values & priorities that frames these as decision-making tools rather than limitations",
    "Paragraph on self-perception that validates their view while offering additional perspectives",
    "Paragraph on personality traits that emphasizes adaptability rather than fixed characteristics"
  ],
  "decisionFramework": [
    "A framework question to help evaluate options based on their values",
    "A framework question to help assess skill-fit with potential paths",
    "A framework question to help consider work environment preferences",
    "A framework question to help balance short-term needs with long-term goals"
  ],
  "nextSteps": [
    "An action step for exploring traditional paths",
    "An action step for investigating emerging opportunities",
    "A skill development recommendation that would benefit multiple paths",
    "A networking/mentorship suggestion that provides exposure to different career realities"
  ]
}

Ensure the analysis presents balanced options without being overly prescriptive. Include both traditional and non-traditional paths, and provide frameworks for decision-making rather than definitive answers."#;

fn category_template(category: &str) -> &'static str {
    match category {
        "aptitude" => APTITUDE_TEMPLATE,
        "competency" => COMPETENCY_TEMPLATE,
        "values" => VALUES_TEMPLATE,
        "self" => SELF_TEMPLATE,
        "personality" => PERSONALITY_TEMPLATE,
        _ => GENERIC_CATEGORY_TEMPLATE,
    }
}

impl BuildPrompt for SkillQuizQuery {
    fn kind(&self) -> PromptKind {
        PromptKind::SkillQuiz
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let skill = require(self.skill.as_deref(), "skill")?;
        Ok(Prompt::new(fill(SKILL_QUIZ_TEMPLATE, &[("skill", skill)])))
    }
}

impl BuildPrompt for CategoryQuestionsQuery {
    fn kind(&self) -> PromptKind {
        PromptKind::CategoryQuestions
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let category = require(self.skill.as_deref(), "skill")?;
        let domain = require(self.domain.as_deref(), "domain")?;
        let text = fill(
            category_template(category),
            &[("domain", domain), ("format", QUESTION_FORMAT)],
        );
        Ok(Prompt::new(text)
            .with_system(format!("{CATEGORY_QUESTIONS_SYSTEM} {JSON_ONLY_INSTRUCTION}")))
    }
}

impl BuildPrompt for AssessmentRequest {
    fn kind(&self) -> PromptKind {
        PromptKind::AssessmentAnalysis
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let domain = require(self.domain.as_deref(), "domain")?;
        let categories = require_list(self.categories.as_deref(), "categories")?;
        let responses = self
            .responses
            .as_ref()
            .ok_or(PromptError::MissingField("responses"))?;

        let sections = group_responses(categories, responses)
            .into_iter()
            .map(|(category, answers)| {
                let lines = answers
                    .iter()
                    .enumerate()
                    .map(|(i, answer)| format!("Q{}: {answer}", i + 1))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{} RESPONSES:\n{lines}", category.to_uppercase())
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let text = fill(ANALYSIS_TEMPLATE, &[("domain", domain), ("sections", &sections)]);
        Ok(Prompt::new(text).with_system(format!("{ANALYSIS_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")))
    }
}
