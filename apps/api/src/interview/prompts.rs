// Prompt templates for mock interviews.

use crate::interview::models::{EvaluationRequest, InterviewSetup};
use crate::pipeline::prompt::{fill, require, require_list, BuildPrompt, Prompt, PromptError, PromptKind};

pub const NO_ANSWER: &str = "No answer provided";

pub const QUESTIONS_TEMPLATE: &str = r#"Generate 5 technical interview questions for a {role} position with experience level: {experience} years.
The candidate has mentioned the following tech stack: {tech_stack}.

For each question, provide:
1. A challenging but fair technical question that would be asked in a real interview
2. The ideal answer to evaluate the candidate's response

Format the response as a JSON array of objects with the following structure:
[
  {
    "question": "The technical question text",
    "idealAnswer": "The ideal answer to evaluate against"
  }
]

Make sure the questions are appropriate for the experience level and specific to the tech stack mentioned.
Do not include any explanations or additional text outside of the JSON structure."#;

pub const EVALUATION_TEMPLATE: &str = r#"You are an expert technical interviewer for a {role} position.
Experience level: {experience} years
Tech stack: {tech_stack}

You need to evaluate the candidate's responses to the interview questions.

Here are the questions and the candidate's answers:
{transcript}

For each answer, provide feedback with the following structure:
1. Strengths of the response
2. Weaknesses of the response
3. Specific suggestions for improvement
4. Assessment of technical knowledge demonstrated

Then, provide an overall score out of 10 for the entire interview, considering:
- Technical accuracy
- Depth of knowledge
- Problem-solving approach
- Communication clarity

Format the response as a JSON object with the following structure:
{
  "feedback": {
    "0": {
      "strengths": "Strengths of answer 1",
      "weaknesses": "Weaknesses of answer 1",
      "improvement": "Improvement suggestions for answer 1",
      "knowledge": "Technical knowledge assessment for answer 1"
    }
  },
  "score": 7.5
}

Include one feedback entry per question, keyed by its zero-based index.
Ensure each feedback section is concise but informative.
Do not include any explanations or additional text outside of the JSON structure."#;

struct SetupFields<'a> {
    role: &'a str,
    tech_stack: &'a str,
    experience: &'a str,
}

fn setup_fields(setup: &InterviewSetup) -> Result<SetupFields<'_>, PromptError> {
    Ok(SetupFields {
        role: require(setup.role.as_deref(), "role")?,
        tech_stack: require(setup.tech_stack.as_deref(), "techStack")?,
        experience: require(setup.experience.as_deref(), "experience")?,
    })
}

impl BuildPrompt for InterviewSetup {
    fn kind(&self) -> PromptKind {
        PromptKind::InterviewQuestions
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let f = setup_fields(self)?;
        Ok(Prompt::new(fill(
            QUESTIONS_TEMPLATE,
            &[
                ("role", f.role),
                ("experience", f.experience),
                ("tech_stack", f.tech_stack),
            ],
        )))
    }
}

impl BuildPrompt for EvaluationRequest {
    fn kind(&self) -> PromptKind {
        PromptKind::InterviewEvaluation
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let f = setup_fields(&self.setup)?;
        let questions = require_list(self.questions.as_deref(), "questions")?;

        let transcript = questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                format!(
                    "Question {}: {}\nCandidate's answer: {}\nIdeal answer: {}",
                    i + 1,
                    q.question,
                    self.answers.get(i).unwrap_or(NO_ANSWER),
                    q.ideal_answer
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(Prompt::new(fill(
            EVALUATION_TEMPLATE,
            &[
                ("role", f.role),
                ("experience", f.experience),
                ("tech_stack", f.tech_stack),
                ("transcript", &transcript),
            ],
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{Answers, InterviewQuestion};
    use std::collections::BTreeMap;

    fn setup() -> InterviewSetup {
        InterviewSetup {
            role: Some("Backend Engineer".to_string()),
            tech_stack: Some("Rust, PostgreSQL".to_string()),
            experience: Some("3".to_string()),
        }
    }

    #[test]
    fn test_questions_prompt_interpolates_setup() {
        let prompt = setup().build().unwrap();
        assert!(prompt.text.contains("a Backend Engineer position with experience level: 3 years"));
        assert!(prompt.text.contains("tech stack: Rust, PostgreSQL."));
    }

    #[test]
    fn test_questions_prompt_requires_tech_stack() {
        let mut s = setup();
        s.tech_stack = None;
        assert_eq!(s.build(), Err(PromptError::MissingField("techStack")));
    }

    #[test]
    fn test_evaluation_marks_missing_answers() {
        let mut answers = BTreeMap::new();
        answers.insert("0".to_string(), "Use an index".to_string());
        let req = EvaluationRequest {
            setup: setup(),
            questions: Some(vec![
                InterviewQuestion {
                    question: "How do you speed up a slow query?".to_string(),
                    ideal_answer: "Inspect the plan, add indexes".to_string(),
                },
                InterviewQuestion {
                    question: "What is ownership?".to_string(),
                    ideal_answer: "Single owner, moves, borrows".to_string(),
                },
            ]),
            answers: Answers::ByIndex(answers),
        };
        let prompt = req.build().unwrap();
        assert!(prompt.text.contains("Question 1: How do you speed up a slow query?\nCandidate's answer: Use an index"));
        assert!(prompt.text.contains("Question 2: What is ownership?\nCandidate's answer: No answer provided"));
    }

    #[test]
    fn test_evaluation_requires_questions() {
        let req = EvaluationRequest {
            setup: setup(),
            questions: Some(vec![]),
            answers: Answers::default(),
        };
        assert_eq!(req.build(), Err(PromptError::MissingField("questions")));
    }
}
