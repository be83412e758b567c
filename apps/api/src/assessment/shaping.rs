//! Shaping of model payloads into what the assessment pages render.

use serde_json::Value;

use crate::assessment::models::{AssessmentReport, GeneratedQuestion};
use crate::pipeline::ShapeError;

const OPTION_COUNT: usize = 4;
const PATH_VARIANTS: [&str; 3] = ["traditional", "alternative", "emerging"];

/// Validates a generated question batch. One bad item rejects the whole batch.
///
/// `correctAnswer` is compared after trimming and replaced by the exact option text.
pub fn validate_questions(payload: &Value) -> Result<Vec<GeneratedQuestion>, ShapeError> {
    let items = payload.as_array().ok_or(ShapeError::WrongType("a question array"))?;
    if items.is_empty() {
        return Err(ShapeError::Empty);
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_question(item).map_err(|reason| ShapeError::InvalidItem { index, reason }))
        .collect()
}

fn validate_question(item: &Value) -> Result<GeneratedQuestion, String> {
    let question = item
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or("missing question text")?;

    let options = item
        .get("options")
        .and_then(Value::as_array)
        .ok_or("missing options")?
        .iter()
        .map(|o| o.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<Vec<_>>>()
        .ok_or("options must be strings")?;
    if options.len() != OPTION_COUNT {
        return Err(format!("expected {OPTION_COUNT} options, got {}", options.len()));
    }

    let answer = item
        .get("correctAnswer")
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or("missing correctAnswer")?;
    let correct_answer = options
        .iter()
        .find(|o| o.as_str() == answer)
        .cloned()
        .ok_or_else(|| format!("correctAnswer {answer:?} is not one of the options"))?;

    Ok(GeneratedQuestion {
        question: question.to_string(),
        options,
        correct_answer,
    })
}

/// Maps the model's report onto the results page fields. Missing fields are omitted.
pub fn shape_assessment_report(payload: &Value) -> AssessmentReport {
    let career_paths = payload
        .get("careerPaths")
        .and_then(Value::as_array)
        .map(|paths| paths.iter().filter_map(career_path_line).collect());

    let next_steps = string_list(payload, "nextSteps");
    let framework = string_list(payload, "decisionFramework");
    let next_steps = match (next_steps, framework) {
        (None, None) => None,
        (steps, framework) => {
            let mut lines = steps.unwrap_or_default();
            lines.extend(
                framework
                    .unwrap_or_default()
                    .into_iter()
                    .map(|q| format!("Consider: {q}")),
            );
            Some(lines)
        }
    };

    AssessmentReport {
        summary: payload.get("summary").and_then(Value::as_str).map(str::to_string),
        strengths: string_list(payload, "strengths"),
        career_paths,
        detailed_analysis: string_list(payload, "detailedAnalysis"),
        next_steps,
    }
}

/// `{"emerging": "Title", "description": "..."}` → `"Title (emerging): ..."`.
fn career_path_line(path: &Value) -> Option<String> {
    let (variant, title) = PATH_VARIANTS
        .iter()
        .find_map(|v| path.get(*v).and_then(Value::as_str).map(|t| (*v, t)))?;
    match path.get("description").and_then(Value::as_str) {
        Some(description) => Some(format!("{title} ({variant}): {description}")),
        None => Some(format!("{title} ({variant})")),
    }
}

fn string_list(payload: &Value, key: &str) -> Option<Vec<String>> {
    payload.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(correct: &str) -> Value {
        json!({
            "question": "Which keyword declares an immutable binding?",
            "options": ["let", "mut", "var", "const fn"],
            "correctAnswer": correct
        })
    }

    #[test]
    fn test_valid_batch_passes() {
        let questions = validate_questions(&json!([question("let"), question(" mut ")])).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].correct_answer, "mut");
    }

    #[test]
    fn test_answer_not_in_options_rejects_batch() {
        let err = validate_questions(&json!([question("let"), question("Option 5")])).unwrap_err();
        match err {
            ShapeError::InvalidItem { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("Option 5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_option_count_rejected() {
        let bad = json!([{ "question": "Q", "options": ["a", "b", "c"], "correctAnswer": "a" }]);
        assert!(matches!(
            validate_questions(&bad),
            Err(ShapeError::InvalidItem { index: 0, .. })
        ));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let no_answer = json!([{ "question": "Q", "options": ["a", "b", "c", "d"] }]);
        assert!(validate_questions(&no_answer).is_err());
        let blank_question = json!([{ "question": " ", "options": ["a", "b", "c", "d"], "correctAnswer": "a" }]);
        assert!(validate_questions(&blank_question).is_err());
    }

    #[test]
    fn test_empty_and_non_array_rejected() {
        assert_eq!(validate_questions(&json!([])), Err(ShapeError::Empty));
        assert!(matches!(
            validate_questions(&json!({"questions": []})),
            Err(ShapeError::WrongType(_))
        ));
    }

    #[test]
    fn test_report_flattens_paths_and_appends_framework() {
        let payload = json!({
            "summary": "Balanced fit.",
            "strengths": ["Curious", "Patient"],
            "careerPaths": [
                {"traditional": "Frontend Developer", "description": "Builds UIs"},
                {"emerging": "AI Product Engineer", "description": "Ships LLM features"}
            ],
            "detailedAnalysis": ["Paragraph"],
            "decisionFramework": ["What matters most?"],
            "nextSteps": ["Build a portfolio"]
        });
        let report = shape_assessment_report(&payload);
        assert_eq!(report.summary.as_deref(), Some("Balanced fit."));
        assert_eq!(
            report.career_paths.unwrap(),
            vec![
                "Frontend Developer (traditional): Builds UIs",
                "AI Product Engineer (emerging): Ships LLM features"
            ]
        );
        assert_eq!(
            report.next_steps.unwrap(),
            vec!["Build a portfolio", "Consider: What matters most?"]
        );
    }

    #[test]
    fn test_report_omits_missing_fields() {
        let report = shape_assessment_report(&json!({ "summary": "Only this" }));
        assert!(report.strengths.is_none());
        assert!(report.career_paths.is_none());
        assert!(report.next_steps.is_none());
    }

    #[test]
    fn test_report_does_not_mutate_input() {
        let payload = json!({ "nextSteps": ["a"], "decisionFramework": ["b"] });
        let before = payload.clone();
        let _ = shape_assessment_report(&payload);
        assert_eq!(payload, before);
    }

    #[test]
    fn test_path_without_known_variant_is_skipped() {
        let report = shape_assessment_report(&json!({
            "careerPaths": [{"unknown": "x", "description": "y"}, {"alternative": "Freelance"}]
        }));
        assert_eq!(report.career_paths.unwrap(), vec!["Freelance (alternative)"]);
    }
}
