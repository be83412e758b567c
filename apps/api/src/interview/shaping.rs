use serde_json::{json, Map, Value};

use crate::interview::models::{InterviewEvaluation, InterviewQuestion};
use crate::pipeline::ShapeError;

pub const FALLBACK_SCORE: f64 = 5.0;
pub const FALLBACK_FEEDBACK: &str = "We had trouble generating structured feedback for this answer. \
    Please review the ideal answer provided with the question.";
const MAX_SCORE: f64 = 10.0;

pub fn validate_interview_questions(payload: &Value) -> Result<Vec<InterviewQuestion>, ShapeError> {
    let items = payload.as_array().ok_or(ShapeError::WrongType("a question array"))?;
    if items.is_empty() {
        return Err(ShapeError::Empty);
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let field = |name: &str| {
                item.get(name)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| ShapeError::InvalidItem {
                        index,
                        reason: format!("missing {name}"),
                    })
            };
            Ok(InterviewQuestion {
                question: field("question")?,
                ideal_answer: field("idealAnswer")?,
            })
        })
        .collect()
}

/// The evaluation served when the model's answer cannot be used.
pub fn fallback_evaluation(question_count: usize) -> Value {
    let feedback: Map<String, Value> = (0..question_count)
        .map(|i| (i.to_string(), json!(FALLBACK_FEEDBACK)))
        .collect();
    json!({ "feedback": feedback, "score": FALLBACK_SCORE })
}

/// Keeps the per-question feedback and clamps the score to 0..=10.
/// Questions the model skipped get the fallback message.
pub fn shape_evaluation(payload: &Value, question_count: usize) -> InterviewEvaluation {
    let mut feedback = payload
        .get("feedback")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for i in 0..question_count {
        feedback
            .entry(i.to_string())
            .or_insert_with(|| json!(FALLBACK_FEEDBACK));
    }

    let score = payload
        .get("score")
        .and_then(|s| s.as_f64().or_else(|| s.as_str()?.trim().parse().ok()))
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, MAX_SCORE))
        .unwrap_or(FALLBACK_SCORE);

    InterviewEvaluation { feedback, score }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_need_both_fields() {
        let ok = json!([{ "question": "Q", "idealAnswer": "A" }]);
        assert_eq!(validate_interview_questions(&ok).unwrap().len(), 1);

        let missing = json!([{ "question": "Q" }]);
        assert!(matches!(
            validate_interview_questions(&missing),
            Err(ShapeError::InvalidItem { index: 0, .. })
        ));
        assert_eq!(validate_interview_questions(&json!([])), Err(ShapeError::Empty));
    }

    #[test]
    fn test_fallback_has_one_message_per_question() {
        let fallback = fallback_evaluation(3);
        assert_eq!(fallback["feedback"].as_object().unwrap().len(), 3);
        assert_eq!(fallback["score"], 5.0);
        let shaped = shape_evaluation(&fallback, 3);
        assert_eq!(shaped.score, FALLBACK_SCORE);
        assert_eq!(shaped.feedback["2"], FALLBACK_FEEDBACK);
    }

    #[test]
    fn test_score_is_clamped_and_parsed() {
        assert_eq!(shape_evaluation(&json!({ "score": 14 }), 0).score, 10.0);
        assert_eq!(shape_evaluation(&json!({ "score": -2 }), 0).score, 0.0);
        assert_eq!(shape_evaluation(&json!({ "score": "7.5" }), 0).score, 7.5);
        assert_eq!(shape_evaluation(&json!({ "score": "great" }), 0).score, FALLBACK_SCORE);
    }

    #[test]
    fn test_structured_feedback_is_kept_and_gaps_filled() {
        let payload = json!({
            "feedback": { "0": { "strengths": "Clear", "weaknesses": "Brief" } },
            "score": 8
        });
        let shaped = shape_evaluation(&payload, 2);
        assert_eq!(shaped.feedback["0"]["strengths"], "Clear");
        assert_eq!(shaped.feedback["1"], FALLBACK_FEEDBACK);
        assert_eq!(shaped.score, 8.0);
    }
}
