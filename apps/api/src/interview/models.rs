use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Role, stack and years of experience the interview is tailored to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSetup {
    pub role: Option<String>,
    pub tech_stack: Option<String>,
    /// The UI forwards this from a query string, so it may arrive as text or a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub experience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
    pub ideal_answer: String,
}

/// Answers keyed by question index (`{"0": "..."}`) or given positionally.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Answers {
    ByIndex(BTreeMap<String, String>),
    List(Vec<Option<String>>),
}

impl Default for Answers {
    fn default() -> Self {
        Answers::ByIndex(BTreeMap::new())
    }
}

impl Answers {
    /// The non-blank answer to question `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        let answer = match self {
            Answers::ByIndex(map) => map.get(&index.to_string()).map(String::as_str),
            Answers::List(list) => list.get(index).and_then(|a| a.as_deref()),
        };
        answer.map(str::trim).filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationRequest {
    #[serde(flatten)]
    pub setup: InterviewSetup,
    pub questions: Option<Vec<InterviewQuestion>>,
    #[serde(default)]
    pub answers: Answers,
}

#[derive(Debug, Serialize)]
pub struct InterviewQuestionsResponse {
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewEvaluation {
    /// Per-question feedback keyed by index; a structured item or a plain message.
    pub feedback: serde_json::Map<String, Value>,
    pub score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionResponse {
    pub transcription: String,
    pub question_id: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
