use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query for `GET /api/v1/questions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillQuizQuery {
    pub skill: Option<String>,
}

/// Query for `GET /api/v1/assessment/questions`. `skill` names the assessment category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryQuestionsQuery {
    pub skill: Option<String>,
    pub domain: Option<String>,
}

/// Body of `POST /api/v1/assessment/analyze`.
/// Response keys are `"<category>_<index>"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentRequest {
    pub domain: Option<String>,
    pub categories: Option<Vec<String>>,
    pub responses: Option<BTreeMap<String, String>>,
}

/// A multiple-choice question as served to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<GeneratedQuestion>,
}

/// The report shape the results page renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub results: AssessmentReport,
}

/// Groups `"<category>_<index>"` answers by category, ordered by index.
///
/// Every listed category gets an entry (possibly empty). Keys naming an unknown
/// category, or whose index is not a number, are dropped.
pub fn group_responses<'a>(
    categories: &[String],
    responses: &'a BTreeMap<String, String>,
) -> Vec<(String, Vec<&'a str>)> {
    let mut indexed: Vec<(&str, u32, &str)> = responses
        .iter()
        .filter_map(|(key, answer)| {
            let (category, index) = key.rsplit_once('_')?;
            let index = index.parse::<u32>().ok()?;
            Some((category, index, answer.as_str()))
        })
        .collect();
    indexed.sort_by_key(|(_, index, _)| *index);

    categories
        .iter()
        .map(|category| {
            let answers = indexed
                .iter()
                .filter(|(c, _, _)| *c == category.as_str())
                .map(|(_, _, answer)| *answer)
                .collect();
            (category.clone(), answers)
        })
        .collect()
}
