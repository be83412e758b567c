use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Longest career guidance text the profile will hold.
pub const MAX_CAREER_GUIDANCE_CHARS: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub mail_id: String,
    pub username: String,
    pub domain: String,
    pub other_domain: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub skills: Vec<String>,
    /// skill → score in 0..=100
    pub skill_scores: Json<BTreeMap<String, f64>>,
    #[serde(skip_serializing)]
    pub career_guidance: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Skills that have no recorded score yet.
    pub fn unscored_skills(&self) -> Vec<&str> {
        self.skills
            .iter()
            .filter(|s| !self.skill_scores.0.contains_key(s.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// A validated profile ready to be created or replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub mail_id: String,
    pub username: String,
    pub domain: String,
    pub other_domain: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub skills: Vec<String>,
}

/// Partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub domain: Option<String>,
    pub other_domain: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// What the profile page reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub username: String,
    pub mail_id: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub skills: Vec<String>,
    pub skill_scores: BTreeMap<String, f64>,
    pub has_career_guidance: bool,
}

impl From<UserProfile> for ProfileView {
    fn from(user: UserProfile) -> Self {
        Self {
            has_career_guidance: user.career_guidance.as_deref().is_some_and(|g| !g.is_empty()),
            username: user.username,
            mail_id: user.mail_id,
            domain: user.domain,
            other_domain: user.other_domain,
            country: user.country,
            state: user.state,
            skills: user.skills,
            skill_scores: user.skill_scores.0,
        }
    }
}

#[cfg(test)]
pub fn sample_profile(mail_id: &str) -> UserProfile {
    let now = Utc::now();
    UserProfile {
        id: Uuid::new_v4(),
        mail_id: mail_id.to_string(),
        username: "ada".to_string(),
        domain: "web".to_string(),
        other_domain: None,
        country: Some("India".to_string()),
        state: Some("Karnataka".to_string()),
        skills: vec!["React".to_string(), "Rust".to_string()],
        skill_scores: Json(BTreeMap::new()),
        career_guidance: None,
        created_at: now,
        updated_at: now,
    }
}
