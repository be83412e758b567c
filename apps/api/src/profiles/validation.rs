//! Request bodies for the profile endpoints and the rules they must meet.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::{NewProfile, ProfileUpdate};

pub const DOMAINS: [&str; 4] = ["web", "app", "blockchain", "other"];
const MIN_USERNAME_CHARS: usize = 3;
const MIN_PLACE_CHARS: usize = 2;
const MAX_SCORE: f64 = 100.0;

/// Body of `POST /api/v1/users`. The e-mail always comes from the session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub username: Option<String>,
    pub domain: Option<String>,
    pub other_domain: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Body of `PATCH /api/v1/users/me`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateInput {
    pub domain: Option<String>,
    pub other_domain: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillScoreInput {
    pub skill: Option<String>,
    pub score: Option<f64>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims, drops blanks and removes duplicates, keeping first occurrence order.
pub fn clean_skills(skills: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim();
        if !skill.is_empty() && !cleaned.iter().any(|s| s == skill) {
            cleaned.push(skill.to_string());
        }
    }
    cleaned
}

fn check_domain(domain: &str, other_domain: Option<&str>, errors: &mut Vec<String>) {
    if !DOMAINS.contains(&domain) {
        errors.push(format!("{domain} is not a valid domain option"));
    } else if domain == "other" && other_domain.is_none() {
        errors.push("otherDomain is required when domain is other".to_string());
    }
}

fn into_result<T>(value: T, errors: Vec<String>) -> Result<T, AppError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::Validation(errors.join(", ")))
    }
}

pub fn validate_profile(mail_id: &str, input: ProfileInput) -> Result<NewProfile, AppError> {
    let mut errors = Vec::new();

    let username = trimmed(input.username).unwrap_or_default();
    if username.is_empty() {
        errors.push("Username is required".to_string());
    } else if username.chars().count() < MIN_USERNAME_CHARS {
        errors.push(format!(
            "Username must be at least {MIN_USERNAME_CHARS} characters long"
        ));
    }

    let domain = trimmed(input.domain).unwrap_or_default();
    let other_domain = trimmed(input.other_domain);
    if domain.is_empty() {
        errors.push("Domain is required".to_string());
    } else {
        check_domain(&domain, other_domain.as_deref(), &mut errors);
    }

    let country = trimmed(input.country);
    let state = trimmed(input.state);
    for (label, value) in [("Country", &country), ("State", &state)] {
        if value.as_ref().is_some_and(|v| v.chars().count() < MIN_PLACE_CHARS) {
            errors.push(format!("{label} must be at least {MIN_PLACE_CHARS} characters long"));
        }
    }

    let profile = NewProfile {
        mail_id: mail_id.to_string(),
        username,
        other_domain: if domain == "other" { other_domain } else { None },
        domain,
        country,
        state,
        skills: clean_skills(input.skills),
    };
    into_result(profile, errors)
}

pub fn validate_update(input: ProfileUpdateInput) -> Result<ProfileUpdate, AppError> {
    let mut errors = Vec::new();
    let domain = trimmed(input.domain);
    let other_domain = trimmed(input.other_domain);
    if let Some(domain) = &domain {
        check_domain(domain, other_domain.as_deref(), &mut errors);
    }
    let update = ProfileUpdate {
        domain,
        other_domain,
        skills: input.skills.map(clean_skills),
    };
    into_result(update, errors)
}

pub fn validate_score(input: SkillScoreInput) -> Result<(String, f64), AppError> {
    match (trimmed(input.skill), input.score) {
        (Some(skill), Some(score)) if (0.0..=MAX_SCORE).contains(&score) => Ok((skill, score)),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "Score must be between 0 and 100".to_string(),
        )),
        _ => Err(AppError::Validation("Invalid input".to_string())),
    }
}
