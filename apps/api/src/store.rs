//! Persistence for user profiles and product feedback.
//!
//! Handlers depend on the `Store` trait; `PgStore` is the PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::feedback::{FeedbackRow, NewFeedback};
use crate::models::user::{NewProfile, ProfileUpdate, UserProfile, MAX_CAREER_GUIDANCE_CHARS};

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, mail_id: &str) -> Result<Option<UserProfile>, AppError>;

    /// Creates the profile, or replaces the editable fields of an existing one.
    /// Returns the stored profile and whether it was newly created.
    async fn upsert_user(&self, profile: NewProfile) -> Result<(UserProfile, bool), AppError>;

    async fn update_user(
        &self,
        mail_id: &str,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError>;

    /// Returns `false` when no such user exists.
    async fn set_skill_score(&self, mail_id: &str, skill: &str, score: f64)
        -> Result<bool, AppError>;

    /// Write-once: stores `guidance` only if the user has none yet and returns the
    /// text that ends up stored. `None` when no such user exists.
    async fn store_career_guidance_if_absent(
        &self,
        mail_id: &str,
        guidance: &str,
    ) -> Result<Option<String>, AppError>;

    async fn insert_feedback(&self, feedback: NewFeedback) -> Result<FeedbackRow, AppError>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    profile: UserProfile,
    created: bool,
}

/// Turns unique-key and CHECK violations into messages the client can act on.
fn map_constraint_violation(e: sqlx::Error) -> AppError {
    let mapped = e
        .as_database_error()
        .and_then(|db| constraint_error(db.kind(), db.constraint(), db.message()));
    mapped.unwrap_or(AppError::Database(e))
}

fn constraint_error(kind: ErrorKind, constraint: Option<&str>, message: &str) -> Option<AppError> {
    let text = match (kind, constraint) {
        (ErrorKind::UniqueViolation, Some("user_profiles_username_key")) => "Username already exists",
        (ErrorKind::UniqueViolation, Some("user_profiles_mail_id_key")) => "Email already exists",
        (ErrorKind::CheckViolation, Some("user_profiles_other_domain_check")) => {
            "otherDomain is required when domain is other"
        }
        (ErrorKind::CheckViolation, Some("user_profiles_username_check")) => {
            "Username must be at least 3 characters long"
        }
        (ErrorKind::CheckViolation, Some("user_profiles_domain_check")) => {
            "Domain is not a valid domain option"
        }
        (ErrorKind::CheckViolation, Some("user_profiles_career_guidance_check")) => {
            "Career guidance cannot exceed 50000 characters"
        }
        (ErrorKind::CheckViolation, _) => message,
        _ => return None,
    };
    Some(AppError::Persistence(text.to_string()))
}

fn check_guidance_length(guidance: &str) -> Result<(), AppError> {
    if guidance.chars().count() > MAX_CAREER_GUIDANCE_CHARS {
        return Err(AppError::Persistence(format!(
            "Career guidance cannot exceed {MAX_CAREER_GUIDANCE_CHARS} characters"
        )));
    }
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, mail_id: &str) -> Result<Option<UserProfile>, AppError> {
        let user = sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE mail_id = $1")
            .bind(mail_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn upsert_user(&self, profile: NewProfile) -> Result<(UserProfile, bool), AppError> {
        let row = sqlx::query_as::<_, UpsertedRow>(
            r#"
            INSERT INTO user_profiles (mail_id, username, domain, other_domain, country, state, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (mail_id) DO UPDATE
            SET username     = EXCLUDED.username,
                domain       = EXCLUDED.domain,
                other_domain = EXCLUDED.other_domain,
                country      = EXCLUDED.country,
                state        = EXCLUDED.state,
                skills       = EXCLUDED.skills,
                updated_at   = now()
            RETURNING *, (xmax = 0) AS created
            "#,
        )
        .bind(&profile.mail_id)
        .bind(&profile.username)
        .bind(&profile.domain)
        .bind(&profile.other_domain)
        .bind(&profile.country)
        .bind(&profile.state)
        .bind(&profile.skills)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)?;

        info!(
            "{} profile for {}",
            if row.created { "Created" } else { "Updated" },
            profile.mail_id
        );
        Ok((row.profile, row.created))
    }

    async fn update_user(
        &self,
        mail_id: &str,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError> {
        // otherDomain only survives while the domain is "other".
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET domain       = COALESCE($2, domain),
                other_domain = CASE WHEN COALESCE($2, domain) = 'other'
                                    THEN COALESCE($3, other_domain)
                                    ELSE NULL END,
                skills       = COALESCE($4, skills),
                updated_at   = now()
            WHERE mail_id = $1
            RETURNING *
            "#,
        )
        .bind(mail_id)
        .bind(&update.domain)
        .bind(&update.other_domain)
        .bind(&update.skills)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)?;
        Ok(user)
    }

    async fn set_skill_score(
        &self,
        mail_id: &str,
        skill: &str,
        score: f64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET skill_scores = skill_scores || jsonb_build_object($2::text, $3::float8),
                updated_at   = now()
            WHERE mail_id = $1
            "#,
        )
        .bind(mail_id)
        .bind(skill)
        .bind(score)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn store_career_guidance_if_absent(
        &self,
        mail_id: &str,
        guidance: &str,
    ) -> Result<Option<String>, AppError> {
        check_guidance_length(guidance)?;

        let stored: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE user_profiles
            SET career_guidance = $2, updated_at = now()
            WHERE mail_id = $1 AND career_guidance IS NULL
            RETURNING career_guidance
            "#,
        )
        .bind(mail_id)
        .bind(guidance)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)?;
        if stored.is_some() {
            return Ok(stored);
        }

        // Lost the race, or the user is gone: read whatever is there now.
        let existing: Option<Option<String>> =
            sqlx::query_scalar("SELECT career_guidance FROM user_profiles WHERE mail_id = $1")
                .bind(mail_id)
                .fetch_optional(&self.pool)
                .await?;
        match existing {
            None => Ok(None),
            Some(Some(text)) => Ok(Some(text)),
            Some(None) => Err(AppError::Persistence(
                "Failed to save career guidance to database".to_string(),
            )),
        }
    }

    async fn insert_feedback(&self, feedback: NewFeedback) -> Result<FeedbackRow, AppError> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            "INSERT INTO feedback (section, stars, comment) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&feedback.section)
        .bind(feedback.stars)
        .bind(&feedback.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)?;
        Ok(row)
    }
}

#[cfg(test)]
pub use memory::InMemoryUserStore;

#[cfg(test)]
mod memory {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    use super::*;

    /// Map-backed store with the same write-once and uniqueness rules as `PgStore`.
    #[derive(Default)]
    pub struct InMemoryUserStore {
        users: Mutex<BTreeMap<String, UserProfile>>,
        feedback: Mutex<Vec<FeedbackRow>>,
    }

    impl InMemoryUserStore {
        pub fn with_user(user: UserProfile) -> Self {
            let store = Self::default();
            store.users.lock().unwrap().insert(user.mail_id.clone(), user);
            store
        }

        pub fn user(&self, mail_id: &str) -> Option<UserProfile> {
            self.users.lock().unwrap().get(mail_id).cloned()
        }

        pub fn feedback(&self) -> Vec<FeedbackRow> {
            self.feedback.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Store for InMemoryUserStore {
        async fn find_user(&self, mail_id: &str) -> Result<Option<UserProfile>, AppError> {
            Ok(self.user(mail_id))
        }

        async fn upsert_user(&self, profile: NewProfile) -> Result<(UserProfile, bool), AppError> {
            let mut users = self.users.lock().unwrap();
            let taken = users
                .values()
                .any(|u| u.username == profile.username && u.mail_id != profile.mail_id);
            if taken {
                return Err(AppError::Persistence("Username already exists".to_string()));
            }

            let now = Utc::now();
            let created = !users.contains_key(&profile.mail_id);
            let entry = users.entry(profile.mail_id.clone()).or_insert_with(|| UserProfile {
                id: Uuid::new_v4(),
                mail_id: profile.mail_id.clone(),
                username: String::new(),
                domain: String::new(),
                other_domain: None,
                country: None,
                state: None,
                skills: Vec::new(),
                skill_scores: Json(BTreeMap::new()),
                career_guidance: None,
                created_at: now,
                updated_at: now,
            });
            entry.username = profile.username;
            entry.domain = profile.domain;
            entry.other_domain = profile.other_domain;
            entry.country = profile.country;
            entry.state = profile.state;
            entry.skills = profile.skills;
            entry.updated_at = now;
            Ok((entry.clone(), created))
        }

        async fn update_user(
            &self,
            mail_id: &str,
            update: ProfileUpdate,
        ) -> Result<Option<UserProfile>, AppError> {
            let mut users = self.users.lock().unwrap();
            let Some(user) = users.get_mut(mail_id) else {
                return Ok(None);
            };
            if let Some(domain) = update.domain {
                user.domain = domain;
            }
            user.other_domain = if user.domain == "other" {
                update.other_domain.or(user.other_domain.take())
            } else {
                None
            };
            if let Some(skills) = update.skills {
                user.skills = skills;
            }
            user.updated_at = Utc::now();
            Ok(Some(user.clone()))
        }

        async fn set_skill_score(
            &self,
            mail_id: &str,
            skill: &str,
            score: f64,
        ) -> Result<bool, AppError> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(mail_id) {
                Some(user) => {
                    user.skill_scores.0.insert(skill.to_string(), score);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn store_career_guidance_if_absent(
            &self,
            mail_id: &str,
            guidance: &str,
        ) -> Result<Option<String>, AppError> {
            check_guidance_length(guidance)?;
            let mut users = self.users.lock().unwrap();
            Ok(users.get_mut(mail_id).map(|user| {
                user.career_guidance
                    .get_or_insert_with(|| guidance.to_string())
                    .clone()
            }))
        }

        async fn insert_feedback(&self, feedback: NewFeedback) -> Result<FeedbackRow, AppError> {
            let row = FeedbackRow {
                id: Uuid::new_v4(),
                section: feedback.section,
                stars: feedback.stars,
                comment: feedback.comment,
                created_at: Utc::now(),
            };
            self.feedback.lock().unwrap().push(row.clone());
            Ok(row)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::sample_profile;

    fn new_profile(mail_id: &str, username: &str) -> NewProfile {
        NewProfile {
            mail_id: mail_id.to_string(),
            username: username.to_string(),
            domain: "web".to_string(),
            other_domain: None,
            country: None,
            state: None,
            skills: vec!["Rust".to_string()],
        }
    }

    fn persistence_message(err: Option<AppError>) -> String {
        match err {
            Some(AppError::Persistence(msg)) => msg,
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_check_violations_become_persistence_errors() {
        let other_domain = constraint_error(
            ErrorKind::CheckViolation,
            Some("user_profiles_other_domain_check"),
            "new row violates check constraint",
        );
        assert_eq!(
            persistence_message(other_domain),
            "otherDomain is required when domain is other"
        );

        let unnamed = constraint_error(
            ErrorKind::CheckViolation,
            Some("feedback_stars_check"),
            "new row for relation \"feedback\" violates check constraint",
        );
        assert!(persistence_message(unnamed).contains("violates check constraint"));
    }

    #[test]
    fn test_unique_violations_name_the_field() {
        let taken = constraint_error(
            ErrorKind::UniqueViolation,
            Some("user_profiles_username_key"),
            "duplicate key",
        );
        assert_eq!(persistence_message(taken), "Username already exists");
    }

    #[test]
    fn test_other_database_errors_are_not_mapped() {
        assert!(constraint_error(ErrorKind::ForeignKeyViolation, None, "fk").is_none());
        assert!(constraint_error(ErrorKind::UniqueViolation, Some("unknown_key"), "dup").is_none());
    }

    #[tokio::test]
    async fn test_career_guidance_is_write_once() {
        let store = InMemoryUserStore::with_user(sample_profile("ada@example.com"));
        let first = store
            .store_career_guidance_if_absent("ada@example.com", "first")
            .await
            .unwrap();
        let second = store
            .store_career_guidance_if_absent("ada@example.com", "second")
            .await
            .unwrap();
        assert_eq!(first.as_deref(), Some("first"));
        assert_eq!(second.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_career_guidance_length_limit() {
        let store = InMemoryUserStore::with_user(sample_profile("ada@example.com"));
        let long = "x".repeat(MAX_CAREER_GUIDANCE_CHARS + 1);
        let err = store
            .store_career_guidance_if_absent("ada@example.com", &long)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert!(store.user("ada@example.com").unwrap().career_guidance.is_none());
    }

    #[tokio::test]
    async fn test_upsert_reports_creation_and_rejects_taken_username() {
        let store = InMemoryUserStore::default();
        let (_, created) = store.upsert_user(new_profile("a@x.io", "ada")).await.unwrap();
        assert!(created);
        let (_, created) = store.upsert_user(new_profile("a@x.io", "ada")).await.unwrap();
        assert!(!created);

        let err = store.upsert_user(new_profile("b@x.io", "ada")).await.unwrap_err();
        match err {
            AppError::Persistence(msg) => assert_eq!(msg, "Username already exists"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_clears_other_domain_when_domain_changes() {
        let mut user = sample_profile("ada@example.com");
        user.domain = "other".to_string();
        user.other_domain = Some("gamedev".to_string());
        let store = InMemoryUserStore::with_user(user);

        let updated = store
            .update_user(
                "ada@example.com",
                ProfileUpdate {
                    domain: Some("app".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.domain, "app");
        assert!(updated.other_domain.is_none());
    }

    #[tokio::test]
    async fn test_skill_score_for_missing_user() {
        let store = InMemoryUserStore::default();
        assert!(!store.set_skill_score("nobody@x.io", "Rust", 50.0).await.unwrap());
    }
}
