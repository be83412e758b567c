use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::gemini;
use crate::llm_client::staging::PollPolicy;
use crate::speech;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub poll_policy: PollPolicy,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let poll_policy = PollPolicy {
            interval: Duration::from_secs(parse_env("FILE_POLL_INTERVAL_SECS", 10)?),
            max_attempts: parse_env("FILE_POLL_MAX_ATTEMPTS", 30)?,
        };
        let explicit_timeout = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(_) => Some(parse_env("REQUEST_TIMEOUT_SECS", 0u64)?),
            Err(_) => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_base_url: env_or("GEMINI_BASE_URL", gemini::DEFAULT_BASE_URL),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            openai_base_url: env_or("OPENAI_BASE_URL", speech::DEFAULT_BASE_URL),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            request_timeout: request_timeout(explicit_timeout, poll_policy)?,
            poll_policy,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

/// Time a document request may spend outside file polling: the upload plus the
/// model calls that follow it.
const UPLOAD_AND_GENERATION_MARGIN: Duration = Duration::from_secs(240);

/// Longest time file staging may poll before giving up.
fn poll_window(policy: PollPolicy) -> Duration {
    policy.interval.saturating_mul(policy.max_attempts)
}

/// The request timeout must outlast file polling, so a slow upload ends in an
/// upload error instead of a cut connection. Unset means poll window plus margin.
fn request_timeout(explicit_secs: Option<u64>, policy: PollPolicy) -> Result<Duration> {
    let minimum = poll_window(policy).saturating_add(UPLOAD_AND_GENERATION_MARGIN);
    match explicit_secs.map(Duration::from_secs) {
        None => Ok(minimum),
        Some(timeout) if timeout >= minimum => Ok(timeout),
        Some(timeout) => bail!(
            "REQUEST_TIMEOUT_SECS ({}) must be at least {} seconds: file polling may take {} seconds",
            timeout.as_secs(),
            minimum.as_secs(),
            poll_window(policy).as_secs()
        ),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("PATHFINDER_TEST_UNSET_VAR", 30).unwrap();
        assert_eq!(value, 30);
    }

    #[test]
    fn test_request_timeout_defaults_past_poll_window() {
        let timeout = request_timeout(None, PollPolicy::default()).unwrap();
        assert_eq!(timeout, Duration::from_secs(300 + 240));
        assert!(timeout > poll_window(PollPolicy::default()));
    }

    #[test]
    fn test_request_timeout_shorter_than_polling_is_rejected() {
        let err = request_timeout(Some(300), PollPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("at least 540 seconds"));
        assert_eq!(
            request_timeout(Some(900), PollPolicy::default()).unwrap(),
            Duration::from_secs(900)
        );
    }

    #[test]
    fn test_request_timeout_follows_custom_poll_policy() {
        let policy = PollPolicy {
            interval: Duration::from_secs(2),
            max_attempts: 5,
        };
        assert_eq!(
            request_timeout(None, policy).unwrap(),
            Duration::from_secs(10 + 240)
        );
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("PATHFINDER_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("PATHFINDER_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("PATHFINDER_TEST_BAD_PORT");
    }
}
