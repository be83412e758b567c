use crate::documents::models::ApplicantInfo;

pub const DEFAULT_APPLICANT_NAME: &str = "Applicant Name";
pub const DEFAULT_APPLICANT_EMAIL: &str = "applicant@example.com";

impl Default for ApplicantInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_APPLICANT_NAME.to_string(),
            email: DEFAULT_APPLICANT_EMAIL.to_string(),
        }
    }
}

/// Reads `Name: ...` / `Email: ...` lines; each missing value falls back to its default.
pub fn parse_contact_info(text: &str) -> ApplicantInfo {
    let value_after = |label: &str| {
        text.lines()
            .filter_map(|line| {
                let line = line.trim().trim_start_matches(['-', '*', ' ']);
                let (key, value) = line.split_once(':')?;
                (key.trim().trim_matches('*').eq_ignore_ascii_case(label))
                    .then(|| value.trim().trim_matches('*').trim().to_string())
            })
            .find(|v| !v.is_empty())
    };

    let defaults = ApplicantInfo::default();
    ApplicantInfo {
        name: value_after("name").unwrap_or(defaults.name),
        email: value_after("email").unwrap_or(defaults.email),
    }
}
