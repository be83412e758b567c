// Prompt template for the cached career guidance report.

use crate::models::user::UserProfile;
use crate::pipeline::prompt::{fill, require, BuildPrompt, Prompt, PromptError, PromptKind};

pub const CAREER_GUIDANCE_TEMPLATE: &str = r#"Act as a career counselor with extensive experience in technology and professional development.

Personal Information:
Name: {name}
Domain of Interest: {domain}
Country: {country}
State: {state}

Current Skills and Proficiency (out of 100):
{skills}

Please provide a detailed career guidance report with the following sections:

1. Career Profile Analysis
- Analyze the current skill set and its relevance in the specified domain
- Identify key strengths and areas of competitive advantage
- Consider geographical and market-specific factors based on the user's location

2. Recommended Career Paths
List at least 3 specific job roles/positions that align with the skill set. For each role, provide:
- Required experience level
- Expected salary range in the specified country
- Market demand (high/medium/low) with supporting reasons
- Growth potential over the next 5 years

3. Skill Development Roadmap
- Identify skill gaps for each recommended career path
- Provide a prioritized list of skills to acquire
- Recommend specific certifications or training programs
- Include timeline estimates for skill acquisition

4. Career Progression Timeline
Create a 5-year career progression roadmap with:
- Short-term goals (1 year)
- Mid-term goals (2-3 years)
- Long-term goals (4-5 years)
Include potential roles and positions at each stage
Suggest key milestones and achievements to target

5. Additional Recommendations
- Networking opportunities and professional communities to join
- Industry-specific events or conferences
- Portfolio development suggestions
- Personal branding strategies

Please provide detailed, actionable insights that take into account the individual's background, current location, and market conditions. Include specific examples and resources where applicable."#;

const NOT_SPECIFIED: &str = "Not specified";

/// A stored profile as the input of a guidance report.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceProfile<'a>(pub &'a UserProfile);

impl BuildPrompt for GuidanceProfile<'_> {
    fn kind(&self) -> PromptKind {
        PromptKind::CareerGuidance
    }

    fn build(&self) -> Result<Prompt, PromptError> {
        let user = self.0;
        let name = require(Some(user.username.as_str()), "username")?;
        let domain = match user.other_domain.as_deref().map(str::trim) {
            Some(other) if !other.is_empty() => format!("{} ({other})", user.domain),
            _ => user.domain.clone(),
        };
        let skills = user
            .skill_scores
            .0
            .iter()
            .map(|(skill, score)| format!("{skill}: {score}/100"))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Prompt::new(fill(
            CAREER_GUIDANCE_TEMPLATE,
            &[
                ("name", name),
                ("domain", &domain),
                ("country", user.country.as_deref().unwrap_or(NOT_SPECIFIED)),
                ("state", user.state.as_deref().unwrap_or(NOT_SPECIFIED)),
                ("skills", &skills),
            ],
        )))
    }
}
