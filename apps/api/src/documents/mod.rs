//! Document feedback: resume vs. job description, LinkedIn profile review, cover letters.

pub mod contact;
pub mod handlers;
pub mod models;
pub mod prompts;
