//! Career assessment: skill quizzes, category questions and report analysis.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod shaping;
