//! Mock interviews: question generation, answer evaluation and spoken-answer transcription.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod shaping;
