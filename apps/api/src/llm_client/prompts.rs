// Shared prompt fragments and generation presets.
// Each feature that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces only.

use crate::llm_client::GenerationConfig;

/// Appended to system instructions whose answer must be bare JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Return VALID JSON only. \
    Do NOT include any text outside the JSON structure. \
    Do NOT wrap the response in markdown code fences. \
    Do NOT include explanations or apologies.";

pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// High-variety sampling for question generation.
pub fn creative_config() -> GenerationConfig {
    GenerationConfig {
        temperature: Some(0.9),
        top_p: Some(1.0),
        top_k: Some(32),
        max_output_tokens: Some(MAX_OUTPUT_TOKENS),
        response_mime_type: None,
    }
}

/// Plain-text answers for long-form document feedback.
pub fn plain_text_config(temperature: f32) -> GenerationConfig {
    GenerationConfig {
        temperature: Some(temperature),
        top_p: Some(0.95),
        top_k: Some(40),
        max_output_tokens: Some(MAX_OUTPUT_TOKENS),
        response_mime_type: Some("text/plain".to_string()),
    }
}
