//! Defensive recovery of JSON from model output.
//!
//! Tiers, in order: direct parse, fence-stripped parse, balanced-bracket scan.
//! The first tier that yields a value of the expected shape wins. Nothing here
//! panics or returns an error; unrecoverable input degrades to the fallback.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// The JSON shape a caller expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
    Any,
}

impl Shape {
    /// Expected shape implied by a fallback value.
    pub fn of(fallback: &Value) -> Self {
        match fallback {
            Value::Object(_) => Shape::Object,
            Value::Array(_) => Shape::Array,
            _ => Shape::Any,
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Shape::Object => value.is_object(),
            Shape::Array => value.is_array(),
            Shape::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Direct,
    Fenced,
    Bracketed,
}

/// A value recovered from model text, with the exact span that was parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<'a> {
    pub value: Value,
    pub span: &'a str,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    pub ok: bool,
    pub value: Value,
    pub raw: String,
}

/// Tagged view of model output.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Json(Value),
    /// Prose with no structured content.
    Text(String),
    /// Empty, or looks structured but cannot be recovered.
    Malformed,
}

pub fn extract(raw: &str, shape: Shape) -> Option<Extracted<'_>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // A complete document of the wrong shape is a mismatch, not a container to search.
    if let Some(value) = parse_any(trimmed) {
        return shape.accepts(&value).then_some(Extracted {
            value,
            span: trimmed,
            tier: Tier::Direct,
        });
    }

    if let Some(inner) = strip_fences(trimmed) {
        if let Some(value) = parse_any(inner) {
            return shape.accepts(&value).then_some(Extracted {
                value,
                span: inner,
                tier: Tier::Fenced,
            });
        }
    }

    scan_brackets(trimmed, shape)
}

/// Recovers a JSON value of the fallback's shape, or returns the fallback with `ok: false`.
pub fn normalize(raw: &str, fallback: Value) -> Normalized {
    match extract(raw, Shape::of(&fallback)) {
        Some(found) => Normalized {
            ok: true,
            raw: found.span.to_string(),
            value: found.value,
        },
        None => Normalized {
            ok: false,
            value: fallback,
            raw: raw.to_string(),
        },
    }
}

pub fn interpret(raw: &str, shape: Shape) -> ModelOutput {
    if let Some(found) = extract(raw, shape) {
        if found.tier != Tier::Direct {
            debug!("Recovered JSON from model output via {:?} tier", found.tier);
        }
        return ModelOutput::Json(found.value);
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() || looks_structured(trimmed) {
        ModelOutput::Malformed
    } else {
        ModelOutput::Text(trimmed.to_string())
    }
}

fn looks_structured(text: &str) -> bool {
    text.starts_with("```") || text.starts_with('{') || text.starts_with('[')
}

fn parse_any(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok()
}

/// Returns the body of a fenced block (```` ```json ```` or bare ```` ``` ````).
fn strip_fences(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    // Info string runs to the end of the opening line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    Some(body.trim())
}

/// Tries every `{` / `[` in order and returns the first balanced span that parses
/// to the expected shape. A span that parses to another shape is skipped whole, so
/// nothing nested inside it is returned.
fn scan_brackets(text: &str, shape: Shape) -> Option<Extracted<'_>> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !matches!(bytes[start], b'{' | b'[') {
            start += 1;
            continue;
        }
        let Some(end) = balanced_end(bytes, start) else {
            start += 1;
            continue;
        };
        let span = &text[start..=end];
        match parse_any(span) {
            Some(value) if shape.accepts(&value) => {
                return Some(Extracted {
                    value,
                    span,
                    tier: Tier::Bracketed,
                });
            }
            Some(_) => start = end + 1,
            None => start += 1,
        }
    }
    None
}

/// Index of the bracket closing the one at `start`, skipping string contents.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                if stack.pop() != Some(b) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
