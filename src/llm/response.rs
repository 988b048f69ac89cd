//! Model reply parsing
//!
//! The prompts ask for a bare JSON object, but models routinely wrap the
//! reply in markdown code fences or surround it with prose. This module digs
//! the JSON object out of whatever came back.

use crate::llm::provider::LlmError;
use serde_json::Value;

/// Extract and parse the JSON object from a model reply
///
/// Handles three shapes: a bare JSON object, a ```json fenced block, and a
/// JSON object embedded in surrounding prose. Errors when no parseable
/// object can be found.
pub fn extract_json(raw: &str) -> Result<Value, LlmError> {
    let trimmed = raw.trim();

    // Bare JSON first
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() || value.is_array() {
            return Ok(value);
        }
    }

    // Fenced block: take the contents of the first fence
    if let Some(inner) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(inner.trim()) {
            return Ok(value);
        }
    }

    // Last resort: outermost braces
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(LlmError::MalformedReply(snippet(trimmed)))
}

/// Contents of the first markdown code fence, if any
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // skip the language tag on the opening fence line
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

fn snippet(text: &str) -> String {
    const MAX: usize = 120;
    if text.len() <= MAX {
        text.to_string()
    } else {
        let mut end = MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
