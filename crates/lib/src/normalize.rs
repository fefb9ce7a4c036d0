//! # Response Normalization
//!
//! Models regularly wrap their output in markdown code fences even when the
//! prompt forbids it. This module strips one such wrapper and performs a
//! strict JSON parse, keeping the offending text around when the parse fails
//! so callers can surface it for diagnostics.

use crate::errors::ExtractError;
use regex::Regex;
use serde_json::Value;

/// Strips a single ```json ... ``` (or bare ```) wrapper and surrounding
/// whitespace, then parses the remainder as JSON.
///
/// A parse failure is always reported; no default object is substituted.
pub fn normalize(raw: &str) -> Result<Value, ExtractError> {
    let cleaned = strip_code_fences(raw)?;

    serde_json::from_str(cleaned).map_err(|e| ExtractError::Parse {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Extracts the contents of a fenced code block, or returns the trimmed
/// input when no fence is present.
fn strip_code_fences(raw: &str) -> Result<&str, ExtractError> {
    let re = Regex::new(r"```(?:json)?\n?([\s\S]*?)```")?;
    let cleaned = re
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
        .trim();
    Ok(cleaned)
}
