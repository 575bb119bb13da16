//! Response normalization
//!
//! Third-party shorteners and file hosts name their result field differently.
//! Each call kind has a fixed, ranked list of candidate keys; the first key
//! present in the response wins, regardless of the order keys appear in the
//! JSON body.

use serde_json::Value;

/// Result keys tried, in order, on a shortener response
pub const SHORTEN_RESULT_KEYS: &[&str] = &["shortenedUrl", "shorturl", "short_url", "url", "link"];

/// Result keys tried, in order, on an uploader response
pub const UPLOAD_RESULT_KEYS: &[&str] = &["url", "link", "download_url", "file_url"];

/// Extract the value of the highest-priority candidate key.
///
/// The first candidate present in the object decides the outcome. A non-empty
/// string comes back verbatim, a number or `true` as its JSON text. An empty
/// string, `null`, `false`, an array or an object means no usable result, and
/// lower-ranked keys are not consulted. Returns `None` for non-object input.
pub fn normalize(body: &Value, candidate_keys: &[&str]) -> Option<String> {
    let object = body.as_object()?;
    let value = candidate_keys.iter().find_map(|key| object.get(*key))?;

    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Short, single-line rendering of a payload for diagnostics
pub fn summarize_payload(body: &Value) -> String {
    const MAX_CHARS: usize = 200;

    let text = body.to_string();
    if text.chars().count() <= MAX_CHARS {
        return text;
    }
    let truncated: String = text.chars().take(MAX_CHARS).collect();
    format!("{}...", truncated)
}
