//! Common helpers shared across tool definitions.

use serde::Serialize;

use crate::domains::tools::{ToolFailure, ToolResult, ToolValue};

/// Serialize a tool's output struct into a JSON result.
pub fn to_result<T: Serialize>(output: &T) -> ToolResult {
    serde_json::to_value(output)
        .map(ToolValue::Json)
        .map_err(|e| ToolFailure::internal(format!("failed to serialize output: {}", e)))
}

/// Round to a number of decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Format a float the way callers expect to read it back: integral values
/// keep a trailing `.0` (`32.0`, not `32`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// First `max_chars` characters of `text`, with `...` appended if cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Number of characters (not bytes) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Deduplicate while keeping first-seen order.
pub fn unique(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
