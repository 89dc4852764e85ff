//! Developer text helpers: escaping, diffs, JSON minification and line counts.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domains::tools::definitions::common::{char_len, round_to, to_result};
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

// ============================================================================
// escape_string
// ============================================================================

const REGEX_SPECIALS: &str = r"\.^$*+?{}[]|()/";

/// Parameters for the escape tool.
#[derive(Debug, Deserialize)]
struct EscapeStringParams {
    /// Text to escape.
    text: String,

    /// Escaping scheme (html, json, regex, sql, url).
    escape_type: String,
}

/// Escape text for HTML, JSON, regex, SQL or URL contexts.
pub struct EscapeStringTool;

impl EscapeStringTool {
    fn html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#x27;")
    }

    /// JSON string body with non-ASCII as `\uXXXX` escapes.
    fn json(text: &str) -> Result<String, ToolFailure> {
        let quoted = serde_json::to_string(text)
            .map_err(|e| ToolFailure::internal(format!("failed to encode string: {}", e)))?;
        let body = &quoted[1..quoted.len() - 1];

        let mut out = String::with_capacity(body.len());
        for c in body.chars() {
            if c.is_ascii() {
                out.push(c);
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
        Ok(out)
    }

    fn regex(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if REGEX_SPECIALS.contains(c) {
                out.push('\\');
            }
            out.push(c);
        }
        out
    }

    fn sql(text: &str) -> String {
        text.replace('\'', "''").replace('\\', "\\\\")
    }

    fn url(text: &str) -> String {
        urlencoding::encode(text).replace("%2F", "/")
    }
}

impl ToolDefinition for EscapeStringTool {
    const NAME: &'static str = "escape_string";
    const DESCRIPTION: &'static str =
        "Escape special characters in a string for HTML, JSON, regex, SQL or URL contexts.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("text", ParamType::String).describe("Text to escape."),
            ParameterSpec::optional(
                "escape_type",
                ParamType::one_of(["html", "json", "regex", "sql", "url"]),
            )
            .with_default("html")
            .describe("Type of escaping."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: EscapeStringParams = args.parse()?;
        let text = params.text.as_str();

        let escaped = match params.escape_type.as_str() {
            "json" => Self::json(text)?,
            "regex" => Self::regex(text),
            "sql" => Self::sql(text),
            "url" => Self::url(text),
            _ => Self::html(text),
        };

        Ok(json!({
            "original": text,
            "escaped": escaped,
            "escape_type": params.escape_type,
        })
        .into())
    }
}

// ============================================================================
// diff_text
// ============================================================================

/// Parameters for the diff tool.
#[derive(Debug, Deserialize)]
struct DiffTextParams {
    /// Original text
    text1: String,

    /// Changed text
    text2: String,
}

#[derive(Debug, Serialize)]
struct LineChange {
    line: usize,
    content: String,
}

#[derive(Debug, Serialize)]
struct DiffReport {
    lines_in_text1: usize,
    lines_in_text2: usize,
    unchanged_lines: usize,
    added_lines: Vec<LineChange>,
    removed_lines: Vec<LineChange>,
    total_changes: usize,
}

/// Positional line diff. A changed line only counts as added or removed if it
/// does not appear anywhere in the other text.
pub struct DiffTextTool;

impl DiffTextTool {
    fn diff(text1: &str, text2: &str) -> DiffReport {
        let lines1: Vec<&str> = text1.lines().collect();
        let lines2: Vec<&str> = text2.lines().collect();

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut unchanged = 0;

        for i in 0..lines1.len().max(lines2.len()) {
            let left = lines1.get(i).copied();
            let right = lines2.get(i).copied();
            if left == right {
                unchanged += 1;
                continue;
            }
            if let Some(line) = left.filter(|l| !l.is_empty() && !lines2.contains(l)) {
                removed.push(LineChange { line: i + 1, content: line.to_string() });
            }
            if let Some(line) = right.filter(|l| !l.is_empty() && !lines1.contains(l)) {
                added.push(LineChange { line: i + 1, content: line.to_string() });
            }
        }

        DiffReport {
            lines_in_text1: lines1.len(),
            lines_in_text2: lines2.len(),
            unchanged_lines: unchanged,
            total_changes: added.len() + removed.len(),
            added_lines: added,
            removed_lines: removed,
        }
    }
}

impl ToolDefinition for DiffTextTool {
    const NAME: &'static str = "diff_text";
    const DESCRIPTION: &'static str = "Compare two texts line by line and list the differences.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("text1", ParamType::String).describe("First text."),
            ParameterSpec::required("text2", ParamType::String).describe("Second text."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: DiffTextParams = args.parse()?;
        to_result(&Self::diff(&params.text1, &params.text2))
    }
}

// ============================================================================
// minify_json
// ============================================================================

/// Parameters for the minify tool.
#[derive(Debug, Deserialize)]
struct MinifyJsonParams {
    /// JSON document to minify.
    json_string: String,
}

pub struct MinifyJsonTool;

impl ToolDefinition for MinifyJsonTool {
    const NAME: &'static str = "minify_json";
    const DESCRIPTION: &'static str = "Minify a JSON string by removing whitespace.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required("json_string", ParamType::String).describe("JSON string to minify.")]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: MinifyJsonParams = args.parse()?;
        let parsed: Value = match serde_json::from_str(&params.json_string) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(json!({ "valid": false, "error": e.to_string() }).into()),
        };

        let minified = serde_json::to_string(&parsed)
            .map_err(|e| ToolFailure::internal(format!("failed to minify: {}", e)))?;
        let original_size = char_len(&params.json_string);
        let minified_size = char_len(&minified);
        let saved = original_size as i64 - minified_size as i64;

        Ok(json!({
            "valid": true,
            "minified": minified,
            "original_size": original_size,
            "minified_size": minified_size,
            "bytes_saved": saved,
            "reduction_percent": round_to(saved as f64 / original_size as f64 * 100.0, 1),
        })
        .into())
    }
}

// ============================================================================
// count_code_lines
// ============================================================================

/// Parameters for the line count tool.
#[derive(Debug, Deserialize)]
struct CountCodeLinesParams {
    /// Source code to analyze.
    code: String,

    /// Language, which picks the comment prefix
    language: String,
}

/// Line statistics with single-line comment detection.
pub struct CountCodeLinesTool;

impl CountCodeLinesTool {
    fn comment_prefix(language: &str) -> &'static str {
        match language {
            "python" => "#",
            _ => "//",
        }
    }
}

impl ToolDefinition for CountCodeLinesTool {
    const NAME: &'static str = "count_code_lines";
    const DESCRIPTION: &'static str = "Count lines of code, comments, and blank lines.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("code", ParamType::String).describe("Source code to analyze."),
            ParameterSpec::optional(
                "language",
                ParamType::one_of(["python", "javascript", "java", "cpp", "generic"]),
            )
            .with_default("generic")
            .describe("Language, for comment detection."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: CountCodeLinesParams = args.parse()?;
        let prefix = Self::comment_prefix(&params.language);

        let lines: Vec<&str> = params.code.lines().collect();
        let total = lines.len();
        let blank = lines.iter().filter(|l| l.trim().is_empty()).count();
        let comments = lines.iter().filter(|l| l.trim().starts_with(prefix)).count();

        Ok(json!({
            "total_lines": total,
            "code_lines": total - blank - comments,
            "comment_lines": comments,
            "blank_lines": blank,
            "comment_ratio": round_to(comments as f64 / total.max(1) as f64 * 100.0, 1),
            "language": params.language,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolValue, validate};

    fn json_of<T: ToolDefinition>(raw: Value) -> Value {
        let schema = T::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        match T::execute(&args, &ToolContext::in_memory()).unwrap() {
            ToolValue::Json(value) => value,
            other => panic!("unexpected result {:?}", other),
        }
    }

    fn escape(text: &str, kind: &str) -> Value {
        json_of::<EscapeStringTool>(json!({ "text": text, "escape_type": kind }))["escaped"].clone()
    }

    #[test]
    fn test_escape_variants() {
        assert_eq!(escape("<a href=\"x\">'&'</a>", "html"), json!("&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"));
        assert_eq!(escape("say \"hé\"\n", "json"), json!("say \\\"h\\u00e9\\\"\\n"));
        assert_eq!(escape("a.b*(c)", "regex"), json!("a\\.b\\*\\(c\\)"));
        assert_eq!(escape("it's", "sql"), json!("it''s"));
        assert_eq!(escape("a b/c?d", "url"), json!("a%20b/c%3Fd"));
    }

    #[test]
    fn test_diff_text() {
        let result = json_of::<DiffTextTool>(json!({ "text1": "a\nb\nc", "text2": "a\nx\nc\nd" }));
        assert_eq!(result["unchanged_lines"], json!(2));
        assert_eq!(result["removed_lines"], json!([{ "line": 2, "content": "b" }]));
        assert_eq!(
            result["added_lines"],
            json!([{ "line": 2, "content": "x" }, { "line": 4, "content": "d" }])
        );
        assert_eq!(result["total_changes"], json!(3));
    }

    #[test]
    fn test_moved_line_is_not_a_change() {
        let result = json_of::<DiffTextTool>(json!({ "text1": "a\nb", "text2": "b\na" }));
        assert_eq!(result["total_changes"], json!(0));
        assert_eq!(result["unchanged_lines"], json!(0));
    }

    #[test]
    fn test_minify_json() {
        let result = json_of::<MinifyJsonTool>(json!({ "json_string": "{ \"b\": 1,\n  \"a\": [1, 2] }" }));
        assert_eq!(result["minified"], json!(r#"{"b":1,"a":[1,2]}"#));
        assert_eq!(result["original_size"], json!(25));
        assert_eq!(result["bytes_saved"], json!(8));

        let result = json_of::<MinifyJsonTool>(json!({ "json_string": "" }));
        assert_eq!(result["valid"], json!(false));
    }

    #[test]
    fn test_count_code_lines() {
        let code = "# setup\nimport os\n\nprint(os.name)  # inline\n";
        let result = json_of::<CountCodeLinesTool>(json!({ "code": code, "language": "python" }));
        assert_eq!(result["total_lines"], json!(4));
        assert_eq!(result["comment_lines"], json!(1));
        assert_eq!(result["blank_lines"], json!(1));
        assert_eq!(result["code_lines"], json!(2));
        assert_eq!(result["comment_ratio"], json!(25.0));
    }
}
