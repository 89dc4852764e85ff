//! Text utilities: hashing, Base64, statistics and JSON formatting.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use md5::Md5;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::sync::LazyLock;

use crate::domains::tools::definitions::common::{char_len, preview, round_to, to_result};
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

// ============================================================================
// hash_text
// ============================================================================

/// Parameters for the hash tool.
#[derive(Debug, Deserialize)]
struct HashTextParams {
    /// Text to hash.
    text: String,

    /// Digest algorithm
    algorithm: String,
}

/// Hex digest of UTF-8 text.
pub struct HashTextTool;

impl HashTextTool {
    fn digest(algorithm: &str, bytes: &[u8]) -> String {
        match algorithm {
            "md5" => hex::encode(Md5::digest(bytes)),
            "sha1" => hex::encode(Sha1::digest(bytes)),
            "sha512" => hex::encode(Sha512::digest(bytes)),
            _ => hex::encode(Sha256::digest(bytes)),
        }
    }
}

impl ToolDefinition for HashTextTool {
    const NAME: &'static str = "hash_text";
    const DESCRIPTION: &'static str = "Generate a hash of the given text (md5, sha1, sha256, sha512).";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("text", ParamType::String).describe("The text to hash."),
            ParameterSpec::optional(
                "algorithm",
                ParamType::one_of(["md5", "sha1", "sha256", "sha512"]),
            )
            .with_default("sha256")
            .describe("Hash algorithm to use."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: HashTextParams = args.parse()?;
        Ok(json!({
            "original_text": preview(&params.text, 100),
            "algorithm": params.algorithm,
            "hash": Self::digest(&params.algorithm, params.text.as_bytes()),
        })
        .into())
    }
}

// ============================================================================
// encode_base64
// ============================================================================

/// Parameters for the base64 tool.
#[derive(Debug, Deserialize)]
struct EncodeBase64Params {
    /// Text to encode, or base64 to decode.
    text: String,

    /// Decode instead of encode.
    decode: bool,
}

/// Base64 encode, or decode back to UTF-8 text.
pub struct EncodeBase64Tool;

impl ToolDefinition for EncodeBase64Tool {
    const NAME: &'static str = "encode_base64";
    const DESCRIPTION: &'static str = "Encode text to Base64 or decode Base64 to text.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("text", ParamType::String)
                .describe("Text to encode, or Base64 string to decode."),
            ParameterSpec::optional("decode", ParamType::Boolean)
                .with_default(false)
                .describe("Decode instead of encode."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: EncodeBase64Params = args.parse()?;

        let (operation, result) = if params.decode {
            let bytes = STANDARD
                .decode(params.text.trim())
                .map_err(|e| ToolFailure::execution(format!("invalid Base64 input: {}", e)))?;
            let text = String::from_utf8(bytes)
                .map_err(|_| ToolFailure::execution("decoded bytes are not valid UTF-8"))?;
            ("decode", text)
        } else {
            ("encode", STANDARD.encode(params.text.as_bytes()))
        };

        Ok(json!({
            "operation": operation,
            "input": preview(&params.text, 100),
            "result": result,
        })
        .into())
    }
}

// ============================================================================
// word_count
// ============================================================================

/// Parameters for the word count tool.
#[derive(Debug, Deserialize)]
struct WordCountParams {
    /// Text to analyze.
    text: String,
}

#[derive(Debug, Serialize)]
struct TextStats {
    characters: usize,
    characters_no_spaces: usize,
    words: usize,
    sentences: usize,
    paragraphs: usize,
    average_word_length: f64,
    reading_time_minutes: f64,
    speaking_time_minutes: f64,
}

/// Word, sentence and paragraph statistics.
pub struct WordCountTool;

impl ToolDefinition for WordCountTool {
    const NAME: &'static str = "word_count";
    const DESCRIPTION: &'static str =
        "Analyze text and return word, character, sentence and paragraph counts.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required("text", ParamType::String).describe("The text to analyze.")]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: WordCountParams = args.parse()?;
        let text = params.text.as_str();

        let words: Vec<&str> = text.split_whitespace().collect();
        let letters: usize = words.iter().map(|w| char_len(w)).sum();
        let word_total = words.len() as f64;

        to_result(&TextStats {
            characters: char_len(text),
            characters_no_spaces: text.chars().filter(|c| *c != ' ' && *c != '\n').count(),
            words: words.len(),
            sentences: SENTENCE_BREAK
                .split(text)
                .filter(|s| !s.trim().is_empty())
                .count(),
            paragraphs: text.split("\n\n").filter(|p| !p.trim().is_empty()).count(),
            average_word_length: round_to(letters as f64 / word_total.max(1.0), 2),
            reading_time_minutes: round_to(word_total / 200.0, 1),
            speaking_time_minutes: round_to(word_total / 130.0, 1),
        })
    }
}

// ============================================================================
// format_json
// ============================================================================

/// Parameters for the JSON formatter tool.
#[derive(Debug, Deserialize)]
struct FormatJsonParams {
    /// JSON document to pretty-print.
    json_string: String,

    /// Spaces per indentation level
    indent: i64,
}

/// Pretty-print JSON with sorted keys.
pub struct FormatJsonTool;

impl FormatJsonTool {
    fn sort_keys(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut entries: Vec<(String, Value)> = map.into_iter().collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                Value::Object(
                    entries
                        .into_iter()
                        .map(|(k, v)| (k, Self::sort_keys(v)))
                        .collect::<Map<_, _>>(),
                )
            }
            Value::Array(items) => Value::Array(items.into_iter().map(Self::sort_keys).collect()),
            other => other,
        }
    }

    fn pretty(value: &Value, indent: usize) -> Result<String, ToolFailure> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|e| ToolFailure::internal(format!("failed to format JSON: {}", e)))?;
        String::from_utf8(out).map_err(|e| ToolFailure::internal(e.to_string()))
    }
}

impl ToolDefinition for FormatJsonTool {
    const NAME: &'static str = "format_json";
    const DESCRIPTION: &'static str = "Format a JSON string for readability, with sorted keys.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("json_string", ParamType::String)
                .describe("Raw JSON string to format."),
            ParameterSpec::optional("indent", ParamType::Integer)
                .with_default(2)
                .describe("Spaces per indentation level."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: FormatJsonParams = args.parse()?;

        // Invalid input is reported in the result, not as a failure.
        let parsed: Value = match serde_json::from_str(&params.json_string) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(json!({ "valid": false, "error": e.to_string() }).into()),
        };

        let keys_count = parsed.as_object().map(Map::len);
        let items_count = parsed.as_array().map(Vec::len);
        let formatted = Self::pretty(&Self::sort_keys(parsed), params.indent.clamp(0, 16) as usize)?;

        Ok(json!({
            "valid": true,
            "formatted": formatted,
            "keys_count": keys_count,
            "items_count": items_count,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolValue, validate};

    fn run<T: ToolDefinition>(raw: Value) -> ToolResult {
        let schema = T::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        T::execute(&args, &ToolContext::in_memory())
    }

    fn json_of<T: ToolDefinition>(raw: Value) -> Value {
        match run::<T>(raw).unwrap() {
            ToolValue::Json(value) => value,
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_hash_known_digests() {
        let result = json_of::<HashTextTool>(json!({ "text": "hello" }));
        assert_eq!(result["algorithm"], json!("sha256"));
        assert_eq!(
            result["hash"],
            json!("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );

        let result = json_of::<HashTextTool>(json!({ "text": "hello", "algorithm": "md5" }));
        assert_eq!(result["hash"], json!("5d41402abc4b2a76b9719d911017c592"));
    }

    #[test]
    fn test_base64_both_ways() {
        let result = json_of::<EncodeBase64Tool>(json!({ "text": "hi there" }));
        assert_eq!(result["result"], json!("aGkgdGhlcmU="));

        let result = json_of::<EncodeBase64Tool>(json!({ "text": "aGkgdGhlcmU=", "decode": "true" }));
        assert_eq!(result["operation"], json!("decode"));
        assert_eq!(result["result"], json!("hi there"));
    }

    #[test]
    fn test_base64_invalid_input() {
        let err = run::<EncodeBase64Tool>(json!({ "text": "!!!", "decode": true })).unwrap_err();
        assert!(matches!(err, ToolFailure::Execution(_)));
    }

    #[test]
    fn test_word_count_stats() {
        let result = json_of::<WordCountTool>(json!({ "text": "One two. Three four!\n\nFive?" }));
        assert_eq!(result["words"], json!(5));
        assert_eq!(result["sentences"], json!(3));
        assert_eq!(result["paragraphs"], json!(2));
        assert_eq!(result["characters"], json!(27));
        assert_eq!(result["characters_no_spaces"], json!(22));
    }

    #[test]
    fn test_format_json_sorts_keys() {
        let result = json_of::<FormatJsonTool>(json!({ "json_string": r#"{"b":1,"a":[1,2]}"# }));
        assert_eq!(result["valid"], json!(true));
        assert_eq!(
            result["formatted"],
            json!("{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": 1\n}")
        );
        assert_eq!(result["keys_count"], json!(2));
        assert_eq!(result["items_count"], Value::Null);
    }

    #[test]
    fn test_format_json_reports_invalid() {
        let result = json_of::<FormatJsonTool>(json!({ "json_string": "{nope" }));
        assert_eq!(result["valid"], json!(false));
        assert!(result["error"].is_string());
    }
}
