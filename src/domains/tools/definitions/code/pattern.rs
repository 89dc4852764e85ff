//! Regular expression tester.

use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domains::tools::definitions::common::{preview, to_result};
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolResult,
};

/// Parameters for the test_regex tool.
#[derive(Debug, Deserialize)]
struct TestRegexParams {
    /// Regular expression to compile.
    pattern: String,

    /// Subject the pattern is matched against.
    test_string: String,

    /// Single-letter flags: i, m, s
    flags: Vec<String>,
}

/// One match, with character (not byte) offsets.
#[derive(Debug, Serialize)]
struct MatchInfo {
    #[serde(rename = "match")]
    matched: String,
    start: usize,
    end: usize,
    groups: Option<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    named_groups: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
struct RegexReport {
    pattern: String,
    test_string: String,
    valid_pattern: bool,
    match_found: bool,
    match_count: usize,
    matches: Vec<MatchInfo>,
}

/// Compile a pattern and report every match in a string.
pub struct TestRegexTool;

impl TestRegexTool {
    fn compile(pattern: &str, flags: &[String]) -> Result<Regex, regex::Error> {
        let has = |flag: &str| flags.iter().any(|f| f == flag);
        RegexBuilder::new(pattern)
            .case_insensitive(has("i"))
            .multi_line(has("m"))
            .dot_matches_new_line(has("s"))
            .build()
    }

    fn describe(regex: &Regex, text: &str, caps: &Captures<'_>) -> Option<MatchInfo> {
        let whole = caps.get(0)?;
        let char_offset = |byte: usize| text[..byte].chars().count();

        let groups = (regex.captures_len() > 1).then(|| {
            (1..regex.captures_len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                .collect()
        });

        let named: Map<String, Value> = regex
            .capture_names()
            .flatten()
            .map(|name| (name.to_string(), json!(caps.name(name).map(|m| m.as_str()))))
            .collect();

        Some(MatchInfo {
            matched: whole.as_str().to_string(),
            start: char_offset(whole.start()),
            end: char_offset(whole.end()),
            groups,
            named_groups: (!named.is_empty()).then_some(named),
        })
    }
}

impl ToolDefinition for TestRegexTool {
    const NAME: &'static str = "test_regex";
    const DESCRIPTION: &'static str =
        "Test a regular expression against a string and list the matches and captured groups.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("pattern", ParamType::String)
                .describe("Regular expression pattern."),
            ParameterSpec::required("test_string", ParamType::String)
                .describe("String to test the pattern against."),
            ParameterSpec::optional("flags", ParamType::sequence_of(ParamType::one_of(["i", "m", "s"])))
                .with_default(json!([]))
                .describe("Flags: i (ignore case), m (multiline), s (dot matches newline)."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: TestRegexParams = args.parse()?;

        // A bad pattern is a normal answer for a tester, not a failure.
        let regex = match Self::compile(&params.pattern, &params.flags) {
            Ok(regex) => regex,
            Err(e) => {
                return Ok(json!({
                    "pattern": params.pattern,
                    "valid_pattern": false,
                    "error": e.to_string(),
                })
                .into());
            }
        };

        let matches: Vec<MatchInfo> = regex
            .captures_iter(&params.test_string)
            .filter_map(|caps| Self::describe(&regex, &params.test_string, &caps))
            .collect();

        to_result(&RegexReport {
            test_string: preview(&params.test_string, 200),
            pattern: params.pattern,
            valid_pattern: true,
            match_found: !matches.is_empty(),
            match_count: matches.len(),
            matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolValue, validate};

    fn json_of(raw: Value) -> Value {
        let schema = TestRegexTool::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        match TestRegexTool::execute(&args, &ToolContext::in_memory()).unwrap() {
            ToolValue::Json(value) => value,
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_matches_with_groups() {
        let result = json_of(json!({ "pattern": r"(\d+)-(?P<tail>\d+)?", "test_string": "é 12-34 and 5-" }));
        assert_eq!(result["match_count"], json!(2));
        assert_eq!(
            result["matches"][0],
            json!({
                "match": "12-34",
                "start": 2,
                "end": 7,
                "groups": ["12", "34"],
                "named_groups": { "tail": "34" }
            })
        );
        assert_eq!(result["matches"][1]["groups"], json!(["5", null]));
    }

    #[test]
    fn test_no_groups_is_null() {
        let result = json_of(json!({ "pattern": "a", "test_string": "bab" }));
        assert_eq!(result["matches"][0]["groups"], Value::Null);
        assert!(result["matches"][0].get("named_groups").is_none());
    }

    #[test]
    fn test_flags() {
        let result = json_of(json!({ "pattern": "^abc$", "test_string": "x\nABC", "flags": ["i", "m"] }));
        assert_eq!(result["match_found"], json!(true));

        let result = json_of(json!({ "pattern": "^abc$", "test_string": "x\nABC" }));
        assert_eq!(result["match_found"], json!(false));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let result = json_of(json!({ "pattern": "(unclosed", "test_string": "x" }));
        assert_eq!(result["valid_pattern"], json!(false));
        assert!(result["error"].is_string());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let schema = TestRegexTool::schema().unwrap();
        let raw = json!({ "pattern": "a", "test_string": "a", "flags": ["x"] });
        assert!(validate(&schema, raw.as_object().unwrap()).is_err());
    }
}
