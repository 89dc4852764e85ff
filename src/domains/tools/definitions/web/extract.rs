//! Pattern extraction from free text: emails, URLs, hashtags, mentions.
//!
//! Results are deduplicated in first-seen order.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

use crate::domains::tools::definitions::common::unique;
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolResult,
};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static EMAIL_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'{}|\\^`\[\]]+"#).unwrap());
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[a-zA-Z0-9_]+").unwrap());
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@[a-zA-Z0-9_]+").unwrap());

/// Parameters for the extraction tool.
#[derive(Debug, Deserialize)]
struct TextParams {
    /// Text to search.
    text: String,
}

fn find_unique(pattern: &Regex, text: &str) -> Vec<String> {
    unique(pattern.find_iter(text).map(|m| m.as_str().to_string()))
}

fn text_parameter(description: &str) -> Vec<ParameterSpec> {
    vec![ParameterSpec::required("text", ParamType::String).describe(description)]
}

// ============================================================================
// extract_emails
// ============================================================================

pub struct ExtractEmailsTool;

impl ToolDefinition for ExtractEmailsTool {
    const NAME: &'static str = "extract_emails";
    const DESCRIPTION: &'static str = "Extract all email addresses from a text.";

    fn parameters() -> Vec<ParameterSpec> {
        text_parameter("Text to search for email addresses.")
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: TextParams = args.parse()?;
        let emails = find_unique(&EMAIL, &params.text);
        Ok(json!({
            "count": emails.len(),
            "emails": emails,
            "unique": true,
        })
        .into())
    }
}

// ============================================================================
// extract_urls
// ============================================================================

pub struct ExtractUrlsTool;

impl ToolDefinition for ExtractUrlsTool {
    const NAME: &'static str = "extract_urls";
    const DESCRIPTION: &'static str = "Extract all http(s) URLs from a text.";

    fn parameters() -> Vec<ParameterSpec> {
        text_parameter("Text to search for URLs.")
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: TextParams = args.parse()?;
        let urls = find_unique(&URL, &params.text);
        let secure = urls.iter().filter(|u| u.starts_with("https://")).count();
        Ok(json!({
            "count": urls.len(),
            "secure_count": secure,
            "insecure_count": urls.len() - secure,
            "urls": urls,
        })
        .into())
    }
}

// ============================================================================
// validate_email
// ============================================================================

/// Parameters for the email validation tool.
#[derive(Debug, Deserialize)]
struct ValidateEmailParams {
    /// Address to check.
    email: String,
}

/// Format check for an email address, with hints when it fails.
pub struct ValidateEmailTool;

impl ValidateEmailTool {
    fn issues(email: &str) -> Vec<&'static str> {
        let mut issues = Vec::new();
        match email.matches('@').count() {
            0 => issues.push("Missing @ symbol"),
            1 => {}
            _ => issues.push("Multiple @ symbols"),
        }
        if email.starts_with('.') || email.ends_with('.') {
            issues.push("Cannot start or end with a period");
        }
        if email.contains("..") {
            issues.push("Cannot have consecutive periods");
        }
        issues
    }
}

impl ToolDefinition for ValidateEmailTool {
    const NAME: &'static str = "validate_email";
    const DESCRIPTION: &'static str = "Check whether a string is a properly formatted email address.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required("email", ParamType::String).describe("Email address to validate.")]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: ValidateEmailParams = args.parse()?;
        let email = params.email.as_str();
        let valid = EMAIL_EXACT.is_match(email);

        let mut result = Map::new();
        result.insert("email".into(), json!(email));
        result.insert("valid".into(), json!(valid));
        match email.split_once('@') {
            Some((local, domain)) if valid => {
                result.insert("local_part".into(), json!(local));
                result.insert("domain".into(), json!(domain));
            }
            _ => {
                result.insert("issues".into(), json!(Self::issues(email)));
            }
        }

        Ok(Value::Object(result).into())
    }
}

// ============================================================================
// extract_hashtags / extract_mentions
// ============================================================================

pub struct ExtractHashtagsTool;

impl ToolDefinition for ExtractHashtagsTool {
    const NAME: &'static str = "extract_hashtags";
    const DESCRIPTION: &'static str = "Extract all #hashtags from a text.";

    fn parameters() -> Vec<ParameterSpec> {
        text_parameter("Text to search for hashtags.")
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: TextParams = args.parse()?;
        let hashtags = find_unique(&HASHTAG, &params.text);
        let bare: Vec<&str> = hashtags.iter().map(|h| &h[1..]).collect();
        Ok(json!({
            "hashtags": hashtags,
            "count": hashtags.len(),
            "without_symbol": bare,
        })
        .into())
    }
}

pub struct ExtractMentionsTool;

impl ToolDefinition for ExtractMentionsTool {
    const NAME: &'static str = "extract_mentions";
    const DESCRIPTION: &'static str = "Extract all @mentions from a text.";

    fn parameters() -> Vec<ParameterSpec> {
        text_parameter("Text to search for mentions.")
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: TextParams = args.parse()?;
        let mentions = find_unique(&MENTION, &params.text);
        let usernames: Vec<&str> = mentions.iter().map(|m| &m[1..]).collect();
        Ok(json!({
            "mentions": mentions,
            "count": mentions.len(),
            "usernames": usernames,
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

    #[test]
    fn test_extract_emails_dedupes() {
        let result = json_of::<ExtractEmailsTool>(
            json!({ "text": "mail a@x.io, b.c@y.org or a@x.io again" }),
        );
        assert_eq!(result["emails"], json!(["a@x.io", "b.c@y.org"]));
        assert_eq!(result["count"], json!(2));
    }

    #[test]
    fn test_extract_urls_counts() {
        let result = json_of::<ExtractUrlsTool>(
            json!({ "text": "see https://a.io/x and <http://b.io> and https://a.io/x" }),
        );
        assert_eq!(result["urls"], json!(["https://a.io/x", "http://b.io"]));
        assert_eq!(result["secure_count"], json!(1));
        assert_eq!(result["insecure_count"], json!(1));
    }

    #[test]
    fn test_validate_email() {
        let result = json_of::<ValidateEmailTool>(json!({ "email": "ada@example.com" }));
        assert_eq!(result["valid"], json!(true));
        assert_eq!(result["local_part"], json!("ada"));
        assert_eq!(result["domain"], json!("example.com"));

        let result = json_of::<ValidateEmailTool>(json!({ "email": "a@b@c..com." }));
        assert_eq!(result["valid"], json!(false));
        assert_eq!(
            result["issues"],
            json!([
                "Multiple @ symbols",
                "Cannot start or end with a period",
                "Cannot have consecutive periods"
            ])
        );
    }

    #[test]
    fn test_hashtags_and_mentions() {
        let result = json_of::<ExtractHashtagsTool>(json!({ "text": "#rust and #mcp, #rust" }));
        assert_eq!(result["without_symbol"], json!(["rust", "mcp"]));

        let result = json_of::<ExtractMentionsTool>(json!({ "text": "hi @ada_l and @bob" }));
        assert_eq!(result["usernames"], json!(["ada_l", "bob"]));
        assert_eq!(result["count"], json!(2));
    }
}
