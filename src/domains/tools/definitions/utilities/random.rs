//! Generators: passwords, UUIDs and placeholder text.

use rand::Rng;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::tools::definitions::common::to_result;
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolResult,
};

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

const STRENGTH_LABELS: [&str; 6] = ["Very Weak", "Weak", "Fair", "Good", "Strong", "Very Strong"];

const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

// ============================================================================
// generate_password
// ============================================================================

/// Parameters for the password generator tool.
#[derive(Debug, Deserialize)]
struct GeneratePasswordParams {
    /// Password length, clamped to 8..=128.
    length: i64,

    /// Include A-Z.
    include_uppercase: bool,

    /// Include a-z.
    include_lowercase: bool,

    /// Include 0-9.
    include_numbers: bool,

    /// Include punctuation symbols
    include_symbols: bool,
}

#[derive(Debug, Serialize)]
struct PasswordOutput {
    password: String,
    length: usize,
    strength: &'static str,
    strength_score: String,
}

/// Random password from the OS generator, with a rough strength rating.
pub struct GeneratePasswordTool;

impl GeneratePasswordTool {
    fn alphabet(params: &GeneratePasswordParams) -> Vec<char> {
        let mut chars = String::new();
        if params.include_uppercase {
            chars.push_str(UPPERCASE);
        }
        if params.include_lowercase {
            chars.push_str(LOWERCASE);
        }
        if params.include_numbers {
            chars.push_str(DIGITS);
        }
        if params.include_symbols {
            chars.push_str(SYMBOLS);
        }
        if chars.is_empty() {
            chars = [UPPERCASE, LOWERCASE, DIGITS].concat();
        }
        chars.chars().collect()
    }

    fn strength_score(password: &str, length: usize) -> usize {
        [
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| SYMBOLS.contains(c)),
            length >= 12,
            length >= 16,
        ]
        .into_iter()
        .filter(|passed| *passed)
        .count()
    }
}

impl ToolDefinition for GeneratePasswordTool {
    const NAME: &'static str = "generate_password";
    const DESCRIPTION: &'static str =
        "Generate a secure random password with customizable character classes.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional("length", ParamType::Integer)
                .with_default(16)
                .describe("Password length (clamped to 8-128 characters)."),
            ParameterSpec::optional("include_uppercase", ParamType::Boolean)
                .with_default(true)
                .describe("Include uppercase letters (A-Z)."),
            ParameterSpec::optional("include_lowercase", ParamType::Boolean)
                .with_default(true)
                .describe("Include lowercase letters (a-z)."),
            ParameterSpec::optional("include_numbers", ParamType::Boolean)
                .with_default(true)
                .describe("Include digits (0-9)."),
            ParameterSpec::optional("include_symbols", ParamType::Boolean)
                .with_default(true)
                .describe("Include special characters."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: GeneratePasswordParams = args.parse()?;
        let length = params.length.clamp(8, 128) as usize;
        let alphabet = Self::alphabet(&params);

        let mut rng = OsRng;
        let password: String = (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let score = Self::strength_score(&password, length);
        to_result(&PasswordOutput {
            strength: STRENGTH_LABELS[score.min(5)],
            strength_score: format!("{}/6", score),
            password,
            length,
        })
    }
}

// ============================================================================
// generate_uuid
// ============================================================================

/// Parameters for the UUID generator tool.
#[derive(Debug, Deserialize)]
struct GenerateUuidParams {
    /// UUID version (v1 or v4).
    version: String,

    /// How many to generate, clamped to 1..=50
    count: i64,
}

/// Random (v4) or time-based (v1) UUIDs.
pub struct GenerateUuidTool;

impl ToolDefinition for GenerateUuidTool {
    const NAME: &'static str = "generate_uuid";
    const DESCRIPTION: &'static str = "Generate UUIDs: v4 (random) or v1 (time-based).";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional("version", ParamType::one_of(["v4", "v1"]))
                .with_default("v4")
                .describe("UUID version."),
            ParameterSpec::optional("count", ParamType::Integer)
                .with_default(1)
                .describe("Number of UUIDs to generate (clamped to 1-50)."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: GenerateUuidParams = args.parse()?;
        let count = params.count.clamp(1, 50) as usize;

        let uuids: Vec<String> = (0..count)
            .map(|_| match params.version.as_str() {
                "v1" => Uuid::now_v1(&rand::random::<[u8; 6]>()),
                _ => Uuid::new_v4(),
            })
            .map(|id| id.to_string())
            .collect();

        Ok(serde_json::json!({
            "uuids": uuids,
            "version": params.version,
            "count": uuids.len(),
        })
        .into())
    }
}

// ============================================================================
// generate_lorem_ipsum
// ============================================================================

/// Parameters for the lorem ipsum tool.
#[derive(Debug, Deserialize)]
struct LoremIpsumParams {
    /// Number of paragraphs (1..=10).
    paragraphs: i64,

    /// Words in each paragraph (10..=200).
    words_per_paragraph: i64,
}

/// Placeholder text built from the classic word list.
pub struct GenerateLoremIpsumTool;

impl ToolDefinition for GenerateLoremIpsumTool {
    const NAME: &'static str = "generate_lorem_ipsum";
    const DESCRIPTION: &'static str = "Generate Lorem Ipsum placeholder text.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional("paragraphs", ParamType::Integer)
                .with_default(1)
                .describe("Number of paragraphs (clamped to 1-10)."),
            ParameterSpec::optional("words_per_paragraph", ParamType::Integer)
                .with_default(50)
                .describe("Words per paragraph (clamped to 10-200)."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: LoremIpsumParams = args.parse()?;
        let paragraphs = params.paragraphs.clamp(1, 10) as usize;
        let words = params.words_per_paragraph.clamp(10, 200) as usize;

        let mut rng = rand::thread_rng();
        let text = (0..paragraphs)
            .map(|_| {
                let mut paragraph = (0..words)
                    .map(|_| LOREM_WORDS[rng.gen_range(0..LOREM_WORDS.len())])
                    .collect::<Vec<_>>()
                    .join(" ");
                if let Some(first) = paragraph.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                paragraph.push('.');
                paragraph
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(serde_json::json!({
            "text": text,
            "paragraphs": paragraphs,
            "total_words": paragraphs * words,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolValue, validate};
    use serde_json::{Value, json};

    fn run<T: ToolDefinition>(raw: Value) -> Value {
        let schema = T::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        match T::execute(&args, &ToolContext::in_memory()).unwrap() {
            ToolValue::Json(value) => value,
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_password_length_is_clamped() {
        let result = run::<GeneratePasswordTool>(json!({ "length": 3 }));
        assert_eq!(result["length"], json!(8));
        assert_eq!(result["password"].as_str().unwrap().chars().count(), 8);
    }

    #[test]
    fn test_password_digits_only() {
        let result = run::<GeneratePasswordTool>(json!({
            "length": 20,
            "include_uppercase": false,
            "include_lowercase": false,
            "include_symbols": false
        }));
        let password = result["password"].as_str().unwrap();
        assert!(password.chars().all(|c| c.is_ascii_digit()));
        // digits, >= 12, >= 16
        assert_eq!(result["strength_score"], json!("3/6"));
        assert_eq!(result["strength"], json!("Good"));
    }

    #[test]
    fn test_uuid_count_and_version() {
        let result = run::<GenerateUuidTool>(json!({ "count": 3 }));
        assert_eq!(result["count"], json!(3));
        let first = result["uuids"][0].as_str().unwrap();
        assert_eq!(Uuid::parse_str(first).unwrap().get_version_num(), 4);

        let result = run::<GenerateUuidTool>(json!({ "version": "v1", "count": 500 }));
        assert_eq!(result["count"], json!(50));
        let first = result["uuids"][0].as_str().unwrap();
        assert_eq!(Uuid::parse_str(first).unwrap().get_version_num(), 1);
    }

    #[test]
    fn test_lorem_shape() {
        let result = run::<GenerateLoremIpsumTool>(json!({ "paragraphs": 2, "words_per_paragraph": 12 }));
        assert_eq!(result["total_words"], json!(24));
        let text = result["text"].as_str().unwrap();
        let paragraphs: Vec<_> = text.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs.iter().all(|p| p.ends_with('.')));
        assert!(paragraphs[0].chars().next().unwrap().is_ascii_uppercase());
        assert_eq!(paragraphs[1].split(' ').count(), 12);
    }
}
