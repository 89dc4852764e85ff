//! URL tools: parsing, building, percent-encoding, domains and slugs.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;
use url::Url;

use crate::domains::tools::definitions::common::char_len;
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").unwrap());
static SLUG_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

const SECOND_LEVEL_LABELS: [&str; 7] = ["co", "com", "net", "org", "gov", "ac", "edu"];

// ============================================================================
// parse_url
// ============================================================================

/// Parameters for the parse_url tool.
#[derive(Debug, Deserialize)]
struct ParseUrlParams {
    /// URL to split; `https://` is assumed when no scheme is given.
    url: String,
}

/// Split a URL into its components. Input without a scheme is read as https.
pub struct ParseUrlTool;

impl ParseUrlTool {
    fn parse(raw: &str) -> Result<Url, ToolFailure> {
        let trimmed = raw.trim();
        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };
        Url::parse(&candidate).map_err(|e| ToolFailure::execution(format!("invalid URL: {}", e)))
    }

    fn authority(url: &Url) -> String {
        let mut authority = String::new();
        if !url.username().is_empty() {
            authority.push_str(url.username());
            if let Some(password) = url.password() {
                authority.push(':');
                authority.push_str(password);
            }
            authority.push('@');
        }
        authority.push_str(url.host_str().unwrap_or_default());
        if let Some(port) = url.port() {
            authority.push_str(&format!(":{}", port));
        }
        authority
    }
}

impl ToolDefinition for ParseUrlTool {
    const NAME: &'static str = "parse_url";
    const DESCRIPTION: &'static str =
        "Parse a URL into scheme, domain, path, query parameters, fragment and port.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required("url", ParamType::String).describe("The URL to parse.")]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: ParseUrlParams = args.parse()?;
        let url = Self::parse(&params.url)?;

        // Repeated keys keep the last value; blank values are dropped.
        let mut query_params = Map::new();
        for (key, value) in url.query_pairs() {
            if !value.is_empty() {
                query_params.insert(key.into_owned(), Value::String(value.into_owned()));
            }
        }

        let path = match url.path() {
            "" => "/",
            path => path,
        };

        Ok(json!({
            "valid": true,
            "original_url": params.url,
            "scheme": url.scheme(),
            "domain": Self::authority(&url),
            "path": path,
            "query_string": url.query().unwrap_or_default(),
            "query_params": query_params,
            "fragment": url.fragment().unwrap_or_default(),
            "port": url.port(),
        })
        .into())
    }
}

// ============================================================================
// build_url
// ============================================================================

/// Parameters for the build_url tool.
#[derive(Debug, Deserialize)]
struct BuildUrlParams {
    /// Scheme and host, e.g. `https://example.com`.
    base_url: String,

    /// Path appended to the base
    path: String,

    /// Flat mapping encoded as the query string.
    query_params: Map<String, Value>,
}

/// Join a base URL, a path and form-encoded query parameters.
pub struct BuildUrlTool;

impl BuildUrlTool {
    fn query_pairs(params: &Map<String, Value>) -> Result<Vec<(String, String)>, ToolFailure> {
        params
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
                    _ => {
                        return Err(ToolFailure::execution(format!(
                            "query parameter {} must be a string, number or boolean",
                            key
                        )));
                    }
                };
                Ok((key.clone(), text))
            })
            .collect()
    }
}

impl ToolDefinition for BuildUrlTool {
    const NAME: &'static str = "build_url";
    const DESCRIPTION: &'static str = "Build a URL from a base URL, a path and query parameters.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("base_url", ParamType::String)
                .describe("The base URL (e.g. \"https://api.example.com\")."),
            ParameterSpec::optional("path", ParamType::String)
                .with_default("")
                .describe("Path to append (e.g. \"/users/123\")."),
            ParameterSpec::optional("query_params", ParamType::Mapping)
                .with_default(json!({}))
                .describe("Query parameters."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: BuildUrlParams = args.parse()?;
        let mut base = params.base_url;
        let mut path = params.path;

        if base.ends_with('/') && path.starts_with('/') {
            base.pop();
        } else if !base.ends_with('/') && !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }

        let mut full = format!("{}{}", base, path);
        if !params.query_params.is_empty() {
            let pairs = Self::query_pairs(&params.query_params)?;
            let query = serde_urlencoded::to_string(&pairs)
                .map_err(|e| ToolFailure::execution(format!("could not encode query: {}", e)))?;
            full.push('?');
            full.push_str(&query);
        }

        Ok(json!({
            "url": full,
            "base": base,
            "path": path,
            "params_count": params.query_params.len(),
        })
        .into())
    }
}

// ============================================================================
// encode_url
// ============================================================================

/// Parameters for the URL encoding tool.
#[derive(Debug, Deserialize)]
struct EncodeUrlParams {
    /// Text to percent-encode or decode.
    text: String,

    /// Decode instead of encode.
    decode: bool,
}

/// Percent-encode everything but unreserved characters, or decode.
pub struct EncodeUrlTool;

impl ToolDefinition for EncodeUrlTool {
    const NAME: &'static str = "encode_url";
    const DESCRIPTION: &'static str = "URL-encode or decode a string.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("text", ParamType::String).describe("Text to encode or decode."),
            ParameterSpec::optional("decode", ParamType::Boolean)
                .with_default(false)
                .describe("Decode instead of encode."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: EncodeUrlParams = args.parse()?;
        let (operation, result) = if params.decode {
            let decoded = urlencoding::decode(&params.text)
                .map_err(|e| ToolFailure::execution(format!("could not decode: {}", e)))?;
            ("decode", decoded.into_owned())
        } else {
            ("encode", urlencoding::encode(&params.text).into_owned())
        };

        Ok(json!({
            "operation": operation,
            "input": params.text,
            "result": result,
        })
        .into())
    }
}

// ============================================================================
// analyze_domain
// ============================================================================

/// Parameters for the domain analysis tool.
#[derive(Debug, Deserialize)]
struct AnalyzeDomainParams {
    /// Domain name or URL.
    domain: String,
}

/// Break a host name into labels, TLD and subdomain.
pub struct AnalyzeDomainTool;

impl ToolDefinition for AnalyzeDomainTool {
    const NAME: &'static str = "analyze_domain";
    const DESCRIPTION: &'static str =
        "Analyze a domain name (e.g. \"www.example.co.uk\"): TLD, name and subdomain.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required("domain", ParamType::String).describe("Domain name to analyze.")]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: AnalyzeDomainParams = args.parse()?;
        let stripped = SCHEME_PREFIX.replace(&params.domain, "");
        let domain = stripped.split('/').next().unwrap_or_default();
        let parts: Vec<&str> = domain.split('.').collect();

        let mut result = Map::new();
        result.insert("full_domain".into(), json!(domain));
        result.insert("parts".into(), json!(parts));
        result.insert("is_subdomain".into(), json!(parts.len() > 2));

        if let [.., name, tld] = parts.as_slice() {
            result.insert("tld".into(), json!(tld));
            result.insert("domain_name".into(), json!(name));
            if parts.len() > 2 {
                result.insert("subdomain".into(), json!(parts[..parts.len() - 2].join(".")));
                if SECOND_LEVEL_LABELS.contains(name) {
                    result.insert("possible_ccTLD".into(), json!(format!("{}.{}", name, tld)));
                }
            }
        }

        Ok(Value::Object(result).into())
    }
}

// ============================================================================
// slugify
// ============================================================================

/// Parameters for the slugify tool.
#[derive(Debug, Deserialize)]
struct SlugifyParams {
    /// Text to turn into a slug.
    text: String,

    /// Replaces whitespace and underscores
    separator: String,
}

/// Lowercase ASCII slug joined by a separator.
pub struct SlugifyTool;

impl SlugifyTool {
    fn slugify(text: &str, separator: &str) -> String {
        let spaced = SLUG_SPACING.replace_all(&text.to_lowercase(), separator).into_owned();
        let kept: String = spaced
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || separator.contains(*c))
            .collect();

        let mut slug = String::with_capacity(kept.len());
        let mut rest = kept.as_str();
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix(separator) {
                if !slug.ends_with(separator) {
                    slug.push_str(separator);
                }
                rest = after;
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    slug.push(c);
                }
                rest = chars.as_str();
            }
        }

        let mut trimmed = slug.as_str();
        while let Some(inner) = trimmed.strip_prefix(separator) {
            trimmed = inner;
        }
        while let Some(inner) = trimmed.strip_suffix(separator) {
            trimmed = inner;
        }
        trimmed.to_string()
    }
}

impl ToolDefinition for SlugifyTool {
    const NAME: &'static str = "slugify";
    const DESCRIPTION: &'static str = "Convert text to a URL-friendly slug.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("text", ParamType::String).describe("Text to convert."),
            ParameterSpec::optional("separator", ParamType::String)
                .with_default("-")
                .describe("Separator between words."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: SlugifyParams = args.parse()?;
        if params.separator.is_empty() {
            return Err(ToolFailure::execution("separator cannot be empty"));
        }

        let slug = Self::slugify(&params.text, &params.separator);
        Ok(json!({
            "original": params.text,
            "length": char_len(&slug),
            "slug": slug,
            "separator": params.separator,
        })
        .into())
    }
}
