//! QR payload descriptor for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::domains::tools::definitions::common::to_result;
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolResult,
};

/// Rendered size in pixels.
const QR_SIZE: u32 = 256;

/// Parameters for the QR data tool.
#[derive(Debug, Deserialize)]
struct QrDataParams {
    /// Payload to encode.
    content: String,

    /// Kind of payload (url, text, email, phone, wifi, vcard)
    qr_type: String,
}

#[derive(Debug, Serialize)]
struct QrCode {
    #[serde(rename = "_type")]
    kind: &'static str,
    content: String,
    raw_content: String,
    qr_type: String,
    size: u32,
    description: String,
}

/// Describes a QR code; rendering happens on the client.
pub struct GenerateQrDataTool;

impl GenerateQrDataTool {
    fn format_content(content: &str, qr_type: &str) -> String {
        match qr_type {
            "email" => format!("mailto:{}", content),
            "phone" => format!("tel:{}", content),
            "url" if !content.starts_with("http://") && !content.starts_with("https://") => {
                format!("https://{}", content)
            }
            _ => content.to_string(),
        }
    }
}

impl ToolDefinition for GenerateQrDataTool {
    const NAME: &'static str = "generate_qr_data";
    const DESCRIPTION: &'static str =
        "Generate a QR code data structure that the frontend can render.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("content", ParamType::String).describe("Content to encode."),
            ParameterSpec::optional(
                "qr_type",
                ParamType::one_of(["url", "text", "email", "phone", "wifi", "vcard"]),
            )
            .with_default("url")
            .describe("Kind of content."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: QrDataParams = args.parse()?;
        let head: String = params.content.chars().take(50).collect();

        to_result(&QrCode {
            kind: "qr_code",
            content: Self::format_content(&params.content, &params.qr_type),
            description: format!("QR Code for {}: {}...", params.qr_type, head),
            raw_content: params.content,
            qr_type: params.qr_type,
            size: QR_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolValue, validate};
    use serde_json::{Value, json};

    fn json_of(raw: Value) -> Value {
        let schema = GenerateQrDataTool::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        match GenerateQrDataTool::execute(&args, &ToolContext::in_memory()).unwrap() {
            ToolValue::Json(value) => value,
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_url_default_gets_scheme() {
        assert_eq!(
            json_of(json!({ "content": "example.com" })),
            json!({
                "_type": "qr_code",
                "content": "https://example.com",
                "raw_content": "example.com",
                "qr_type": "url",
                "size": 256,
                "description": "QR Code for url: example.com..."
            })
        );
    }

    #[test]
    fn test_prefixes_by_type() {
        assert_eq!(json_of(json!({ "content": "a@b.io", "qr_type": "email" }))["content"], json!("mailto:a@b.io"));
        assert_eq!(json_of(json!({ "content": "+100", "qr_type": "phone" }))["content"], json!("tel:+100"));
        assert_eq!(json_of(json!({ "content": "hi", "qr_type": "text" }))["content"], json!("hi"));
    }
}
