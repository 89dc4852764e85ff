//! Analytics tools: conversion metrics and keyword scoring.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::common::char_len;
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
    ToolValue,
};

const POSITIVE_WORDS: &[&str] = &["good", "great", "excellent", "amazing", "success", "profit"];

// ============================================================================
// calculate_metrics
// ============================================================================

/// Parameters for the calculate_metrics tool.
#[derive(Debug, Deserialize)]
struct CalculateMetricsParams {
    /// Total number of visits.
    visits: i64,

    /// Visits that converted
    conversions: i64,
}

/// Conversion rate from visits and conversions.
pub struct CalculateMetricsTool;

impl ToolDefinition for CalculateMetricsTool {
    const NAME: &'static str = "calculate_metrics";
    const DESCRIPTION: &'static str =
        "Calculate the conversion rate percentage based on visits and conversions.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("visits", ParamType::Integer).describe("Total number of visits."),
            ParameterSpec::required("conversions", ParamType::Integer)
                .describe("Number of conversions."),
        ]
    }

    #[instrument(skip_all)]
    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: CalculateMetricsParams = args.parse()?;
        if params.visits == 0 {
            return Err(ToolFailure::execution("Visits cannot be zero."));
        }

        let rate = params.conversions as f64 / params.visits as f64 * 100.0;
        Ok(ToolValue::Text(format!("Conversion Rate: {:.2}%", rate)))
    }
}

// ============================================================================
// analyze_sentiment_keyword
// ============================================================================

/// Parameters for the sentiment keyword tool.
#[derive(Debug, Deserialize)]
struct AnalyzeSentimentParams {
    /// Text to scan for sentiment keywords.
    text: String,
}

/// Simulated sentiment scoring based on a fixed list of positive words.
pub struct AnalyzeSentimentKeywordTool;

impl ToolDefinition for AnalyzeSentimentKeywordTool {
    const NAME: &'static str = "analyze_sentiment_keyword";
    const DESCRIPTION: &'static str =
        "Analyze a string for positive-sounding keywords and return a simple score.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required("text", ParamType::String).describe("The text to analyze.")]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: AnalyzeSentimentParams = args.parse()?;
        let found: Vec<&str> = params
            .text
            .split_whitespace()
            .filter(|word| POSITIVE_WORDS.contains(&word.to_lowercase().as_str()))
            .collect();

        Ok(json!({
            "text_length": char_len(&params.text),
            "positive_keywords_found": found,
            "score": found.len() * 10,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{Schema, validate};
    use serde_json::{Value, json};

    fn run<T: ToolDefinition>(raw: Value) -> ToolResult {
        let schema: Schema = T::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        T::execute(&args, &ToolContext::in_memory())
    }

    #[test]
    fn test_conversion_rate() {
        let result = run::<CalculateMetricsTool>(json!({ "visits": 8, "conversions": 1 })).unwrap();
        assert_eq!(result, ToolValue::Text("Conversion Rate: 12.50%".into()));
    }

    #[test]
    fn test_zero_visits() {
        let err = run::<CalculateMetricsTool>(json!({ "visits": 0, "conversions": 1 })).unwrap_err();
        assert_eq!(err, ToolFailure::execution("Visits cannot be zero."));
    }

    #[test]
    fn test_sentiment_keywords() {
        let result =
            run::<AnalyzeSentimentKeywordTool>(json!({ "text": "Great quarter, good PROFIT" })).unwrap();
        assert_eq!(
            result,
            ToolValue::Json(json!({
                "text_length": 26,
                "positive_keywords_found": ["Great", "good", "PROFIT"],
                "score": 30
            }))
        );
    }
}
