//! Date and time tools.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domains::tools::definitions::common::round_to;
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(text: &str) -> Result<NaiveDate, ToolFailure> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
        ToolFailure::execution(format!("Invalid date format. Use YYYY-MM-DD. Error: {}", e))
    })
}

// ============================================================================
// get_current_datetime
// ============================================================================

/// Parameters for the current datetime tool.
#[derive(Debug, Deserialize)]
struct CurrentDatetimeParams {
    /// Offset from UTC in whole hours.
    timezone_offset_hours: i64,

    /// Output format: iso, readable or unix
    format: String,
}

/// Current UTC time shifted by a whole-hour offset.
pub struct GetCurrentDatetimeTool;

impl GetCurrentDatetimeTool {
    fn render(now: NaiveDateTime, offset_hours: i64, format: &str) -> Value {
        let mut result = Map::new();
        let sign = if offset_hours >= 0 { "+" } else { "" };
        result.insert("utc_offset".into(), json!(format!("UTC{}{}", sign, offset_hours)));

        let timestamp = now.and_utc().timestamp();
        result.insert("unix_timestamp".into(), json!(timestamp));

        match format {
            "iso" => {
                result.insert("datetime".into(), json!(now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()));
            }
            "unix" => {
                result.insert("datetime".into(), json!(timestamp));
            }
            _ => {
                result.insert(
                    "datetime".into(),
                    json!(now.format("%A, %B %d, %Y at %I:%M:%S %p").to_string()),
                );
                result.insert("date".into(), json!(now.format(DATE_FORMAT).to_string()));
                result.insert("time".into(), json!(now.format("%H:%M:%S").to_string()));
            }
        }

        Value::Object(result)
    }
}

impl ToolDefinition for GetCurrentDatetimeTool {
    const NAME: &'static str = "get_current_datetime";
    const DESCRIPTION: &'static str =
        "Get the current date and time with an optional offset from UTC in hours.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional("timezone_offset_hours", ParamType::Integer)
                .with_default(0)
                .describe("Hours offset from UTC (e.g. -5 for EST)."),
            ParameterSpec::optional("format", ParamType::one_of(["iso", "readable", "unix"]))
                .with_default("readable")
                .describe("Output format."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: CurrentDatetimeParams = args.parse()?;
        if !(-24..=24).contains(&params.timezone_offset_hours) {
            return Err(ToolFailure::execution(
                "timezone_offset_hours must be between -24 and 24",
            ));
        }

        let now = Utc::now().naive_utc() + Duration::hours(params.timezone_offset_hours);
        Ok(Self::render(now, params.timezone_offset_hours, &params.format).into())
    }
}

// ============================================================================
// calculate_date_difference
// ============================================================================

/// Parameters for the date difference tool.
#[derive(Debug, Deserialize)]
struct DateDifferenceParams {
    /// First date (YYYY-MM-DD).
    date1: String,

    /// Second date (YYYY-MM-DD).
    date2: String,
}

pub struct CalculateDateDifferenceTool;

impl ToolDefinition for CalculateDateDifferenceTool {
    const NAME: &'static str = "calculate_date_difference";
    const DESCRIPTION: &'static str = "Calculate the difference between two YYYY-MM-DD dates.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("date1", ParamType::String).describe("First date (YYYY-MM-DD)."),
            ParameterSpec::required("date2", ParamType::String).describe("Second date (YYYY-MM-DD)."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: DateDifferenceParams = args.parse()?;
        let first = parse_date(&params.date1)?;
        let second = parse_date(&params.date2)?;

        let days = (second - first).num_days().abs();
        let span = days as f64;

        Ok(json!({
            "date1": params.date1,
            "date2": params.date2,
            "difference": {
                "days": days,
                "weeks": round_to(span / 7.0, 1),
                "months": round_to(span / 30.44, 1),
                "years": round_to(span / 365.25, 2),
            },
            "is_date2_after_date1": second > first,
        })
        .into())
    }
}

// ============================================================================
// add_days_to_date
// ============================================================================

/// Parameters for the add days tool.
#[derive(Debug, Deserialize)]
struct AddDaysParams {
    /// Start date (YYYY-MM-DD).
    date: String,

    /// Days to add; negative values go back in time.
    days: i64,
}

pub struct AddDaysToDateTool;

impl ToolDefinition for AddDaysToDateTool {
    const NAME: &'static str = "add_days_to_date";
    const DESCRIPTION: &'static str = "Add (or subtract, with a negative count) days to a date.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("date", ParamType::String)
                .describe("Starting date (YYYY-MM-DD)."),
            ParameterSpec::required("days", ParamType::Integer)
                .describe("Days to add; negative to subtract."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: AddDaysParams = args.parse()?;
        let start = parse_date(&params.date)?;
        let result = Duration::try_days(params.days)
            .and_then(|delta| start.checked_add_signed(delta))
            .ok_or_else(|| ToolFailure::execution("Resulting date is out of range"))?;

        Ok(json!({
            "original_date": params.date,
            "days_added": params.days,
            "result_date": result.format(DATE_FORMAT).to_string(),
            "result_formatted": result.format("%A, %B %d, %Y").to_string(),
            "day_of_week": result.format("%A").to_string(),
        })
        .into())
    }
}
