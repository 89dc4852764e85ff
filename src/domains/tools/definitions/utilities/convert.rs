//! Unit conversions.
//!
//! Every converter goes through a base unit (celsius, meters, grams, bytes)
//! and shares the same output shape: `original`, `converted`, `formatted`.

use serde::Deserialize;
use serde_json::json;

use crate::domains::tools::definitions::common::{format_float, round_to};
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

/// Parameters for the unit conversion tool.
#[derive(Debug, Deserialize)]
struct ConversionParams {
    /// Value to convert.
    value: f64,

    /// Unit of `value`.
    from_unit: String,

    /// Unit to convert into.
    to_unit: String,
}

fn conversion_parameters(units: &[&str]) -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::required("value", ParamType::Float).describe("Value to convert."),
        ParameterSpec::required("from_unit", ParamType::one_of(units.iter().copied()))
            .describe("Source unit."),
        ParameterSpec::required("to_unit", ParamType::one_of(units.iter().copied()))
            .describe("Target unit."),
    ]
}

/// Linear conversion through a factor table.
fn convert_linear(args: &Arguments, factors: &[(&str, f64)]) -> ToolResult {
    let params: ConversionParams = args.parse()?;
    let factor = |unit: &str| {
        factors
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, f)| *f)
            .ok_or_else(|| ToolFailure::internal(format!("no factor for unit {}", unit)))
    };

    let base = params.value * factor(&params.from_unit)?;
    let converted = round_to(base / factor(&params.to_unit)?, 6);

    Ok(json!({
        "original": format!("{} {}", format_float(params.value), params.from_unit),
        "converted": converted,
        "formatted": format!("{} {}", format_float(converted), params.to_unit),
    })
    .into())
}

// ============================================================================
// convert_temperature
// ============================================================================

const TEMPERATURE_UNITS: [&str; 3] = ["celsius", "fahrenheit", "kelvin"];

pub struct ConvertTemperatureTool;

impl ConvertTemperatureTool {
    fn to_celsius(value: f64, unit: &str) -> f64 {
        match unit {
            "fahrenheit" => (value - 32.0) * 5.0 / 9.0,
            "kelvin" => value - 273.15,
            _ => value,
        }
    }

    fn from_celsius(celsius: f64, unit: &str) -> f64 {
        match unit {
            "fahrenheit" => celsius * 9.0 / 5.0 + 32.0,
            "kelvin" => celsius + 273.15,
            _ => celsius,
        }
    }

    fn symbol(unit: &str) -> String {
        unit.chars().take(1).flat_map(char::to_uppercase).collect()
    }
}

impl ToolDefinition for ConvertTemperatureTool {
    const NAME: &'static str = "convert_temperature";
    const DESCRIPTION: &'static str = "Convert temperature between Celsius, Fahrenheit, and Kelvin.";

    fn parameters() -> Vec<ParameterSpec> {
        conversion_parameters(&TEMPERATURE_UNITS)
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: ConversionParams = args.parse()?;
        let celsius = Self::to_celsius(params.value, &params.from_unit);
        let converted = round_to(Self::from_celsius(celsius, &params.to_unit), 2);

        Ok(json!({
            "original": format!("{}°{}", format_float(params.value), Self::symbol(&params.from_unit)),
            "converted": converted,
            "formatted": format!("{}°{}", format_float(converted), Self::symbol(&params.to_unit)),
        })
        .into())
    }
}

// ============================================================================
// convert_length
// ============================================================================

const LENGTH_FACTORS: [(&str, f64); 8] = [
    ("mm", 0.001),
    ("cm", 0.01),
    ("m", 1.0),
    ("km", 1000.0),
    ("inch", 0.0254),
    ("foot", 0.3048),
    ("yard", 0.9144),
    ("mile", 1609.34),
];

pub struct ConvertLengthTool;

impl ToolDefinition for ConvertLengthTool {
    const NAME: &'static str = "convert_length";
    const DESCRIPTION: &'static str = "Convert length between metric and imperial units.";

    fn parameters() -> Vec<ParameterSpec> {
        conversion_parameters(&LENGTH_FACTORS.map(|(unit, _)| unit))
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        convert_linear(args, &LENGTH_FACTORS)
    }
}

// ============================================================================
// convert_weight
// ============================================================================

const WEIGHT_FACTORS: [(&str, f64); 6] = [
    ("mg", 0.001),
    ("g", 1.0),
    ("kg", 1000.0),
    ("oz", 28.3495),
    ("lb", 453.592),
    ("ton", 907185.0),
];

pub struct ConvertWeightTool;

impl ToolDefinition for ConvertWeightTool {
    const NAME: &'static str = "convert_weight";
    const DESCRIPTION: &'static str = "Convert weight between metric and imperial units.";

    fn parameters() -> Vec<ParameterSpec> {
        conversion_parameters(&WEIGHT_FACTORS.map(|(unit, _)| unit))
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        convert_linear(args, &WEIGHT_FACTORS)
    }
}

// ============================================================================
// convert_data_size
// ============================================================================

const DATA_SIZE_FACTORS: [(&str, f64); 6] = [
    ("B", 1.0),
    ("KB", 1024.0),
    ("MB", 1_048_576.0),
    ("GB", 1_073_741_824.0),
    ("TB", 1_099_511_627_776.0),
    ("PB", 1_125_899_906_842_624.0),
];

pub struct ConvertDataSizeTool;

impl ToolDefinition for ConvertDataSizeTool {
    const NAME: &'static str = "convert_data_size";
    const DESCRIPTION: &'static str = "Convert data size between B, KB, MB, GB, TB and PB (base 1024).";

    fn parameters() -> Vec<ParameterSpec> {
        conversion_parameters(&DATA_SIZE_FACTORS.map(|(unit, _)| unit))
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        convert_linear(args, &DATA_SIZE_FACTORS)
    }
}
