//! Tool definitions module.
//!
//! Each area lives in its own module; [`build_registry`] registers every
//! tool exactly once, in the order callers see them listed.

pub mod analytics;
pub mod code;
pub mod common;
pub mod data;
pub mod finance;
pub mod utilities;
pub mod visualization;
pub mod web;

use tracing::info;

use super::registry::{RegistryError, ToolRegistry};

use analytics::{AnalyzeSentimentKeywordTool, CalculateMetricsTool};
use code::{
    ConvertColorTool, CountCodeLinesTool, DiffTextTool, EscapeStringTool,
    GenerateColorFromTextTool, GenerateColorPaletteTool, MinifyJsonTool, TestRegexTool,
};
use data::GetUserDataTool;
use finance::GetStockPriceTool;
use utilities::{
    AddDaysToDateTool, CalculateBmiTool, CalculateDateDifferenceTool, CalculateDiscountTool,
    CalculateLoanTool, CalculatePercentageTool, CalculateTipTool, ConvertDataSizeTool,
    ConvertLengthTool, ConvertTemperatureTool, ConvertWeightTool, EncodeBase64Tool,
    FormatJsonTool, GenerateLoremIpsumTool, GeneratePasswordTool, GenerateUuidTool,
    GetCurrentDatetimeTool, HashTextTool, WordCountTool,
};
use visualization::{
    GenerateBarChartTool, GenerateComparisonChartTool, GenerateDoughnutChartTool,
    GenerateLineChartTool, GeneratePieChartTool,
};
use web::{
    AnalyzeDomainTool, BuildUrlTool, EncodeUrlTool, ExtractEmailsTool, ExtractHashtagsTool,
    ExtractMentionsTool, ExtractUrlsTool, GenerateQrDataTool, ParseUrlTool, SlugifyTool,
    ValidateEmailTool,
};

/// Build the registry holding every available tool.
///
/// Fails if two tools share a name or a tool declares an invalid schema.
pub fn build_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();

    // Analytics, finance, data
    registry.register_tool::<CalculateMetricsTool>()?;
    registry.register_tool::<AnalyzeSentimentKeywordTool>()?;
    registry.register_tool::<GetStockPriceTool>()?;
    registry.register_tool::<GetUserDataTool>()?;

    // Visualization
    registry.register_tool::<GeneratePieChartTool>()?;
    registry.register_tool::<GenerateBarChartTool>()?;
    registry.register_tool::<GenerateLineChartTool>()?;
    registry.register_tool::<GenerateDoughnutChartTool>()?;
    registry.register_tool::<GenerateComparisonChartTool>()?;

    // Utilities
    registry.register_tool::<GeneratePasswordTool>()?;
    registry.register_tool::<GenerateUuidTool>()?;
    registry.register_tool::<HashTextTool>()?;
    registry.register_tool::<EncodeBase64Tool>()?;
    registry.register_tool::<WordCountTool>()?;
    registry.register_tool::<CalculatePercentageTool>()?;
    registry.register_tool::<CalculateDiscountTool>()?;
    registry.register_tool::<CalculateTipTool>()?;
    registry.register_tool::<CalculateBmiTool>()?;
    registry.register_tool::<CalculateLoanTool>()?;
    registry.register_tool::<ConvertTemperatureTool>()?;
    registry.register_tool::<ConvertLengthTool>()?;
    registry.register_tool::<ConvertWeightTool>()?;
    registry.register_tool::<ConvertDataSizeTool>()?;
    registry.register_tool::<GetCurrentDatetimeTool>()?;
    registry.register_tool::<CalculateDateDifferenceTool>()?;
    registry.register_tool::<AddDaysToDateTool>()?;
    registry.register_tool::<FormatJsonTool>()?;
    registry.register_tool::<GenerateLoremIpsumTool>()?;

    // Web
    registry.register_tool::<ParseUrlTool>()?;
    registry.register_tool::<BuildUrlTool>()?;
    registry.register_tool::<EncodeUrlTool>()?;
    registry.register_tool::<ExtractEmailsTool>()?;
    registry.register_tool::<ExtractUrlsTool>()?;
    registry.register_tool::<ValidateEmailTool>()?;
    registry.register_tool::<GenerateQrDataTool>()?;
    registry.register_tool::<ExtractHashtagsTool>()?;
    registry.register_tool::<ExtractMentionsTool>()?;
    registry.register_tool::<AnalyzeDomainTool>()?;
    registry.register_tool::<SlugifyTool>()?;

    // Code
    registry.register_tool::<TestRegexTool>()?;
    registry.register_tool::<ConvertColorTool>()?;
    registry.register_tool::<GenerateColorPaletteTool>()?;
    registry.register_tool::<EscapeStringTool>()?;
    registry.register_tool::<DiffTextTool>()?;
    registry.register_tool::<MinifyJsonTool>()?;
    registry.register_tool::<CountCodeLinesTool>()?;
    registry.register_tool::<GenerateColorFromTextTool>()?;

    info!("Registered {} operations", registry.len());
    Ok(registry)
}
