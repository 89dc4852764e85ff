//! Finance tools.

use chrono::Local;
use serde::Deserialize;

use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolResult, ToolValue,
};

const PRICE_PER_CHAR: f64 = 50.25;

/// Parameters for the stock price tool.
#[derive(Debug, Deserialize)]
struct GetStockPriceParams {
    /// Ticker symbol, e.g. NVDA.
    ticker: String,

    /// Market the ticker trades on
    market: String,
}

/// Simulated stock quote derived from the ticker symbol.
pub struct GetStockPriceTool;

impl GetStockPriceTool {
    fn price(ticker: &str) -> f64 {
        ticker.chars().count() as f64 * PRICE_PER_CHAR
    }
}

impl ToolDefinition for GetStockPriceTool {
    const NAME: &'static str = "get_stock_price";
    const DESCRIPTION: &'static str =
        "Retrieve the current simulated stock price for a given ticker.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("ticker", ParamType::String)
                .describe("The stock symbol (e.g., AAPL, NVDA)."),
            ParameterSpec::required("market", ParamType::one_of(["US", "EU", "ASIA"]))
                .describe("The region of the market."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: GetStockPriceParams = args.parse()?;
        let now = Local::now().format("%H:%M:%S");

        Ok(ToolValue::Text(format!(
            "[{}] {} ({}): ${:.2}",
            now,
            params.ticker.to_uppercase(),
            params.market,
            Self::price(&params.ticker)
        )))
    }
}
