//! Everyday calculations: percentages, discounts, tips, BMI and loans.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domains::tools::definitions::common::{format_float, round_to};
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

// ============================================================================
// calculate_percentage
// ============================================================================

/// Parameters for the percentage tool.
#[derive(Debug, Deserialize)]
struct PercentageParams {
    /// The part.
    value: f64,

    /// The whole; must be non-zero.
    total: f64,
}

pub struct CalculatePercentageTool;

impl ToolDefinition for CalculatePercentageTool {
    const NAME: &'static str = "calculate_percentage";
    const DESCRIPTION: &'static str = "Calculate what percentage a value is of a total.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("value", ParamType::Float).describe("The part value."),
            ParameterSpec::required("total", ParamType::Float).describe("The whole value."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: PercentageParams = args.parse()?;
        if params.total == 0.0 {
            return Err(ToolFailure::execution("Total cannot be zero"));
        }

        let percentage = params.value / params.total * 100.0;
        Ok(json!({
            "value": params.value,
            "total": params.total,
            "percentage": round_to(percentage, 2),
            "formatted": format!("{:.2}%", percentage),
            "fraction": format!("{}/{}", format_float(params.value), format_float(params.total)),
        })
        .into())
    }
}

// ============================================================================
// calculate_discount
// ============================================================================

/// Parameters for the discount tool.
#[derive(Debug, Deserialize)]
struct DiscountParams {
    /// Price before the discount.
    original_price: f64,

    /// Discount to apply, in percent
    discount_percent: Option<f64>,

    /// Price after the discount, to derive the percent from
    final_price: Option<f64>,
}

/// Final price from a discount, or the discount from two prices.
pub struct CalculateDiscountTool;

impl ToolDefinition for CalculateDiscountTool {
    const NAME: &'static str = "calculate_discount";
    const DESCRIPTION: &'static str =
        "Calculate a discount: the final price from a percentage, or the percentage from a final price.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("original_price", ParamType::Float)
                .describe("The price before discount."),
            ParameterSpec::optional("discount_percent", ParamType::Float)
                .describe("Discount percentage (provide this or final_price)."),
            ParameterSpec::optional("final_price", ParamType::Float)
                .describe("Price after discount (provide this or discount_percent)."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: DiscountParams = args.parse()?;
        let original = params.original_price;

        match (params.discount_percent, params.final_price) {
            (Some(percent), _) => {
                let savings = original * (percent / 100.0);
                Ok(json!({
                    "original_price": original,
                    "discount_percent": percent,
                    "savings": round_to(savings, 2),
                    "final_price": round_to(original - savings, 2),
                })
                .into())
            }
            (None, Some(final_price)) => {
                if original == 0.0 {
                    return Err(ToolFailure::execution("Original price cannot be zero"));
                }
                let savings = original - final_price;
                Ok(json!({
                    "original_price": original,
                    "final_price": final_price,
                    "savings": round_to(savings, 2),
                    "discount_percent": round_to(savings / original * 100.0, 2),
                })
                .into())
            }
            (None, None) => Err(ToolFailure::execution(
                "Provide either discount_percent or final_price",
            )),
        }
    }
}

// ============================================================================
// calculate_tip
// ============================================================================

/// Parameters for the tip tool.
#[derive(Debug, Deserialize)]
struct TipParams {
    /// Bill total before tip.
    bill_amount: f64,

    /// Tip in percent
    tip_percent: f64,

    /// Number of people sharing the bill.
    split_ways: i64,
}

/// Tip and total, optionally split between people.
pub struct CalculateTipTool;

impl ToolDefinition for CalculateTipTool {
    const NAME: &'static str = "calculate_tip";
    const DESCRIPTION: &'static str =
        "Calculate tip amount and total bill, optionally split between people.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("bill_amount", ParamType::Float)
                .describe("The bill amount before tip."),
            ParameterSpec::optional("tip_percent", ParamType::Float)
                .with_default(18.0)
                .describe("Tip percentage."),
            ParameterSpec::optional("split_ways", ParamType::Integer)
                .with_default(1)
                .describe("Number of people splitting the bill."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: TipParams = args.parse()?;
        let split = params.split_ways.max(1);

        let tip = params.bill_amount * (params.tip_percent / 100.0);
        let total = params.bill_amount + tip;

        let mut result = Map::new();
        result.insert("bill_amount".into(), json!(params.bill_amount));
        result.insert("tip_percent".into(), json!(params.tip_percent));
        result.insert("tip_amount".into(), json!(round_to(tip, 2)));
        result.insert("total".into(), json!(round_to(total, 2)));

        if split > 1 {
            let ways = split as f64;
            result.insert("split_ways".into(), json!(split));
            result.insert("per_person_bill".into(), json!(round_to(params.bill_amount / ways, 2)));
            result.insert("per_person_tip".into(), json!(round_to(tip / ways, 2)));
            result.insert("per_person_total".into(), json!(round_to(total / ways, 2)));
        }

        Ok(Value::Object(result).into())
    }
}

// ============================================================================
// calculate_bmi
// ============================================================================

/// Parameters for the BMI tool.
#[derive(Debug, Deserialize)]
struct BmiParams {
    /// Weight in kilograms.
    weight_kg: f64,

    /// Height in centimetres.
    height_cm: f64,
}

pub struct CalculateBmiTool;

impl CalculateBmiTool {
    fn category(bmi: f64) -> &'static str {
        if bmi < 18.5 {
            "Underweight"
        } else if bmi < 25.0 {
            "Normal weight"
        } else if bmi < 30.0 {
            "Overweight"
        } else {
            "Obese"
        }
    }
}

impl ToolDefinition for CalculateBmiTool {
    const NAME: &'static str = "calculate_bmi";
    const DESCRIPTION: &'static str = "Calculate Body Mass Index (BMI) from weight and height.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("weight_kg", ParamType::Float).describe("Weight in kilograms."),
            ParameterSpec::required("height_cm", ParamType::Float).describe("Height in centimeters."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: BmiParams = args.parse()?;
        if params.height_cm <= 0.0 || params.weight_kg <= 0.0 {
            return Err(ToolFailure::execution("Weight and height must be positive values"));
        }

        let height_m = params.height_cm / 100.0;
        let bmi = params.weight_kg / (height_m * height_m);

        Ok(json!({
            "weight_kg": params.weight_kg,
            "height_cm": params.height_cm,
            "bmi": round_to(bmi, 1),
            "category": Self::category(bmi),
        })
        .into())
    }
}

// ============================================================================
// calculate_loan
// ============================================================================

/// Parameters for the loan tool.
#[derive(Debug, Deserialize)]
struct LoanParams {
    /// Amount borrowed.
    principal: f64,

    /// Yearly interest rate in percent.
    annual_rate: f64,

    /// Repayment term in months
    months: i64,
}

/// Fixed-rate amortized loan payment.
pub struct CalculateLoanTool;

impl ToolDefinition for CalculateLoanTool {
    const NAME: &'static str = "calculate_loan";
    const DESCRIPTION: &'static str = "Calculate monthly loan payment and total interest.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("principal", ParamType::Float).describe("Loan amount."),
            ParameterSpec::required("annual_rate", ParamType::Float)
                .describe("Annual interest rate in percent (e.g. 5.5)."),
            ParameterSpec::required("months", ParamType::Integer).describe("Loan term in months."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: LoanParams = args.parse()?;
        if params.months <= 0 || params.principal <= 0.0 {
            return Err(ToolFailure::execution(
                "Principal and months must be positive values",
            ));
        }

        let months = params.months as f64;
        let (monthly, total) = if params.annual_rate == 0.0 {
            (params.principal / months, params.principal)
        } else {
            let rate = params.annual_rate / 100.0 / 12.0;
            let growth = (1.0 + rate).powf(months);
            let monthly = params.principal * (rate * growth) / (growth - 1.0);
            (monthly, monthly * months)
        };

        Ok(json!({
            "principal": params.principal,
            "annual_rate": format!("{}%", format_float(params.annual_rate)),
            "term_months": params.months,
            "monthly_payment": round_to(monthly, 2),
            "total_payment": round_to(total, 2),
            "total_interest": round_to(total - params.principal, 2),
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolValue, validate};

    fn run<T: ToolDefinition>(raw: Value) -> ToolResult {
        let schema = T::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        T::execute(&args, &ToolContext::in_memory())
    }

    fn json_of<T: ToolDefinition>(raw: Value) -> Value {
        match run::<T>(raw).unwrap() {
            ToolValue::Json(value) => value,
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_percentage() {
        let result = json_of::<CalculatePercentageTool>(json!({ "value": 50, "total": 200 }));
        assert_eq!(result["percentage"], json!(25.0));
        assert_eq!(result["formatted"], json!("25.00%"));
        assert_eq!(result["fraction"], json!("50.0/200.0"));
    }

    #[test]
    fn test_percentage_zero_total() {
        let err = run::<CalculatePercentageTool>(json!({ "value": 1, "total": 0 })).unwrap_err();
        assert_eq!(err, ToolFailure::execution("Total cannot be zero"));
    }

    #[test]
    fn test_discount_modes() {
        let result = json_of::<CalculateDiscountTool>(json!({ "original_price": 80, "discount_percent": 25 }));
        assert_eq!(result["final_price"], json!(60.0));
        assert_eq!(result["savings"], json!(20.0));

        let result = json_of::<CalculateDiscountTool>(json!({ "original_price": 80, "final_price": 60 }));
        assert_eq!(result["discount_percent"], json!(25.0));

        assert!(run::<CalculateDiscountTool>(json!({ "original_price": 80 })).is_err());
    }

    #[test]
    fn test_tip_split() {
        let result = json_of::<CalculateTipTool>(json!({ "bill_amount": 100 }));
        assert_eq!(result["total"], json!(118.0));
        assert!(result.get("split_ways").is_none());

        let result = json_of::<CalculateTipTool>(json!({ "bill_amount": 100, "tip_percent": 20, "split_ways": 4 }));
        assert_eq!(result["per_person_total"], json!(30.0));
        assert_eq!(result["split_ways"], json!(4));
    }

    #[test]
    fn test_bmi_category() {
        let result = json_of::<CalculateBmiTool>(json!({ "weight_kg": 70, "height_cm": 175 }));
        assert_eq!(result["bmi"], json!(22.9));
        assert_eq!(result["category"], json!("Normal weight"));
        assert!(run::<CalculateBmiTool>(json!({ "weight_kg": 70, "height_cm": 0 })).is_err());
    }

    #[test]
    fn test_loan_payment() {
        let result = json_of::<CalculateLoanTool>(json!({ "principal": 1200, "annual_rate": 0, "months": 12 }));
        assert_eq!(result["monthly_payment"], json!(100.0));
        assert_eq!(result["total_interest"], json!(0.0));

        let result = json_of::<CalculateLoanTool>(json!({ "principal": 10000, "annual_rate": 6, "months": 12 }));
        assert_eq!(result["monthly_payment"], json!(860.66));
        assert_eq!(result["annual_rate"], json!("6.0%"));
    }
}
