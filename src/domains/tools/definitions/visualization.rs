//! Chart descriptors.
//!
//! Every tool here returns the same envelope, tagged `"_type": "chart"`, that
//! a client renders with a Chart.js style library:
//!
//! ```json
//! { "_type": "chart", "chartType": "pie", "title": "...", "data": {...}, "options": {...} }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::common::to_result;
use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

const CHART_PIE: &str = "pie";
const CHART_BAR: &str = "bar";
const CHART_LINE: &str = "line";
const CHART_DOUGHNUT: &str = "doughnut";

const SLICE_COLORS: [&str; 10] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#E7E9ED", "#7C4DFF",
    "#00E676", "#FF5252",
];
const SERIES_COLORS: [&str; 5] = ["#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF"];
const COMPARISON_COLORS: [&str; 2] = ["#36A2EB", "#FF6384"];

#[derive(Debug, Serialize)]
struct Chart {
    #[serde(rename = "_type")]
    kind: &'static str,
    #[serde(rename = "chartType")]
    chart_type: &'static str,
    title: String,
    data: Value,
    options: Value,
}

impl Chart {
    fn build(chart_type: &'static str, title: String, data: Value, options: Value) -> ToolResult {
        to_result(&Self {
            kind: "chart",
            chart_type,
            title,
            data,
            options,
        })
    }
}

fn ensure_same_length(labels: &[String], values: &[f64]) -> Result<(), ToolFailure> {
    if labels.len() != values.len() {
        return Err(ToolFailure::execution("Labels and values must have the same length"));
    }
    Ok(())
}

/// Caller colors, or the default palette cut to one color per slice.
fn slice_colors(colors: Option<Vec<String>>, slices: usize) -> Vec<String> {
    match colors {
        Some(colors) if !colors.is_empty() => colors,
        _ => SLICE_COLORS.iter().take(slices).map(|c| c.to_string()).collect(),
    }
}

fn slice_data(labels: &[String], values: &[f64], colors: Vec<String>) -> Value {
    json!({
        "labels": labels,
        "datasets": [{
            "data": values,
            "backgroundColor": colors,
            "borderColor": vec!["#ffffff"; labels.len()],
            "borderWidth": 2,
        }],
    })
}

fn labels_param() -> ParameterSpec {
    ParameterSpec::required("labels", ParamType::sequence_of(ParamType::String))
        .describe("Label for each data point.")
}

fn values_param() -> ParameterSpec {
    ParameterSpec::required("values", ParamType::sequence_of(ParamType::Float))
        .describe("Numeric value for each label.")
}

fn title_param(default: &str) -> ParameterSpec {
    ParameterSpec::optional("title", ParamType::String)
        .with_default(default)
        .describe("Chart title.")
}

fn colors_param() -> ParameterSpec {
    ParameterSpec::optional("colors", ParamType::sequence_of(ParamType::String))
        .describe("Hex colors, one per slice.")
}

// ============================================================================
// generate_pie_chart
// ============================================================================

/// Parameters for the pie chart tool.
#[derive(Debug, Deserialize)]
struct PieChartParams {
    /// Slice labels.
    labels: Vec<String>,

    /// Slice values, one per label.
    values: Vec<f64>,

    /// Chart title
    title: String,

    /// Slice colors; defaults to the built-in palette.
    colors: Option<Vec<String>>,
}

pub struct GeneratePieChartTool;

impl ToolDefinition for GeneratePieChartTool {
    const NAME: &'static str = "generate_pie_chart";
    const DESCRIPTION: &'static str = "Generate interactive pie chart data for visualization.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![labels_param(), values_param(), title_param("Pie Chart"), colors_param()]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: PieChartParams = args.parse()?;
        ensure_same_length(&params.labels, &params.values)?;

        let colors = slice_colors(params.colors, params.labels.len());
        let data = slice_data(&params.labels, &params.values, colors);
        let options = json!({
            "responsive": true,
            "plugins": {
                "legend": { "position": "right" },
                "tooltip": { "enabled": true },
            },
        });

        Chart::build(CHART_PIE, params.title, data, options)
    }
}

// ============================================================================
// generate_bar_chart
// ============================================================================

/// Parameters for the bar chart tool.
#[derive(Debug, Deserialize)]
struct BarChartParams {
    /// Category labels.
    labels: Vec<String>,

    /// Bar heights, one per label.
    values: Vec<f64>,

    /// Chart title
    title: String,

    /// Legend label for the bars.
    dataset_label: String,

    /// Bar fill color
    color: String,

    /// Draw bars horizontally.
    horizontal: bool,
}

pub struct GenerateBarChartTool;

impl ToolDefinition for GenerateBarChartTool {
    const NAME: &'static str = "generate_bar_chart";
    const DESCRIPTION: &'static str = "Generate interactive bar chart data for visualization.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            labels_param(),
            values_param(),
            title_param("Bar Chart"),
            ParameterSpec::optional("dataset_label", ParamType::String)
                .with_default("Values")
                .describe("Legend label for the dataset."),
            ParameterSpec::optional("color", ParamType::String)
                .with_default("#36A2EB")
                .describe("Bar color as hex."),
            ParameterSpec::optional("horizontal", ParamType::Boolean)
                .with_default(false)
                .describe("Render horizontal bars."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: BarChartParams = args.parse()?;
        ensure_same_length(&params.labels, &params.values)?;

        let data = json!({
            "labels": params.labels,
            "datasets": [{
                "label": params.dataset_label,
                "data": params.values,
                "backgroundColor": params.color,
                "borderColor": params.color,
                "borderWidth": 1,
            }],
        });
        let options = json!({
            "indexAxis": if params.horizontal { "y" } else { "x" },
            "responsive": true,
            "plugins": {
                "legend": { "display": true },
                "tooltip": { "enabled": true },
            },
            "scales": { "y": { "beginAtZero": true } },
        });

        Chart::build(CHART_BAR, params.title, data, options)
    }
}

// ============================================================================
// generate_line_chart
// ============================================================================

/// Parameters for the line chart tool.
#[derive(Debug, Deserialize)]
struct LineChartParams {
    /// X-axis labels.
    labels: Vec<String>,

    /// Series, each with a label and one value per x label.
    datasets: Vec<Map<String, Value>>,

    /// Chart title
    title: String,
}

/// One caller-supplied series; every field is optional.
#[derive(Debug, Deserialize)]
struct LineSeries {
    label: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
    color: Option<String>,
    #[serde(default)]
    fill: bool,
}

pub struct GenerateLineChartTool;

impl GenerateLineChartTool {
    fn series(index: usize, raw: Map<String, Value>) -> Result<Value, ToolFailure> {
        let series: LineSeries = serde_json::from_value(Value::Object(raw)).map_err(|e| {
            ToolFailure::execution(format!("dataset {} is invalid: {}", index, e))
        })?;
        let color = series
            .color
            .unwrap_or_else(|| SERIES_COLORS[index % SERIES_COLORS.len()].to_string());

        Ok(json!({
            "label": series.label.unwrap_or_else(|| format!("Series {}", index + 1)),
            "data": series.data,
            "borderColor": color,
            // 20% alpha
            "backgroundColor": format!("{}33", color),
            "fill": series.fill,
            "tension": 0.3,
        }))
    }
}

impl ToolDefinition for GenerateLineChartTool {
    const NAME: &'static str = "generate_line_chart";
    const DESCRIPTION: &'static str =
        "Generate interactive line chart data with one or more series ({label, data, color?, fill?}).";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("labels", ParamType::sequence_of(ParamType::String))
                .describe("X-axis labels."),
            ParameterSpec::required("datasets", ParamType::sequence_of(ParamType::Mapping))
                .describe("Series objects with label, data and optional color and fill."),
            title_param("Line Chart"),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: LineChartParams = args.parse()?;
        let datasets = params
            .datasets
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Self::series(i, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let data = json!({ "labels": params.labels, "datasets": datasets });
        let options = json!({
            "responsive": true,
            "plugins": {
                "legend": { "display": true },
                "tooltip": { "mode": "index", "intersect": false },
            },
            "scales": { "y": { "beginAtZero": true } },
        });

        Chart::build(CHART_LINE, params.title, data, options)
    }
}

// ============================================================================
// generate_doughnut_chart
// ============================================================================

/// Parameters for the doughnut chart tool.
#[derive(Debug, Deserialize)]
struct DoughnutChartParams {
    /// Segment labels.
    labels: Vec<String>,

    /// Segment values.
    values: Vec<f64>,

    /// Chart title
    title: String,

    /// Segment colors
    colors: Option<Vec<String>>,

    /// Size of the hole, as a CSS percentage.
    cutout: String,
}

pub struct GenerateDoughnutChartTool;

impl ToolDefinition for GenerateDoughnutChartTool {
    const NAME: &'static str = "generate_doughnut_chart";
    const DESCRIPTION: &'static str = "Generate interactive doughnut chart (pie with a hole) data.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            labels_param(),
            values_param(),
            title_param("Doughnut Chart"),
            colors_param(),
            ParameterSpec::optional("cutout", ParamType::String)
                .with_default("60%")
                .describe("Size of the center hole (e.g. \"60%\")."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: DoughnutChartParams = args.parse()?;
        ensure_same_length(&params.labels, &params.values)?;

        let colors = slice_colors(params.colors, params.labels.len());
        let data = slice_data(&params.labels, &params.values, colors);
        let options = json!({
            "responsive": true,
            "cutout": params.cutout,
            "plugins": {
                "legend": { "position": "right" },
                "tooltip": { "enabled": true },
            },
        });

        Chart::build(CHART_DOUGHNUT, params.title, data, options)
    }
}

// ============================================================================
// generate_comparison_chart
// ============================================================================

/// Parameters for the comparison chart tool.
#[derive(Debug, Deserialize)]
struct ComparisonChartParams {
    /// Shared category labels.
    categories: Vec<String>,

    /// Values for the first group.
    group_a_values: Vec<f64>,

    /// Values for the second group.
    group_b_values: Vec<f64>,

    /// Legend label for the first group
    group_a_label: String,

    /// Legend label for the second group
    group_b_label: String,

    /// Chart title
    title: String,

    /// Two colors, first group then second.
    colors: Option<Vec<String>>,
}

/// Grouped bars for two series over the same categories.
pub struct GenerateComparisonChartTool;

impl ToolDefinition for GenerateComparisonChartTool {
    const NAME: &'static str = "generate_comparison_chart";
    const DESCRIPTION: &'static str = "Generate a grouped bar chart comparing two datasets.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("categories", ParamType::sequence_of(ParamType::String))
                .describe("Category labels."),
            ParameterSpec::required("group_a_values", ParamType::sequence_of(ParamType::Float))
                .describe("Values for the first group."),
            ParameterSpec::required("group_b_values", ParamType::sequence_of(ParamType::Float))
                .describe("Values for the second group."),
            ParameterSpec::optional("group_a_label", ParamType::String).with_default("Group A"),
            ParameterSpec::optional("group_b_label", ParamType::String).with_default("Group B"),
            title_param("Comparison Chart"),
            ParameterSpec::optional("colors", ParamType::sequence_of(ParamType::String))
                .describe("Two colors: [group A, group B]."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: ComparisonChartParams = args.parse()?;
        let n = params.categories.len();
        if params.group_a_values.len() != n || params.group_b_values.len() != n {
            return Err(ToolFailure::execution("All arrays must have the same length"));
        }

        let colors = match params.colors {
            Some(colors) if colors.is_empty() => Vec::from(COMPARISON_COLORS.map(String::from)),
            Some(colors) if colors.len() < 2 => {
                return Err(ToolFailure::execution("colors must hold one color per group"));
            }
            Some(colors) => colors,
            None => Vec::from(COMPARISON_COLORS.map(String::from)),
        };

        let group = |label: String, values: Vec<f64>, color: &str| {
            json!({
                "label": label,
                "data": values,
                "backgroundColor": color,
                "borderColor": color,
                "borderWidth": 1,
            })
        };
        let data = json!({
            "labels": params.categories,
            "datasets": [
                group(params.group_a_label, params.group_a_values, &colors[0]),
                group(params.group_b_label, params.group_b_values, &colors[1]),
            ],
        });
        let options = json!({
            "responsive": true,
            "plugins": {
                "legend": { "display": true },
                "tooltip": { "enabled": true },
            },
            "scales": { "y": { "beginAtZero": true } },
        });

        Chart::build(CHART_BAR, params.title, data, options)
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
    fn test_pie_chart_shape() {
        let chart = json_of::<GeneratePieChartTool>(json!({
            "labels": ["Sales", "R&D"],
            "values": [45, "30.5"]
        }));
        assert_eq!(chart["_type"], json!("chart"));
        assert_eq!(chart["chartType"], json!("pie"));
        assert_eq!(chart["title"], json!("Pie Chart"));
        assert_eq!(chart["data"]["datasets"][0]["data"], json!([45.0, 30.5]));
        assert_eq!(chart["data"]["datasets"][0]["backgroundColor"], json!(["#FF6384", "#36A2EB"]));
        assert_eq!(chart["data"]["datasets"][0]["borderColor"], json!(["#ffffff", "#ffffff"]));
        assert_eq!(chart["options"]["plugins"]["legend"]["position"], json!("right"));
    }

    #[test]
    fn test_length_mismatch() {
        let err = run::<GeneratePieChartTool>(json!({ "labels": ["a"], "values": [1, 2] })).unwrap_err();
        assert_eq!(err, ToolFailure::execution("Labels and values must have the same length"));
    }

    #[test]
    fn test_bar_chart_horizontal() {
        let chart = json_of::<GenerateBarChartTool>(json!({
            "labels": ["Jan"],
            "values": [3],
            "horizontal": true
        }));
        assert_eq!(chart["chartType"], json!("bar"));
        assert_eq!(chart["options"]["indexAxis"], json!("y"));
        assert_eq!(chart["data"]["datasets"][0]["label"], json!("Values"));
    }

    #[test]
    fn test_line_chart_defaults() {
        let chart = json_of::<GenerateLineChartTool>(json!({
            "labels": ["Mon", "Tue"],
            "datasets": [{ "data": [1, 2] }, { "label": "B", "data": [3, 4], "color": "#000000", "fill": true }]
        }));
        let datasets = &chart["data"]["datasets"];
        assert_eq!(datasets[0]["label"], json!("Series 1"));
        assert_eq!(datasets[0]["borderColor"], json!("#FF6384"));
        assert_eq!(datasets[0]["backgroundColor"], json!("#FF638433"));
        assert_eq!(datasets[1]["fill"], json!(true));
        assert_eq!(datasets[1]["backgroundColor"], json!("#00000033"));
    }

    #[test]
    fn test_line_chart_bad_series() {
        let err = run::<GenerateLineChartTool>(json!({
            "labels": [],
            "datasets": [{ "label": 5 }]
        }))
        .unwrap_err();
        assert!(matches!(err, ToolFailure::Execution(_)));
    }

    #[test]
    fn test_doughnut_cutout() {
        let chart = json_of::<GenerateDoughnutChartTool>(json!({
            "labels": ["a"],
            "values": [1],
            "cutout": "70%"
        }));
        assert_eq!(chart["chartType"], json!("doughnut"));
        assert_eq!(chart["options"]["cutout"], json!("70%"));
    }

    #[test]
    fn test_comparison_chart() {
        let chart = json_of::<GenerateComparisonChartTool>(json!({
            "categories": ["Q1", "Q2"],
            "group_a_values": [1, 2],
            "group_b_values": [3, 4]
        }));
        assert_eq!(chart["chartType"], json!("bar"));
        assert_eq!(chart["data"]["datasets"][1]["label"], json!("Group B"));
        assert_eq!(chart["data"]["datasets"][1]["backgroundColor"], json!("#FF6384"));

        assert!(run::<GenerateComparisonChartTool>(json!({
            "categories": ["Q1"],
            "group_a_values": [1],
            "group_b_values": []
        }))
        .is_err());
    }
}
