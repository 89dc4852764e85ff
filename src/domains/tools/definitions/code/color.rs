//! Color tools: format conversion, palettes and text-derived colors.

use md5::{Digest, Md5};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::sync::LazyLock;

use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
};

static RGB_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^rgba?\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)").unwrap());
static HSL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^hsla?\s*\(\s*(\d+)\s*,\s*(\d+)%?\s*,\s*(\d+)%?").unwrap());

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

/// Hue, lightness, saturation, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hls(f64, f64, f64);

impl Rgb {
    fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        let digits: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }

    fn to_hls(self) -> Hls {
        let (r, g, b) = (
            self.0 as f64 / 255.0,
            self.1 as f64 / 255.0,
            self.2 as f64 / 255.0,
        );
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let sum = max + min;
        let range = max - min;
        let l = sum / 2.0;
        if range == 0.0 {
            return Hls(0.0, l, 0.0);
        }

        let s = if l <= 0.5 { range / sum } else { range / (2.0 - sum) };
        let rc = (max - r) / range;
        let gc = (max - g) / range;
        let bc = (max - b) / range;
        let h = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        Hls((h / 6.0).rem_euclid(1.0), l, s)
    }
}

impl Hls {
    fn to_rgb(self) -> Rgb {
        let Hls(h, l, s) = self;
        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let m1 = 2.0 * l - m2;
            (
                Self::channel(m1, m2, h + 1.0 / 3.0),
                Self::channel(m1, m2, h),
                Self::channel(m1, m2, h - 1.0 / 3.0),
            )
        };
        // Truncation, matching how the components are read back.
        Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }

    fn channel(m1: f64, m2: f64, hue: f64) -> f64 {
        let hue = hue.rem_euclid(1.0);
        if hue < 1.0 / 6.0 {
            m1 + (m2 - m1) * hue * 6.0
        } else if hue < 0.5 {
            m2
        } else if hue < 2.0 / 3.0 {
            m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
        } else {
            m1
        }
    }

    /// Integer degrees and percentages.
    fn rounded(self) -> (u32, u32, u32) {
        (
            (self.0 * 360.0) as u32,
            (self.2 * 100.0) as u32,
            (self.1 * 100.0) as u32,
        )
    }
}

fn component(text: &str, max: u32, what: &str) -> Result<u32, ToolFailure> {
    text.parse::<u32>()
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| ToolFailure::execution(format!("Could not parse color: {} out of range", what)))
}

fn parse_color(color: &str) -> Result<Rgb, ToolFailure> {
    let lower = color.to_lowercase();

    if color.starts_with('#') {
        return Rgb::parse_hex(color)
            .ok_or_else(|| ToolFailure::execution(format!("Could not parse color: invalid hex {}", color)));
    }

    if lower.starts_with("rgb") {
        let caps = RGB_FORMAT
            .captures(color)
            .ok_or_else(|| ToolFailure::execution("Could not parse color: malformed rgb()"))?;
        return Ok(Rgb(
            component(&caps[1], 255, "red")? as u8,
            component(&caps[2], 255, "green")? as u8,
            component(&caps[3], 255, "blue")? as u8,
        ));
    }

    if lower.starts_with("hsl") {
        let caps = HSL_FORMAT
            .captures(color)
            .ok_or_else(|| ToolFailure::execution("Could not parse color: malformed hsl()"))?;
        let h = component(&caps[1], 360, "hue")? as f64 / 360.0;
        let s = component(&caps[2], 100, "saturation")? as f64 / 100.0;
        let l = component(&caps[3], 100, "lightness")? as f64 / 100.0;
        return Ok(Hls(h, l, s).to_rgb());
    }

    Err(ToolFailure::execution(format!(
        "Could not parse color: unrecognized format {}",
        color
    )))
}

// ============================================================================
// convert_color
// ============================================================================

/// Parameters for the color conversion tool.
#[derive(Debug, Deserialize)]
struct ConvertColorParams {
    /// Input color as hex, `rgb(...)` or `hsl(...)`.
    color: String,

    /// Target format
    to_format: String,
}

/// Convert a color between HEX, RGB and HSL notations.
pub struct ConvertColorTool;

impl ToolDefinition for ConvertColorTool {
    const NAME: &'static str = "convert_color";
    const DESCRIPTION: &'static str =
        "Convert colors between HEX, RGB, and HSL formats (e.g. \"#FF5733\", \"rgb(255, 87, 51)\", \"hsl(11, 100%, 60%)\").";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("color", ParamType::String).describe("Color in any supported format."),
            ParameterSpec::optional("to_format", ParamType::one_of(["hex", "rgb", "hsl"]))
                .with_default("hex")
                .describe("Target format."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: ConvertColorParams = args.parse()?;
        let input = params.color.trim();
        let rgb = parse_color(input)?;
        let (h, s, l) = rgb.to_hls().rounded();

        let hex = rgb.hex();
        let css = rgb.css();
        let hsl = format!("hsl({}, {}%, {}%)", h, s, l);
        let converted = match params.to_format.as_str() {
            "rgb" => css.clone(),
            "hsl" => hsl.clone(),
            _ => hex.clone(),
        };

        Ok(json!({
            "input": input,
            "hex": hex,
            "rgb": css,
            "hsl": hsl,
            "converted": converted,
            "values": {
                "r": rgb.0, "g": rgb.1, "b": rgb.2,
                "h": h, "s": s, "l": l,
            },
        })
        .into())
    }
}

// ============================================================================
// generate_color_palette
// ============================================================================

/// Parameters for the palette tool.
#[derive(Debug, Deserialize)]
struct ColorPaletteParams {
    /// Hex color the palette is built around.
    base_color: String,

    /// Palette scheme (complementary, analogous, triadic, shades)
    palette_type: String,
}

/// Palettes derived by rotating hue or stepping lightness.
pub struct GenerateColorPaletteTool;

impl GenerateColorPaletteTool {
    fn palette(base: Hls, palette_type: &str) -> Vec<Hls> {
        let Hls(h, l, s) = base;
        let hue = |offset: f64| Hls((h + offset).rem_euclid(1.0), l, s);
        match palette_type {
            "complementary" => vec![base, hue(0.5)],
            "analogous" => vec![hue(-0.083), base, hue(0.083)],
            "triadic" => vec![base, hue(0.333), hue(0.666)],
            _ => vec![
                Hls(h, (l - 0.3).max(0.1), s),
                Hls(h, (l - 0.15).max(0.2), s),
                base,
                Hls(h, (l + 0.15).min(0.8), s),
                Hls(h, (l + 0.3).min(0.9), s),
            ],
        }
    }
}

impl ToolDefinition for GenerateColorPaletteTool {
    const NAME: &'static str = "generate_color_palette";
    const DESCRIPTION: &'static str = "Generate a color palette from a base HEX color.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("base_color", ParamType::String)
                .describe("Base color in HEX format (e.g. \"#FF5733\")."),
            ParameterSpec::optional(
                "palette_type",
                ParamType::one_of(["complementary", "analogous", "triadic", "shades"]),
            )
            .with_default("shades")
            .describe("Type of palette to generate."),
        ]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: ColorPaletteParams = args.parse()?;
        let base = Rgb::parse_hex(&params.base_color).ok_or_else(|| {
            ToolFailure::execution(format!("invalid HEX color: {}", params.base_color))
        })?;

        let colors: Vec<String> = Self::palette(base.to_hls(), &params.palette_type)
            .into_iter()
            .map(|hls| hls.to_rgb().hex())
            .collect();

        Ok(json!({
            "base_color": params.base_color,
            "palette_type": params.palette_type,
            "count": colors.len(),
            "colors": colors,
        })
        .into())
    }
}

// ============================================================================
// generate_color_from_text
// ============================================================================

/// Parameters for the color-from-text tool.
#[derive(Debug, Deserialize)]
struct ColorFromTextParams {
    /// Seed text; the same text always yields the same color.
    text: String,
}

/// Stable color for a string, with a readable foreground.
pub struct GenerateColorFromTextTool;

impl ToolDefinition for GenerateColorFromTextTool {
    const NAME: &'static str = "generate_color_from_text";
    const DESCRIPTION: &'static str =
        "Generate a consistent color from any text (useful for avatars and tags).";

    fn parameters() -> Vec<ParameterSpec> {
        vec![ParameterSpec::required("text", ParamType::String).describe("Text to derive the color from.")]
    }

    fn execute(args: &Arguments, _ctx: &ToolContext) -> ToolResult {
        let params: ColorFromTextParams = args.parse()?;
        let digest = Md5::digest(params.text.as_bytes());
        let rgb = Rgb(digest[0], digest[1], digest[2]);

        let luminance = (0.299 * rgb.0 as f64 + 0.587 * rgb.1 as f64 + 0.114 * rgb.2 as f64) / 255.0;
        let text_color = if luminance > 0.5 { "#000000" } else { "#FFFFFF" };

        Ok(json!({
            "input_text": params.text,
            "background_color": rgb.hex(),
            "text_color": text_color,
            "rgb": rgb.css(),
        })
        .into())
    }
}
