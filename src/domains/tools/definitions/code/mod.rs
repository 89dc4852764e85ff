//! Developer tools: regex testing, color math, escaping and code statistics.

mod color;
mod pattern;
mod text;

pub use color::{ConvertColorTool, GenerateColorFromTextTool, GenerateColorPaletteTool};
pub use pattern::TestRegexTool;
pub use text::{CountCodeLinesTool, DiffTextTool, EscapeStringTool, MinifyJsonTool};
