//! Everyday utilities: generators, text helpers, calculators, unit
//! conversions and date arithmetic.

mod convert;
mod datetime;
mod math;
mod random;
mod text;

pub use convert::{ConvertDataSizeTool, ConvertLengthTool, ConvertTemperatureTool, ConvertWeightTool};
pub use datetime::{AddDaysToDateTool, CalculateDateDifferenceTool, GetCurrentDatetimeTool};
pub use math::{
    CalculateBmiTool, CalculateDiscountTool, CalculateLoanTool, CalculatePercentageTool,
    CalculateTipTool,
};
pub use random::{GenerateLoremIpsumTool, GeneratePasswordTool, GenerateUuidTool};
pub use text::{EncodeBase64Tool, FormatJsonTool, HashTextTool, WordCountTool};
