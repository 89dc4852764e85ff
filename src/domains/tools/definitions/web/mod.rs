//! Web tools: URLs, domains, text extraction and QR payloads.

mod extract;
mod qr;
mod urls;

pub use extract::{
    ExtractEmailsTool, ExtractHashtagsTool, ExtractMentionsTool, ExtractUrlsTool, ValidateEmailTool,
};
pub use qr::GenerateQrDataTool;
pub use urls::{AnalyzeDomainTool, BuildUrlTool, EncodeUrlTool, ParseUrlTool, SlugifyTool};
