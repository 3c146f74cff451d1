mod assemble;
mod error;
mod format;
mod render;

pub use assemble::assemble;
pub use error::ReportError;
pub use format::sexagesimal;
pub use render::{write_html_report, write_json_report, ReportContext, DEFAULT_PLACEHOLDER};
