//! Report generators.

pub mod markdown;
pub mod summary;
pub mod text;

pub use markdown::MarkdownReportGenerator;
pub use summary::{MappingEntry, ReportSummary};
pub use text::TextReportGenerator;
