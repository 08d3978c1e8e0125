//! Validation report rendering.

pub mod reports;

use std::fmt;
use std::str::FromStr;

pub use reports::{MappingEntry, MarkdownReportGenerator, ReportSummary, TextReportGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Markdown => f.write_str("markdown"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}' (expected text, markdown or json)")),
        }
    }
}

/// Render a summary in the requested format.
pub fn render(summary: &ReportSummary, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(TextReportGenerator.generate(summary)),
        ReportFormat::Markdown => Ok(MarkdownReportGenerator.generate(summary)),
        ReportFormat::Json => serde_json::to_string_pretty(summary),
    }
}
