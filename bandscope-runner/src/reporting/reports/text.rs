//! Plain-text report for terminals.

use super::ReportSummary;
use bandscope_core::Severity;

pub struct TextReportGenerator;

impl TextReportGenerator {
    pub fn generate(&self, summary: &ReportSummary) -> String {
        let mut out = String::new();
        out.push_str(&format!("File:        {}\n", summary.source));
        out.push_str(&format!("Fingerprint: {}\n", summary.fingerprint));
        out.push_str(&format!(
            "Rows:        {} ({} columns)\n",
            summary.rows, summary.columns
        ));
        out.push_str(&format!("Result:      {}\n", summary.headline()));

        out.push_str("\nColumns:\n");
        for entry in &summary.mapped {
            let tag = if entry.exact { "" } else { " (partial match)" };
            out.push_str(&format!("  {:<10} <- {}{}\n", entry.field.name(), entry.header, tag));
        }
        for field in &summary.unmapped {
            out.push_str(&format!("  {:<10} <- (not found)\n", field.name()));
        }
        if !summary.unmatched_headers.is_empty() {
            out.push_str(&format!(
                "  Unmatched headers: {}\n",
                summary.unmatched_headers.join(", ")
            ));
        }
        if !summary.valid {
            out.push_str(&format!(
                "  Detected columns:  {}\n",
                summary.headers.join(", ")
            ));
        }

        if !summary.issues.is_empty() {
            out.push_str("\nIssues:\n");
            for issue in &summary.issues {
                let marker = match issue.severity {
                    Severity::Error => "ERROR",
                    Severity::Warning => "WARN ",
                };
                out.push_str(&format!("  [{marker}] {}\n", issue.message));
                out.push_str(&format!("          {}\n", issue.suggestion));
            }
        }

        if !summary.coercion_skips.is_empty() {
            out.push_str(&format!(
                "\n{} cells could not be read and were left empty:\n",
                summary.coercion_skips.len()
            ));
            for skip in &summary.coercion_skips {
                out.push_str(&format!("  {skip}\n"));
            }
        }

        if summary.valid {
            out.push_str(&format!(
                "\nLoaded {} symbols in {} categories.\n",
                summary.symbols, summary.categories
            ));
        } else {
            out.push_str("\nThe file was not loaded. Fix the errors above and try again.\n");
        }
        out
    }
}
