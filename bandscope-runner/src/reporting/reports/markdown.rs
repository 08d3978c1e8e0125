//! Markdown report generator.

use super::ReportSummary;

pub struct MarkdownReportGenerator;

impl MarkdownReportGenerator {
    pub fn generate(&self, summary: &ReportSummary) -> String {
        let mut report = format!(
            "# Bandscope Validation Report\n\n\
Source: `{}`\n\n\
Fingerprint: `{}`\n\n\
Generated: {}\n\n\
## Summary\n\
- Status: {}\n\
- Rows: {}\n\
- Columns: {}\n\
- Errors: {}\n\
- Warnings: {}\n",
            summary.source,
            summary.fingerprint,
            summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            if summary.valid { "valid" } else { "invalid" },
            summary.rows,
            summary.columns,
            summary.error_count,
            summary.warning_count,
        );

        if summary.valid {
            report.push_str(&format!(
                "- Symbols: {}\n- Categories: {}\n",
                summary.symbols, summary.categories
            ));
            if let (Some(first), Some(last)) = (summary.years.first(), summary.years.last()) {
                report.push_str(&format!("- Years: {first} to {last}\n"));
            }
        }

        report.push_str("\n## Column Mapping\n\n");
        report.push_str("| Field | Header | Match |\n");
        report.push_str("|-------|--------|-------|\n");
        for entry in &summary.mapped {
            report.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.field,
                escape_cell(&entry.header),
                if entry.exact { "exact" } else { "partial" }
            ));
        }
        for field in &summary.unmapped {
            report.push_str(&format!("| {field} | — | missing |\n"));
        }
        if !summary.unmatched_headers.is_empty() {
            let list: Vec<String> = summary
                .unmatched_headers
                .iter()
                .map(|h| format!("`{}`", escape_cell(h)))
                .collect();
            report.push_str(&format!("\nUnmatched headers: {}\n", list.join(", ")));
        }

        if !summary.issues.is_empty() {
            report.push_str("\n## Issues\n\n");
            report.push_str("| # | Severity | Field | Message | Solution |\n");
            report.push_str("|---|----------|-------|---------|----------|\n");
            for (i, issue) in summary.issues.iter().enumerate() {
                report.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    i + 1,
                    issue.severity,
                    issue.field,
                    escape_cell(&issue.message),
                    escape_cell(&issue.suggestion),
                ));
            }
        }

        if !summary.coercion_skips.is_empty() {
            report.push_str("\n## Cells Left Empty\n\n");
            report.push_str("| Row | Field | Value |\n");
            report.push_str("|-----|-------|-------|\n");
            for skip in &summary.coercion_skips {
                report.push_str(&format!(
                    "| {} | {} | `{}` |\n",
                    skip.row,
                    skip.field,
                    escape_cell(&skip.raw)
                ));
            }
        }

        report
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
