//! Panel 1, Data: file, column mapping and validation report.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use bandscope_core::{Field, Severity};
use bandscope_runner::ProcessOutcome;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let para = Paragraph::new(lines(app))
        .wrap(Wrap { trim: false })
        .scroll((app.report_scroll, 0));
    f.render_widget(para, area);
}

pub fn lines(app: &AppState) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    let Some(outcome) = &app.outcome else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("No file loaded.", theme::muted())));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press o to open a valuation CSV (English or Chinese headers).",
            theme::muted(),
        )));
        lines.push(Line::from(""));
        lines.push(field("Config", app.config_source.to_string()));
        return lines;
    };

    header(&mut lines, outcome, app);
    mapping(&mut lines, outcome, app);
    issues(&mut lines, outcome);
    skips(&mut lines, outcome);
    footer(&mut lines, app);
    lines
}

fn header(lines: &mut Vec<Line<'static>>, outcome: &ProcessOutcome, app: &AppState) {
    lines.push(field("File", outcome.source_label()));
    lines.push(field("Fingerprint", outcome.short_fingerprint().to_string()));
    lines.push(field(
        "Rows",
        format!("{} rows, {} columns", outcome.row_count, outcome.headers.len()),
    ));
    lines.push(field("Config", app.config_source.to_string()));

    let report = &outcome.report;
    let result = if report.is_empty() {
        Span::styled("Validation passed with no issues", theme::positive())
    } else if report.is_valid() {
        Span::styled(
            format!("Valid with {} warnings", report.warning_count()),
            theme::warning(),
        )
    } else {
        Span::styled(
            format!(
                "{} errors, {} warnings",
                report.error_count(),
                report.warning_count()
            ),
            theme::negative(),
        )
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{:>12}  ", "Result"), theme::muted()),
        result,
    ]));
    lines.push(Line::from(""));
}

fn mapping(lines: &mut Vec<Line<'static>>, outcome: &ProcessOutcome, app: &AppState) {
    lines.push(section("Column Mapping"));
    let specs = app.config.column_specs();
    for f in Field::ALL {
        let required = specs.iter().any(|s| s.field == f && s.required);
        let marker = if required { "*" } else { " " };
        let mut spans = vec![Span::styled(
            format!("  {marker}{:<10} <- ", f.name()),
            theme::muted(),
        )];
        match outcome.mapping.get(f) {
            Some(col) => {
                spans.push(Span::styled(col.header.clone(), theme::accent()));
                if !col.exact {
                    spans.push(Span::styled(" (partial match)", theme::neutral()));
                }
            }
            None if required => spans.push(Span::styled("(not found)", theme::negative())),
            None => spans.push(Span::styled("(not found)", theme::muted())),
        }
        lines.push(Line::from(spans));
    }

    let unmatched = outcome.unmatched_headers();
    if !unmatched.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("  Unmatched headers: ", theme::muted()),
            Span::styled(unmatched.join(", "), theme::warning()),
        ]));
    }
    if !outcome.report.is_valid() {
        lines.push(Line::from(vec![
            Span::styled("  Detected columns:  ", theme::muted()),
            Span::styled(outcome.headers.join(", "), theme::text()),
        ]));
    }
    lines.push(Line::from(""));
}

fn issues(lines: &mut Vec<Line<'static>>, outcome: &ProcessOutcome) {
    let report = &outcome.report;
    if report.is_empty() {
        return;
    }
    lines.push(section("Issues"));
    for issue in report.issues() {
        let tag = match issue.severity {
            Severity::Error => "[ERROR]",
            Severity::Warning => "[WARN ]",
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {tag} "), theme::severity(issue.severity)),
            Span::styled(issue.message.clone(), theme::text()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("          {}", issue.suggestion),
            theme::muted(),
        )));
    }
    lines.push(Line::from(""));
}

fn skips(lines: &mut Vec<Line<'static>>, outcome: &ProcessOutcome) {
    if outcome.coercion_skips.is_empty() {
        return;
    }
    lines.push(section("Cells Left Empty"));
    for skip in &outcome.coercion_skips {
        lines.push(Line::from(Span::styled(
            format!("  {skip}"),
            theme::secondary(),
        )));
    }
    lines.push(Line::from(""));
}

fn footer(lines: &mut Vec<Line<'static>>, app: &AppState) {
    let text = if app.table().is_some() {
        let sel = &app.selection;
        let years = match (sel.years.first(), sel.years.last()) {
            (Some(first), Some(last)) if first != last => format!(" from {first} to {last}"),
            (Some(year), _) => format!(" for {year}"),
            _ => String::new(),
        };
        Line::from(Span::styled(
            format!(
                "Loaded {} symbols in {} categories{years}. Press 2 for the stock chart, 3 for the category chart.",
                sel.symbols.len(),
                sel.categories.len()
            ),
            theme::positive(),
        ))
    } else {
        Line::from(Span::styled(
            "The file was not loaded. Fix the errors above and press r to reload.",
            theme::negative(),
        ))
    };
    lines.push(text);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), theme::accent_bold()))
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:>12}  "), theme::muted()),
        Span::styled(value, theme::text()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::line_text;

    fn rendered(app: &AppState) -> Vec<String> {
        lines(app).iter().map(line_text).collect()
    }

    fn open(app: &mut AppState, dir: &tempfile::TempDir, content: &str) {
        let path = dir.path().join("v.csv");
        std::fs::write(&path, content).unwrap();
        app.open_file(path);
    }

    #[test]
    fn empty_state_prompts_for_file() {
        let text = rendered(&AppState::default());
        assert!(text.iter().any(|l| l.contains("No file loaded.")));
        assert!(text.iter().any(|l| l.contains("built-in defaults")));
    }

    #[test]
    fn loaded_file_shows_mapping_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::default();
        open(
            &mut app,
            &dir,
            "年度,代號,便宜價,合理價,昂貴價,收盤價\n2023,2330,500,600,700,650\n",
        );
        let text = rendered(&app);

        assert!(text.iter().any(|l| l.contains("Validation passed with no issues")));
        assert!(text.iter().any(|l| l.contains("*Year       <- 年度")));
        assert!(text.iter().any(|l| l.contains("*Cheap      <- 便宜價 (partial match)")));
        assert!(text.iter().any(|l| l.contains(" Category   <- (not found)")));
        assert!(text.iter().any(|l| l.starts_with("Loaded 1 symbols in 1 categories for 2023.")));
    }

    #[test]
    fn blocked_file_lists_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::default();
        open(&mut app, &dir, "Ticker,Price\nAAPL,1\n");
        let text = rendered(&app);

        assert!(text.iter().any(|l| l.contains("5 errors, 0 warnings")));
        assert!(text
            .iter()
            .any(|l| l.contains("[ERROR] Required column 'Year (年度)' is missing")));
        assert!(text.iter().any(|l| l.contains("The file was not loaded.")));
    }

    #[test]
    fn renamed_headers_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::default();
        open(
            &mut app,
            &dir,
            "Ticker,Price,Low,Mid,High\nAAPL,145.30,120.50,150.00,180.25\n",
        );
        let text = rendered(&app);

        assert!(text
            .iter()
            .any(|l| l == "  Unmatched headers: Price, Low, Mid, High"));
        assert!(text
            .iter()
            .any(|l| l == "  Detected columns:  Ticker, Price, Low, Mid, High"));
    }

    #[test]
    fn coercion_skips_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::default();
        open(
            &mut app,
            &dir,
            "Year,Symbol,Cheap,Fair,Expensive,Close\n2023,AAPL,1,2,3,N/A\n2024,AAPL,1,2,3,2\n",
        );
        let text = rendered(&app);
        assert!(text.iter().any(|l| l == "Cells Left Empty"));
        assert!(text
            .iter()
            .any(|l| l.contains("row 0: Close value 'N/A' is not valid")));
    }
}
