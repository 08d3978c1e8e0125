//! Panel 4, Help: keyboard shortcuts and the accepted column names.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "?", "Show this panel");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Files");
    key(&mut lines, "o", "Open a CSV file (type a path, Enter to load)");
    key(&mut lines, "r", "Reload the current file");
    key(&mut lines, "e", "Open error history overlay");
    lines.push(Line::from(""));

    section(&mut lines, "Selection");
    key(&mut lines, "j / k", "Next / previous symbol");
    key(&mut lines, "l / h", "Next / previous category");
    key(&mut lines, "] / [", "Next / previous year");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Data");
    key(&mut lines, "Up / Down", "Scroll the validation report");
    key(&mut lines, "PgUp / PgDn", "Scroll a page");
    key(&mut lines, "Home", "Back to the top");
    lines.push(Line::from(""));

    section(&mut lines, "Accepted Columns (case-insensitive, * required)");
    for spec in app.config.column_specs() {
        let marker = if spec.required { "*" } else { " " };
        key(
            &mut lines,
            &format!("{marker}{}", spec.field.name()),
            &spec.aliases.join(", "),
        );
    }

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
