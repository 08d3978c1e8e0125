//! Panel 3, Category: symbols of one category side by side for one year.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use bandscope_core::StockRecord;
use bandscope_runner::charts::format_price;

use crate::app::AppState;
use crate::theme;
use crate::ui::chart;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = &app.category_view else {
        let hint = if app.table().is_some() {
            "The loaded file has no categories."
        } else {
            "Open a valuation CSV with o to compare a category."
        };
        f.render_widget(
            Paragraph::new(vec![Line::from(""), Line::from(Span::styled(hint, theme::muted()))]),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(view.records.len().min(10) as u16),
        ])
        .split(area);

    let sel = &app.selection;
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(view.chart.title.clone(), theme::accent_bold()),
            Span::styled(
                format!(
                    "  ({}/{})  [h/l]category [ [/] ]year",
                    sel.category_idx + 1,
                    sel.categories.len()
                ),
                theme::muted(),
            ),
        ])),
        chunks[0],
    );

    if view.chart.is_empty() {
        let year = view.year.map(|y| y.to_string()).unwrap_or_default();
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("No {} stocks with prices in {year}.", view.category),
                theme::muted(),
            )),
            chunks[1],
        );
    } else {
        chart::render(f, chunks[1], &view.chart);
    }

    f.render_widget(Paragraph::new(close_lines(&view.records)), chunks[2]);
}

/// Symbol, close and zone per record, with the close date when known.
pub fn close_lines(records: &[StockRecord]) -> Vec<Line<'static>> {
    let mut sorted: Vec<&StockRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    sorted
        .into_iter()
        .map(|r| {
            let close = r.close.map(format_price).unwrap_or_else(|| "-".into());
            let date = r
                .close_date
                .as_deref()
                .map(|d| format!(" on {d}"))
                .unwrap_or_default();
            let mut spans = vec![Span::styled(
                format!("  {:<10} close {close}{date}  ", r.symbol),
                theme::text(),
            )];
            if let Some(zone) = r.zone() {
                spans.push(Span::styled(
                    zone.label(),
                    Style::default().fg(theme::zone_color(zone)),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::line_text;

    fn record(symbol: &str, close: f64, date: Option<&str>) -> StockRecord {
        StockRecord {
            row: 0,
            year: Some(2024),
            symbol: symbol.into(),
            category: "半導體".into(),
            cheap: Some(500.0),
            fair: Some(600.0),
            expensive: Some(700.0),
            close: Some(close),
            close_date: date.map(str::to_string),
        }
    }

    #[test]
    fn close_lines_sorted_with_dates_and_zones() {
        let lines = close_lines(&[
            record("2454", 750.0, None),
            record("2330", 650.0, Some("2024-12-31")),
        ]);
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert!(text[0].starts_with("  2330       close 650.00 on 2024-12-31"));
        assert!(text[0].contains("fair to expensive"));
        assert!(text[1].contains("above expensive"));
    }
}
