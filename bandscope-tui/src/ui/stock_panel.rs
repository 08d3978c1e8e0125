//! Panel 2, Stock: valuation band over the years plus the close gauge.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use bandscope_core::StockRecord;
use bandscope_runner::charts::format_price;
use bandscope_runner::{GaugeSpec, StockView};

use crate::app::AppState;
use crate::theme;
use crate::ui::chart;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = &app.stock_view else {
        render_empty(f, area, app);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(view.records.len().min(8) as u16 + 1),
        ])
        .split(area);

    let position = format!(
        "({}/{})",
        app.selection.symbol_idx + 1,
        app.selection.symbols.len()
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(view.chart.title.clone(), theme::accent_bold()),
            Span::styled(format!("  {position}  [j/k]symbol [ [/] ]year"), theme::muted()),
        ])),
        chunks[0],
    );

    if view.chart.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No prices to chart for this symbol.", theme::muted())),
            chunks[1],
        );
    } else {
        chart::render(f, chunks[1], &view.chart);
    }

    render_gauge(f, chunks[2], view);

    let rows: Vec<Line> = record_lines(&view.records);
    f.render_widget(Paragraph::new(rows), chunks[3]);
}

fn render_empty(f: &mut Frame, area: Rect, app: &AppState) {
    let hint = if app.outcome.is_some() && app.table().is_none() {
        "The file did not pass validation. See the Data panel (press 1)."
    } else if app.table().is_some() {
        "The loaded file has no symbols."
    } else {
        "Open a valuation CSV with o to chart a stock."
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(hint, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_gauge(f: &mut Frame, area: Rect, view: &StockView) {
    let year = view
        .gauge_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".into());
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme::muted())
        .title(format!(" Close vs Valuation {year} "));

    match &view.gauge {
        Some(gauge) => {
            let widget = Gauge::default()
                .block(block)
                .gauge_style(Style::default().fg(theme::zone_color(gauge.zone)))
                .ratio(gauge_ratio(gauge))
                .label(gauge_label(gauge));
            f.render_widget(widget, area);
        }
        None => {
            let para = Paragraph::new(Span::styled(
                "Gauge needs close, cheap, fair and expensive for this year.",
                theme::muted(),
            ))
            .block(block);
            f.render_widget(para, area);
        }
    }
}

/// Fill ratio clamped to `[0, 1]`.
pub fn gauge_ratio(gauge: &GaugeSpec) -> f64 {
    if gauge.max <= 0.0 {
        return 0.0;
    }
    (gauge.value / gauge.max).clamp(0.0, 1.0)
}

pub fn gauge_label(gauge: &GaugeSpec) -> String {
    let delta = match gauge.delta_pct() {
        Some(pct) => format!("{:+.2} ({pct:+.1}%)", gauge.delta),
        None => format!("{:+.2}", gauge.delta),
    };
    format!(
        "{} vs fair {}: {delta}, {}",
        format_price(gauge.value),
        format_price(gauge.reference),
        gauge.zone
    )
}

/// One line per year: the band and the close.
pub fn record_lines(records: &[StockRecord]) -> Vec<Line<'static>> {
    let price = |v: Option<f64>| v.map(format_price).unwrap_or_else(|| "-".into());
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "{:>6} {:>10} {:>10} {:>10} {:>10}  {}",
            "Year", "Cheap", "Fair", "Expensive", "Close", "Zone"
        ),
        theme::muted(),
    ))];
    for r in records.iter().rev() {
        let zone = r.zone();
        let zone_span = match zone {
            Some(z) => Span::styled(z.label(), Style::default().fg(theme::zone_color(z))),
            None => Span::styled("-", theme::muted()),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{:>6} {:>10} {:>10} {:>10} {:>10}  ",
                    r.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
                    price(r.cheap),
                    price(r.fair),
                    price(r.expensive),
                    price(r.close),
                ),
                theme::text(),
            ),
            zone_span,
        ]));
    }
    lines
}
