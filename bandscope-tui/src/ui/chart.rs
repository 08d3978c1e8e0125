//! Draw a runner `ChartSpec` with ratatui's `Chart` widget.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition};

use bandscope_runner::{ChartSpec, TraceStyle};

use crate::theme;

/// One drawable polyline or point set.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Only the first series of a trace carries the legend name.
    pub name: Option<String>,
    pub color: Color,
    pub graph: GraphType,
    pub points: Vec<(f64, f64)>,
}

/// Flatten the traces of a spec into drawable series. Segment traces become
/// one two-point line per pair so neighbouring symbols are not joined.
pub fn series(spec: &ChartSpec) -> Vec<Series> {
    let mut out = Vec::new();
    for trace in &spec.traces {
        if trace.points.is_empty() {
            continue;
        }
        let color = theme::chart_color(&trace.color);
        let points: Vec<(f64, f64)> = trace.points.iter().map(|p| (p.x, p.y)).collect();
        match trace.style {
            TraceStyle::Line => out.push(Series {
                name: Some(trace.name.clone()),
                color,
                graph: GraphType::Line,
                points,
            }),
            TraceStyle::Markers => out.push(Series {
                name: Some(trace.name.clone()),
                color,
                graph: GraphType::Scatter,
                points,
            }),
            TraceStyle::Segments => {
                for (i, pair) in points.chunks(2).enumerate() {
                    out.push(Series {
                        name: (i == 0).then(|| trace.name.clone()),
                        color,
                        graph: GraphType::Line,
                        points: pair.to_vec(),
                    });
                }
            }
        }
    }
    out
}

pub fn render(f: &mut Frame, area: Rect, spec: &ChartSpec) {
    let (Some(x_range), Some(y_range)) = (spec.x_axis.range, spec.y_axis.range) else {
        return;
    };

    let all = series(spec);
    let datasets: Vec<Dataset> = all
        .iter()
        .map(|s| {
            let marker = match s.graph {
                GraphType::Scatter => symbols::Marker::Dot,
                _ => symbols::Marker::Braille,
            };
            let dataset = Dataset::default()
                .marker(marker)
                .style(Style::default().fg(s.color))
                .graph_type(s.graph)
                .data(&s.points);
            match &s.name {
                Some(name) => dataset.name(name.clone()),
                None => dataset,
            }
        })
        .collect();

    let x_labels: Vec<Span> = if spec.x_axis.ticks.is_empty() {
        bounds_labels(x_range)
    } else {
        spec.x_axis
            .ticks
            .iter()
            .map(|(_, label)| Span::styled(label.clone(), theme::muted()))
            .collect()
    };

    let chart = Chart::new(datasets)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .title(Span::styled(spec.x_axis.title.clone(), theme::muted()))
                .style(theme::muted())
                .bounds(x_range)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(spec.y_axis.title.clone(), theme::muted()))
                .style(theme::muted())
                .bounds(y_range)
                .labels(bounds_labels(y_range)),
        );

    f.render_widget(chart, area);
}

/// Min, middle and max labels.
fn bounds_labels(range: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (range[0] + range[1]) / 2.0;
    [range[0], mid, range[1]]
        .into_iter()
        .map(|v| Span::styled(format!("{v:.0}"), theme::muted()))
        .collect()
}
