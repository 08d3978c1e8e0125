//! Chart specifications built from processed records.
//!
//! A spec is plain data: titles, axes and traces with hover labels. The TUI
//! draws it with ratatui and the CLI exports it as JSON for any external
//! renderer.

use bandscope_core::{Field, StockRecord, ValuationZone};
use serde::{Deserialize, Serialize};

/// Vertical padding applied below and above the value range.
const RANGE_PAD_LOW: f64 = 0.9;
const RANGE_PAD_HIGH: f64 = 1.1;
/// Half the width of a level segment in the category chart.
const SEGMENT_HALF_WIDTH: f64 = 0.3;
/// Gauge axis extends this far past the highest value.
const GAUGE_HEADROOM: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    /// One symbol across years.
    Band,
    /// Several symbols side by side.
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceRole {
    Cheap,
    Fair,
    Expensive,
    Close,
}

impl TraceRole {
    pub const ALL: [TraceRole; 4] = [
        TraceRole::Cheap,
        TraceRole::Fair,
        TraceRole::Expensive,
        TraceRole::Close,
    ];

    /// Bilingual legend entry.
    pub fn legend(self) -> &'static str {
        match self {
            TraceRole::Cheap => "Cheap (便宜)",
            TraceRole::Fair => "Fair (合理)",
            TraceRole::Expensive => "Expensive (昂貴)",
            TraceRole::Close => "Close (收盤)",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TraceRole::Cheap => "green",
            TraceRole::Fair => "blue",
            TraceRole::Expensive => "red",
            TraceRole::Close => "#f1c40f",
        }
    }

    pub fn field(self) -> Field {
        match self {
            TraceRole::Cheap => Field::Cheap,
            TraceRole::Fair => Field::Fair,
            TraceRole::Expensive => Field::Expensive,
            TraceRole::Close => Field::Close,
        }
    }

    fn short(self) -> &'static str {
        match self {
            TraceRole::Cheap => "Cheap",
            TraceRole::Fair => "Fair",
            TraceRole::Expensive => "Expensive",
            TraceRole::Close => "Close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceStyle {
    Line,
    Markers,
    /// Consecutive point pairs are independent horizontal segments.
    Segments,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    /// Hover text.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub role: TraceRole,
    pub style: TraceStyle,
    pub color: String,
    pub points: Vec<ChartPoint>,
}

impl Trace {
    fn new(role: TraceRole, style: TraceStyle) -> Self {
        Self {
            name: role.legend().to_string(),
            role,
            style,
            color: role.color().to_string(),
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    /// `[min, max]`, or `None` when there is nothing to show.
    pub range: Option<[f64; 2]>,
    /// Labelled tick positions. Empty means numeric ticks.
    pub ticks: Vec<(f64, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    pub fn trace(&self, role: TraceRole) -> Option<&Trace> {
        self.traces.iter().find(|t| t.role == role)
    }

    /// True when no trace has a point.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|t| t.points.is_empty())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Band of valuation levels for one symbol, x = year.
///
/// Records without a year are left out. Null values are skipped point by
/// point so the other levels still draw.
pub fn band_chart(symbol: &str, records: &[StockRecord]) -> ChartSpec {
    let mut rows: Vec<(i32, &StockRecord)> = records
        .iter()
        .filter_map(|r| r.year.map(|y| (y, r)))
        .collect();
    rows.sort_by_key(|(year, _)| *year);

    let mut traces: Vec<Trace> = TraceRole::ALL
        .into_iter()
        .map(|role| Trace::new(role, TraceStyle::Line))
        .collect();

    for (year, record) in &rows {
        for trace in &mut traces {
            let Some(value) = record.price(trace.role.field()) else {
                continue;
            };
            let mut label = format!("{year} {}: {}", trace.role.short(), format_price(value));
            if trace.role == TraceRole::Close {
                if let Some(date) = &record.close_date {
                    label.push_str(&format!(" ({date})"));
                }
            }
            trace.points.push(ChartPoint {
                x: f64::from(*year),
                y: value,
                label,
            });
        }
    }

    let x_range = match (rows.first(), rows.last()) {
        (Some((first, _)), Some((last, _))) => {
            Some([f64::from(*first) - 0.5, f64::from(*last) + 0.5])
        }
        _ => None,
    };

    ChartSpec {
        title: format!("{symbol} Price Levels"),
        kind: ChartKind::Band,
        x_axis: Axis {
            title: "Year".into(),
            range: x_range,
            ticks: rows
                .iter()
                .map(|(year, _)| (f64::from(*year), year.to_string()))
                .collect(),
        },
        y_axis: Axis {
            title: "Price".into(),
            range: padded_range(&traces),
            ticks: Vec::new(),
        },
        traces,
    }
}

/// Side-by-side comparison of the symbols in one category.
///
/// Symbols are sorted and placed at x = 0, 1, 2, ... Each level is a short
/// horizontal segment around its symbol; the close is a marker.
pub fn category_chart(category: &str, year: Option<i32>, records: &[StockRecord]) -> ChartSpec {
    let mut sorted: Vec<&StockRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let mut traces: Vec<Trace> = TraceRole::ALL
        .into_iter()
        .map(|role| {
            let style = if role == TraceRole::Close {
                TraceStyle::Markers
            } else {
                TraceStyle::Segments
            };
            Trace::new(role, style)
        })
        .collect();

    for (i, record) in sorted.iter().enumerate() {
        let x = i as f64;
        for trace in &mut traces {
            let Some(value) = record.price(trace.role.field()) else {
                continue;
            };
            let mut label = format!(
                "{}\n{}: {}",
                record.symbol,
                trace.role.short(),
                format_price(value)
            );
            match trace.style {
                TraceStyle::Segments => {
                    trace.points.push(ChartPoint {
                        x: x - SEGMENT_HALF_WIDTH,
                        y: value,
                        label: label.clone(),
                    });
                    trace.points.push(ChartPoint {
                        x: x + SEGMENT_HALF_WIDTH,
                        y: value,
                        label,
                    });
                }
                TraceStyle::Markers | TraceStyle::Line => {
                    if let Some(date) = &record.close_date {
                        label.push_str(&format!("\nDate: {date}"));
                    }
                    trace.points.push(ChartPoint { x, y: value, label });
                }
            }
        }
    }

    let title = match year {
        Some(year) => format!("{category} Stocks Overview ({year})"),
        None => format!("{category} Stocks Overview"),
    };
    let x_range = (!sorted.is_empty()).then(|| [-0.5, sorted.len() as f64 - 0.5]);

    ChartSpec {
        title,
        kind: ChartKind::Category,
        x_axis: Axis {
            title: "Stock Symbol".into(),
            range: x_range,
            ticks: sorted
                .iter()
                .enumerate()
                .map(|(i, r)| (i as f64, r.symbol.clone()))
                .collect(),
        },
        y_axis: Axis {
            title: "Price".into(),
            range: padded_range(&traces),
            ticks: Vec::new(),
        },
        traces,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeStep {
    pub from: f64,
    pub to: f64,
    pub zone: ValuationZone,
    pub color: String,
}

/// Close price against the valuation band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeSpec {
    pub title: String,
    pub value: f64,
    /// Fair price; the delta is measured against it.
    pub reference: f64,
    pub delta: f64,
    pub max: f64,
    pub steps: Vec<GaugeStep>,
    pub zone: ValuationZone,
}

impl GaugeSpec {
    /// Delta as a percentage of the fair price, when fair is non-zero.
    pub fn delta_pct(&self) -> Option<f64> {
        (self.reference != 0.0).then(|| self.delta / self.reference * 100.0)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Gauge for one record. Needs the close and all three levels.
pub fn valuation_gauge(record: &StockRecord) -> Option<GaugeSpec> {
    let (cheap, fair, expensive, close) =
        (record.cheap?, record.fair?, record.expensive?, record.close?);
    let zone = record.zone()?;
    let max = cheap.max(fair).max(expensive).max(close) * GAUGE_HEADROOM;

    let step = |from: f64, to: f64, zone: ValuationZone, color: &str| GaugeStep {
        from,
        to,
        zone,
        color: color.to_string(),
    };

    let title = match record.year {
        Some(year) => format!("{} {year}: Closing Price vs Valuation", record.symbol),
        None => format!("{}: Closing Price vs Valuation", record.symbol),
    };

    Some(GaugeSpec {
        title,
        value: close,
        reference: fair,
        delta: close - fair,
        max,
        steps: vec![
            step(0.0, cheap, ValuationZone::BelowCheap, "#55efc4"),
            step(cheap, fair, ValuationZone::CheapToFair, "#ffeaa7"),
            step(fair, expensive, ValuationZone::FairToExpensive, "#fab1a0"),
            step(expensive, max, ValuationZone::AboveExpensive, "#ff7675"),
        ],
        zone,
    })
}

fn padded_range(traces: &[Trace]) -> Option<[f64; 2]> {
    let mut values = traces.iter().flat_map(|t| t.points.iter().map(|p| p.y));
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some([min * RANGE_PAD_LOW, max * RANGE_PAD_HIGH])
}

pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}
