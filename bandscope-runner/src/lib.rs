//! Bandscope Runner: load pipeline, chart specs and validation reports.
//!
//! This crate builds on `bandscope-core` to provide:
//! - The per-load pipeline (read, resolve, validate, process)
//! - Chart specifications for the stock band, category comparison and gauge
//! - Stock and category views that bundle queries with their charts
//! - Text, markdown and JSON validation reports
//! - Config file discovery

pub mod charts;
pub mod config;
pub mod pipeline;
pub mod reporting;
pub mod views;

pub use charts::{
    band_chart, category_chart, valuation_gauge, Axis, ChartKind, ChartPoint, ChartSpec,
    GaugeSpec, GaugeStep, Trace, TraceRole, TraceStyle,
};
pub use config::{config_path_in, load_config, write_default_config, ConfigSource};
pub use pipeline::{process_bytes, process_file, process_table, ProcessOutcome, RunError};
pub use reporting::{render, ReportFormat, ReportSummary};
pub use views::{category_view, stock_view, CategoryView, StockView};
