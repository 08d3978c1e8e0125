//! Bandscope TUI: open a valuation CSV, review its report, browse its charts.
//!
//! Panels:
//! 1. Data: file, column mapping, validation issues
//! 2. Stock: valuation band over the years and the close gauge
//! 3. Category: symbols of one category compared for one year
//! 4. Help: keys and accepted column names

pub mod app;
pub mod input;
pub mod logging;
pub mod persistence;
pub mod theme;
pub mod ui;
