//! Query + chart bundles consumed by the UI shells.

use crate::charts::{band_chart, category_chart, valuation_gauge, ChartSpec, GaugeSpec};
use bandscope_core::{ProcessError, StockRecord, ValuationTable};

/// One symbol across all years, plus the gauge for a chosen year.
#[derive(Debug, Clone)]
pub struct StockView {
    pub symbol: String,
    pub records: Vec<StockRecord>,
    pub chart: ChartSpec,
    /// Year the gauge describes.
    pub gauge_year: Option<i32>,
    pub gauge: Option<GaugeSpec>,
}

impl StockView {
    pub fn record_for(&self, year: i32) -> Option<&StockRecord> {
        self.records.iter().find(|r| r.year == Some(year))
    }
}

/// Build the stock view. Without a year, the gauge uses the latest year the
/// symbol has.
pub fn stock_view(
    table: &ValuationTable,
    symbol: &str,
    year: Option<i32>,
) -> Result<StockView, ProcessError> {
    let symbol = symbol.trim();
    let records = table.filter_by_symbol(symbol)?;
    let gauge_year = year.or_else(|| records.iter().filter_map(|r| r.year).max());
    let gauge = gauge_year
        .and_then(|y| records.iter().find(|r| r.year == Some(y)))
        .and_then(valuation_gauge);

    Ok(StockView {
        symbol: symbol.to_string(),
        chart: band_chart(symbol, &records),
        records,
        gauge_year,
        gauge,
    })
}

/// Symbols of one category in one year.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub category: String,
    pub year: Option<i32>,
    pub records: Vec<StockRecord>,
    pub chart: ChartSpec,
}

/// Build the category view. Without a year, the latest year present in the
/// category is used.
pub fn category_view(
    table: &ValuationTable,
    category: &str,
    year: Option<i32>,
) -> Result<CategoryView, ProcessError> {
    let category = category.trim();
    let year = match year {
        Some(y) => Some(y),
        None => table
            .filter_by_category(category)?
            .iter()
            .filter_map(|r| r.year)
            .max(),
    };
    let records = match year {
        Some(y) => table.filter_by_category_and_year(category, y)?,
        None => table.filter_by_category(category)?,
    };

    Ok(CategoryView {
        category: category.to_string(),
        year,
        chart: category_chart(category, year, &records),
        records,
    })
}
