//! Data processor: validated raw table → typed valuation table.
//!
//! Mapped columns are renamed to canonical names and coerced; unmapped
//! columns are dropped. A cell that fails coercion becomes null and is
//! recorded as a [`CoercionSkip`]. Rows are never dropped.
//!
//! The typed rows live in a Polars frame with the canonical columns plus
//! `row`, the source row index. Queries run on the frame and map the `row`
//! values back to [`StockRecord`]s.

use crate::alias::ColumnMapping;
use crate::coerce;
use crate::config::ProcessorConfig;
use crate::data::RawTable;
use crate::domain::{CoercionSkip, StockRecord};
use crate::schema::Field;
use polars::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("required field {0} has no matching column")]
    UnresolvedColumn(Field),

    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),
}

/// Result of processing: the table plus every cell that was nulled.
#[derive(Debug, Clone)]
pub struct ProcessedLoad {
    pub table: ValuationTable,
    pub skips: Vec<CoercionSkip>,
}

/// Typed valuation data, one record per source row.
#[derive(Debug, Clone)]
pub struct ValuationTable {
    records: Vec<StockRecord>,
    frame: DataFrame,
}

const REQUIRED: [Field; 6] = [
    Field::Year,
    Field::Symbol,
    Field::Cheap,
    Field::Fair,
    Field::Expensive,
    Field::Close,
];

impl ValuationTable {
    /// Build the typed table.
    ///
    /// Expects a mapping the validator accepted. A required field without a
    /// column is still refused.
    pub fn from_raw(
        raw: &RawTable,
        mapping: &ColumnMapping,
        config: &ProcessorConfig,
    ) -> Result<ProcessedLoad, ProcessError> {
        if let Some(field) = REQUIRED.into_iter().find(|f| !mapping.is_mapped(*f)) {
            return Err(ProcessError::UnresolvedColumn(field));
        }

        let mut skips = Vec::new();
        let mut records = Vec::with_capacity(raw.row_count());

        for row in 0..raw.row_count() {
            let cell = |field: Field| mapping.index(field).map(|i| raw.cell(row, i)).unwrap_or("");

            let year = coerce_cell(cell(Field::Year), coerce::parse_year, row, Field::Year, &mut skips);
            let mut price = |field: Field| coerce_cell(cell(field), coerce::parse_price, row, field, &mut skips);
            let cheap = price(Field::Cheap);
            let fair = price(Field::Fair);
            let expensive = price(Field::Expensive);
            let close = price(Field::Close);

            records.push(StockRecord {
                row,
                year,
                symbol: coerce::parse_text(cell(Field::Symbol)).unwrap_or_default(),
                category: coerce::parse_text(cell(Field::Category))
                    .unwrap_or_else(|| config.uncategorized_label.clone()),
                cheap,
                fair,
                expensive,
                close,
                close_date: coerce::parse_text(cell(Field::CloseDate)),
            });
        }

        if !skips.is_empty() {
            tracing::warn!(count = skips.len(), "cells could not be coerced and were left empty");
        }
        for skip in &skips {
            tracing::debug!(row = skip.row, field = %skip.field, raw = %skip.raw, "coercion skip");
        }

        let frame = build_frame(&records)?;
        tracing::info!(rows = records.len(), skipped_cells = skips.len(), "processed valuation table");

        Ok(ProcessedLoad {
            table: Self { records, frame },
            skips,
        })
    }

    /// The Polars frame backing the table.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records for one symbol, ascending by year.
    pub fn filter_by_symbol(&self, symbol: &str) -> Result<Vec<StockRecord>, ProcessError> {
        let query = self
            .frame
            .clone()
            .lazy()
            .filter(col(Field::Symbol.column()).eq(lit(symbol.trim())))
            .sort(
                [Field::Year.column()],
                SortMultipleOptions::default().with_maintain_order(true),
            );
        self.collect_records(query)
    }

    /// All records in one category, ascending by symbol then year.
    pub fn filter_by_category(&self, category: &str) -> Result<Vec<StockRecord>, ProcessError> {
        let query = self
            .frame
            .clone()
            .lazy()
            .filter(col(Field::Category.column()).eq(lit(category.trim())))
            .sort(
                [Field::Symbol.column(), Field::Year.column()],
                SortMultipleOptions::default().with_maintain_order(true),
            );
        self.collect_records(query)
    }

    /// All records for one year, ascending by symbol.
    pub fn filter_by_year(&self, year: i32) -> Result<Vec<StockRecord>, ProcessError> {
        let query = self
            .frame
            .clone()
            .lazy()
            .filter(col(Field::Year.column()).eq(lit(year)))
            .sort(
                [Field::Symbol.column()],
                SortMultipleOptions::default().with_maintain_order(true),
            );
        self.collect_records(query)
    }

    /// Records in one category and year, ascending by symbol.
    pub fn filter_by_category_and_year(
        &self,
        category: &str,
        year: i32,
    ) -> Result<Vec<StockRecord>, ProcessError> {
        let query = self
            .frame
            .clone()
            .lazy()
            .filter(
                col(Field::Category.column())
                    .eq(lit(category.trim()))
                    .and(col(Field::Year.column()).eq(lit(year))),
            )
            .sort(
                [Field::Symbol.column()],
                SortMultipleOptions::default().with_maintain_order(true),
            );
        self.collect_records(query)
    }

    pub fn list_categories(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.category.clone()).collect()
    }

    /// Distinct non-empty symbols.
    pub fn list_symbols(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| !r.symbol.is_empty())
            .map(|r| r.symbol.clone())
            .collect()
    }

    pub fn list_years(&self) -> BTreeSet<i32> {
        self.records.iter().filter_map(|r| r.year).collect()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.list_years().last().copied()
    }

    /// First record for a symbol in a year.
    pub fn record(&self, symbol: &str, year: i32) -> Option<&StockRecord> {
        let symbol = symbol.trim();
        self.records
            .iter()
            .find(|r| r.symbol == symbol && r.year == Some(year))
    }

    fn collect_records(&self, query: LazyFrame) -> Result<Vec<StockRecord>, ProcessError> {
        let df = query.select([col("row")]).collect()?;
        let rows = df.column("row")?.u32()?;
        Ok(rows
            .into_iter()
            .flatten()
            .filter_map(|row| self.records.get(row as usize))
            .cloned()
            .collect())
    }
}

fn coerce_cell<T>(
    raw: &str,
    parse: fn(&str) -> Option<T>,
    row: usize,
    field: Field,
    skips: &mut Vec<CoercionSkip>,
) -> Option<T> {
    if coerce::is_null(raw) {
        return None;
    }
    let value = parse(raw);
    if value.is_none() {
        skips.push(CoercionSkip {
            row,
            field,
            raw: raw.to_string(),
        });
    }
    value
}

fn build_frame(records: &[StockRecord]) -> PolarsResult<DataFrame> {
    let prices = |f: fn(&StockRecord) -> Option<f64>| records.iter().map(f).collect::<Vec<_>>();

    DataFrame::new(vec![
        Column::new(
            "row".into(),
            records.iter().map(|r| r.row as u32).collect::<Vec<u32>>(),
        ),
        Column::new(
            Field::Year.column().into(),
            records.iter().map(|r| r.year).collect::<Vec<Option<i32>>>(),
        ),
        Column::new(
            Field::Symbol.column().into(),
            records.iter().map(|r| r.symbol.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            Field::Category.column().into(),
            records.iter().map(|r| r.category.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(Field::Cheap.column().into(), prices(|r| r.cheap)),
        Column::new(Field::Fair.column().into(), prices(|r| r.fair)),
        Column::new(Field::Expensive.column().into(), prices(|r| r.expensive)),
        Column::new(Field::Close.column().into(), prices(|r| r.close)),
        Column::new(
            Field::CloseDate.column().into(),
            records
                .iter()
                .map(|r| r.close_date.as_deref())
                .collect::<Vec<Option<&str>>>(),
        ),
    ])
}
