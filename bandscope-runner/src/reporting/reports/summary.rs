//! Serializable summary of one load event.

use crate::pipeline::ProcessOutcome;
use bandscope_core::{CoercionSkip, Field, ValidationIssue};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MappingEntry {
    pub field: Field,
    pub header: String,
    pub exact: bool,
}

/// Everything a report prints, in one place.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub source: String,
    pub fingerprint: String,
    pub generated_at: DateTime<Utc>,
    pub rows: usize,
    pub columns: usize,
    pub mapped: Vec<MappingEntry>,
    pub unmapped: Vec<Field>,
    /// Every header in the file, in order.
    pub headers: Vec<String>,
    /// Headers no field resolved to.
    pub unmatched_headers: Vec<String>,
    pub valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub issues: Vec<ValidationIssue>,
    pub coercion_skips: Vec<CoercionSkip>,
    pub symbols: usize,
    pub categories: usize,
    pub years: Vec<i32>,
}

impl ReportSummary {
    pub fn from_outcome(outcome: &ProcessOutcome) -> Self {
        Self::at(outcome, Utc::now())
    }

    /// Summary with a fixed timestamp.
    pub fn at(outcome: &ProcessOutcome, generated_at: DateTime<Utc>) -> Self {
        let mapped = outcome
            .mapping
            .iter()
            .map(|(field, column)| MappingEntry {
                field,
                header: column.header.clone(),
                exact: column.exact,
            })
            .collect();
        let unmapped = Field::ALL
            .into_iter()
            .filter(|f| !outcome.mapping.is_mapped(*f))
            .collect();
        let (symbols, categories, years) = match &outcome.table {
            Some(table) => (
                table.list_symbols().len(),
                table.list_categories().len(),
                table.list_years().into_iter().collect(),
            ),
            None => (0, 0, Vec::new()),
        };

        Self {
            source: outcome.source_label(),
            fingerprint: outcome.fingerprint.clone(),
            generated_at,
            rows: outcome.row_count,
            columns: outcome.headers.len(),
            mapped,
            unmapped,
            headers: outcome.headers.clone(),
            unmatched_headers: outcome
                .unmatched_headers()
                .into_iter()
                .map(str::to_string)
                .collect(),
            valid: outcome.report.is_valid(),
            error_count: outcome.report.error_count(),
            warning_count: outcome.report.warning_count(),
            issues: outcome.report.issues().to_vec(),
            coercion_skips: outcome.coercion_skips.clone(),
            symbols,
            categories,
            years,
        }
    }

    /// One-line status, e.g. `2 errors, 1 warning`.
    pub fn headline(&self) -> String {
        if self.error_count == 0 && self.warning_count == 0 {
            return "Validation passed with no issues".to_string();
        }
        format!(
            "{} {}, {} {}",
            self.error_count,
            plural(self.error_count, "error"),
            self.warning_count,
            plural(self.warning_count, "warning")
        )
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
