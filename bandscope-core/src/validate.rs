//! Validator: raw table + column mapping → ordered report of issues.
//!
//! Validation never fails and never touches the table. Business-rule
//! violations become [`ValidationIssue`] values in detection order:
//! missing columns, nulls, types, duplicate keys, valuation order.

use crate::alias::ColumnMapping;
use crate::coerce;
use crate::config::ValidationConfig;
use crate::data::RawTable;
use crate::schema::{spec_for, ColumnSpec, ColumnType, Field};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks processing.
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    MissingColumn,
    EmptyColumn,
    NullValues,
    InvalidType,
    DuplicateKey,
    ValuationOrder,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::MissingColumn => "missing column",
            IssueKind::EmptyColumn => "empty column",
            IssueKind::NullValues => "null values",
            IssueKind::InvalidType => "invalid type",
            IssueKind::DuplicateKey => "duplicate key",
            IssueKind::ValuationOrder => "valuation order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub field: Field,
    pub message: String,
    pub suggestion: String,
}

/// Issues in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn error(&mut self, kind: IssueKind, field: Field, message: String, suggestion: String) {
        self.push(ValidationIssue {
            severity: Severity::Error,
            kind,
            field,
            message,
            suggestion,
        });
    }

    fn warning(&mut self, kind: IssueKind, field: Field, message: String, suggestion: String) {
        self.push(ValidationIssue {
            severity: Severity::Warning,
            kind,
            field,
            message,
            suggestion,
        });
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// True when nothing blocks processing.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of one kind, in order.
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

/// Run every check against the raw table.
pub fn validate(
    table: &RawTable,
    mapping: &ColumnMapping,
    specs: &[ColumnSpec],
    config: &ValidationConfig,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_missing_columns(&mut report, mapping, specs);
    check_nulls(&mut report, table, mapping, specs, config);
    check_types(&mut report, table, mapping, specs, config);
    check_duplicates(&mut report, table, mapping, config);
    if config.check_valuation_order {
        check_valuation_order(&mut report, table, mapping, config);
    }

    tracing::debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation finished"
    );
    report
}

fn display_name(specs: &[ColumnSpec], field: Field) -> String {
    spec_for(specs, field)
        .map(|s| s.display.clone())
        .unwrap_or_else(|| field.name().to_string())
}

fn check_missing_columns(report: &mut ValidationReport, mapping: &ColumnMapping, specs: &[ColumnSpec]) {
    for field in mapping.missing_required(specs) {
        let Some(spec) = spec_for(specs, field) else {
            continue;
        };
        report.error(
            IssueKind::MissingColumn,
            field,
            format!("Required column '{}' is missing from the CSV file.", spec.display),
            format!(
                "Solution: add a column named one of: {}",
                spec.aliases.join(", ")
            ),
        );
    }
}

fn check_nulls(
    report: &mut ValidationReport,
    table: &RawTable,
    mapping: &ColumnMapping,
    specs: &[ColumnSpec],
    config: &ValidationConfig,
) {
    let total = table.row_count();
    if total == 0 {
        return;
    }

    for spec in specs {
        let Some(index) = mapping.index(spec.field) else {
            continue;
        };
        let null_count = table.column(index).filter(|c| coerce::is_null(c)).count();
        if null_count == 0 {
            continue;
        }

        let pct = null_count as f64 / total as f64 * 100.0;
        let message = format!(
            "Column '{}' has {} null values ({:.1}% of data).",
            spec.display, null_count, pct
        );

        if null_count == total {
            let suggestion =
                "Solution: this column appears to be completely empty. Please check your data file."
                    .to_string();
            if spec.required && config.fail_on_empty_column {
                report.error(IssueKind::EmptyColumn, spec.field, message, suggestion);
            } else {
                report.warning(IssueKind::NullValues, spec.field, message, suggestion);
            }
        } else if pct > config.null_warning_pct {
            let suggestion = if pct > 50.0 {
                "Solution: more than half of the values are missing. This may affect analysis accuracy."
            } else {
                "Solution: some values are missing. Those cells will be empty in charts."
            };
            report.warning(IssueKind::NullValues, spec.field, message, suggestion.to_string());
        }
    }
}

fn check_types(
    report: &mut ValidationReport,
    table: &RawTable,
    mapping: &ColumnMapping,
    specs: &[ColumnSpec],
    config: &ValidationConfig,
) {
    for spec in specs {
        let Some(index) = mapping.index(spec.field) else {
            continue;
        };
        let parses: fn(&str) -> bool = match spec.column_type() {
            ColumnType::Integer => |c| coerce::parse_year(c).is_some(),
            ColumnType::Float => |c| coerce::parse_price(c).is_some(),
            ColumnType::Text => continue,
        };

        let bad_rows: Vec<usize> = table
            .column(index)
            .enumerate()
            .filter(|(_, c)| !coerce::is_null(c) && !parses(c))
            .map(|(row, _)| row)
            .collect();
        if bad_rows.is_empty() {
            continue;
        }

        let (noun, hint) = match spec.column_type() {
            ColumnType::Integer => ("non-integer", "Years should be whole numbers such as 2023."),
            _ => (
                "non-numeric",
                "Price values should be numeric. Currency symbols and thousands separators are accepted.",
            ),
        };
        report.warning(
            IssueKind::InvalidType,
            spec.field,
            format!(
                "Column '{}' contains {} {} values (rows {}).",
                spec.display,
                bad_rows.len(),
                noun,
                format_limited(&bad_rows, config.display_limit)
            ),
            format!("Solution: {hint} Invalid cells are treated as empty."),
        );
    }
}

fn check_duplicates(
    report: &mut ValidationReport,
    table: &RawTable,
    mapping: &ColumnMapping,
    config: &ValidationConfig,
) {
    let (Some(year_idx), Some(symbol_idx)) = (mapping.index(Field::Year), mapping.index(Field::Symbol))
    else {
        return;
    };

    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for row in 0..table.row_count() {
        let year = table.cell(row, year_idx);
        let symbol = table.cell(row, symbol_idx);
        if coerce::is_null(year) || coerce::is_null(symbol) {
            continue;
        }
        groups
            .entry((coerce::year_key(year), symbol.trim().to_string()))
            .or_default()
            .push(row);
    }

    let mut duplicates: Vec<((String, String), Vec<usize>)> =
        groups.into_iter().filter(|(_, rows)| rows.len() > 1).collect();
    if duplicates.is_empty() {
        return;
    }
    // Report in file order of first occurrence.
    duplicates.sort_by_key(|(_, rows)| rows[0]);

    let shown: Vec<String> = duplicates
        .iter()
        .take(config.display_limit)
        .map(|((year, symbol), rows)| format!("{year}/{symbol} (rows {})", join_rows(rows)))
        .collect();
    let mut listing = shown.join("; ");
    if duplicates.len() > config.display_limit {
        listing.push_str(&format!(" (+{} more)", duplicates.len() - config.display_limit));
    }

    report.warning(
        IssueKind::DuplicateKey,
        Field::Symbol,
        format!(
            "Found {} duplicate stock entries (same symbol and year): {listing}.",
            duplicates.len()
        ),
        "Solution: each stock should appear only once per year. Duplicate entries may cause incorrect analysis."
            .to_string(),
    );
}

fn check_valuation_order(
    report: &mut ValidationReport,
    table: &RawTable,
    mapping: &ColumnMapping,
    config: &ValidationConfig,
) {
    let (Some(cheap_idx), Some(fair_idx), Some(exp_idx)) = (
        mapping.index(Field::Cheap),
        mapping.index(Field::Fair),
        mapping.index(Field::Expensive),
    ) else {
        return;
    };

    let bad_rows: Vec<usize> = (0..table.row_count())
        .filter(|&row| {
            let cheap = coerce::parse_price(table.cell(row, cheap_idx));
            let fair = coerce::parse_price(table.cell(row, fair_idx));
            let expensive = coerce::parse_price(table.cell(row, exp_idx));
            matches!((cheap, fair, expensive), (Some(c), Some(f), Some(e)) if !(c <= f && f <= e))
        })
        .collect();
    if bad_rows.is_empty() {
        return;
    }

    report.warning(
        IssueKind::ValuationOrder,
        Field::Fair,
        format!(
            "{} rows do not satisfy Cheap <= Fair <= Expensive (rows {}).",
            bad_rows.len(),
            format_limited(&bad_rows, config.display_limit)
        ),
        "Solution: check that the cheap, fair and expensive columns are not swapped.".to_string(),
    );
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter().map(usize::to_string).collect::<Vec<_>>().join(", ")
}

/// `0, 3, 7 (+2 more)` style listing.
fn format_limited(rows: &[usize], limit: usize) -> String {
    let mut out = join_rows(&rows[..rows.len().min(limit)]);
    if rows.len() > limit {
        out.push_str(&format!(" (+{} more)", rows.len() - limit));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::resolve_columns;
    use crate::schema::default_specs;

    fn run(csv: &str) -> ValidationReport {
        run_with(csv, &ValidationConfig::default())
    }

    fn run_with(csv: &str, config: &ValidationConfig) -> ValidationReport {
        let table = RawTable::from_bytes(csv.as_bytes()).unwrap();
        let specs = default_specs();
        let mapping = resolve_columns(table.headers(), &specs);
        validate(&table, &mapping, &specs, config)
    }

    const HEADER: &str = "Year,Symbol,Cheap,Fair,Expensive,Close";

    #[test]
    fn clean_data_has_no_issues() {
        let report = run(&format!("{HEADER}\n2023,AAPL,120.50,150.00,180.25,145.30\n"));
        assert!(report.is_valid());
        assert!(!report.has_warnings());
        assert!(report.is_empty());
    }

    #[test]
    fn missing_required_columns_are_errors() {
        let report = run("Year,Symbol\n2023,AAPL\n");
        let fields: Vec<Field> = report.errors().map(|i| i.field).collect();
        assert_eq!(fields, vec![Field::Cheap, Field::Fair, Field::Expensive, Field::Close]);
        let first = report.errors().next().unwrap();
        assert_eq!(first.kind, IssueKind::MissingColumn);
        assert!(first.message.contains("Required column 'Cheap Price (便宜價)' is missing"));
        assert_eq!(first.suggestion, "Solution: add a column named one of: Cheap, 便宜");
    }

    #[test]
    fn optional_columns_are_never_missing() {
        let report = run(&format!("{HEADER}\n2023,AAPL,1,2,3,2\n"));
        assert!(report.of_kind(IssueKind::MissingColumn).next().is_none());
    }

    #[test]
    fn partial_nulls_warn_with_percentage() {
        let report = run(&format!("{HEADER}\n2023,AAPL,1,2,3,2\n2024,AAPL,1,2,3,\n"));
        assert!(report.is_valid());
        let warning = report.of_kind(IssueKind::NullValues).next().unwrap();
        assert_eq!(warning.field, Field::Close);
        assert!(warning.message.contains("1 null values (50.0% of data)"));
        assert!(warning.suggestion.contains("some values are missing"));
    }

    #[test]
    fn null_threshold_suppresses_small_gaps() {
        let config = ValidationConfig {
            null_warning_pct: 60.0,
            ..ValidationConfig::default()
        };
        let report = run_with(&format!("{HEADER}\n2023,AAPL,1,2,3,2\n2024,AAPL,1,2,3,\n"), &config);
        assert!(report.is_empty());
    }

    #[test]
    fn mostly_null_column_uses_stronger_hint() {
        let csv = format!("{HEADER}\n2023,A,1,2,3,\n2023,B,1,2,3,\n2023,C,1,2,3,4\n");
        let report = run(&csv);
        let warning = report.of_kind(IssueKind::NullValues).next().unwrap();
        assert!(warning.message.contains("(66.7% of data)"));
        assert!(warning.suggestion.contains("more than half"));
    }

    #[test]
    fn all_null_required_column_is_error() {
        let report = run(&format!("{HEADER}\n2023,AAPL,1,2,3,\n2024,AAPL,1,2,3, \n"));
        assert!(!report.is_valid());
        let error = report.errors().next().unwrap();
        assert_eq!(error.kind, IssueKind::EmptyColumn);
        assert_eq!(error.field, Field::Close);
    }

    #[test]
    fn all_null_column_can_be_downgraded() {
        let config = ValidationConfig {
            fail_on_empty_column: false,
            ..ValidationConfig::default()
        };
        let report = run_with(&format!("{HEADER}\n2023,AAPL,1,2,3,\n"), &config);
        assert!(report.is_valid());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn all_null_optional_column_is_warning() {
        let report = run(&format!("{HEADER},Category\n2023,AAPL,1,2,3,2,\n"));
        assert!(report.is_valid());
        let warning = report.warnings().next().unwrap();
        assert_eq!(warning.field, Field::Category);
    }

    #[test]
    fn invalid_prices_list_rows() {
        let csv = format!("{HEADER}\n2023,A,1,2,3,N/A\n2023,B,1,2,3,4\n2023,C,1,2,3,abc\n");
        let report = run(&csv);
        assert!(report.is_valid());
        let warning = report.of_kind(IssueKind::InvalidType).next().unwrap();
        assert_eq!(warning.field, Field::Close);
        assert!(warning.message.contains("2 non-numeric values (rows 0, 2)"));
    }

    #[test]
    fn currency_formatting_is_not_invalid() {
        let csv = format!("{HEADER}\n2023,A,$1,\"$1,234.56\",3000,$2\n");
        let report = run(&csv);
        assert!(report.of_kind(IssueKind::InvalidType).next().is_none());
    }

    #[test]
    fn invalid_years_are_reported() {
        let csv = format!("{HEADER}\nFY23,A,1,2,3,2\n2023.0,B,1,2,3,2\n");
        let report = run(&csv);
        let warning = report.of_kind(IssueKind::InvalidType).next().unwrap();
        assert_eq!(warning.field, Field::Year);
        assert!(warning.message.contains("1 non-integer values (rows 0)"));
    }

    #[test]
    fn row_listing_is_capped() {
        let mut csv = format!("{HEADER}\n");
        for _ in 0..8 {
            csv.push_str("2023,A,x,2,3,2\n");
        }
        let report = run(&csv);
        let warning = report.of_kind(IssueKind::InvalidType).next().unwrap();
        assert!(warning.message.contains("(rows 0, 1, 2, 3, 4 (+3 more))"));
    }

    #[test]
    fn duplicates_name_both_rows() {
        let csv = format!("{HEADER}\n2023,AAPL,1,2,3,2\n2023,AAPL,1,2,3,2\n2024,AAPL,1,2,3,2\n");
        let report = run(&csv);
        let dupes: Vec<_> = report.of_kind(IssueKind::DuplicateKey).collect();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].field, Field::Symbol);
        assert_eq!(dupes[0].severity, Severity::Warning);
        assert!(dupes[0].message.contains("2023/AAPL (rows 0, 1)"));
    }

    #[test]
    fn duplicate_years_match_across_renderings() {
        let csv = format!("{HEADER}\n2023,AAPL,1,2,3,2\n2023.0, AAPL ,1,2,3,2\n");
        let report = run(&csv);
        assert_eq!(report.of_kind(IssueKind::DuplicateKey).count(), 1);
    }

    #[test]
    fn inverted_band_warns() {
        let csv = format!("{HEADER}\n2023,AAPL,200,150,180,145\n2024,AAPL,1,2,3,2\n");
        let report = run(&csv);
        let warning = report.of_kind(IssueKind::ValuationOrder).next().unwrap();
        assert_eq!(warning.field, Field::Fair);
        assert!(warning.message.contains("(rows 0)"));

        let config = ValidationConfig {
            check_valuation_order: false,
            ..ValidationConfig::default()
        };
        let report = run_with(&csv, &config);
        assert!(report.of_kind(IssueKind::ValuationOrder).next().is_none());
    }

    #[test]
    fn detection_order_is_stable() {
        let csv = "Year,Symbol,Cheap,Fair,Expensive\n2023,AAPL,x,2,3\n2023,AAPL,,2,3\n";
        let report = run(csv);
        let kinds: Vec<IssueKind> = report.issues().iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingColumn,
                IssueKind::NullValues,
                IssueKind::InvalidType,
                IssueKind::DuplicateKey,
            ]
        );
    }
}
