//! One load event: read → resolve → validate → process.
//!
//! The processor only runs when the report has no errors. Everything the
//! UI shows about a load lives in the returned [`ProcessOutcome`].

use bandscope_core::{
    resolve_columns, validate, AppConfig, CoercionSkip, ColumnMapping, LoadError, ProcessError,
    RawTable, ValidationReport, ValuationTable,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("processing failed: {0}")]
    Process(#[from] ProcessError),
}

impl RunError {
    /// Remediation text shown next to the error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            RunError::Load(e) => e.suggestion(),
            RunError::Process(_) => "Check the column mapping in the report and try reloading the file.",
        }
    }
}

/// Everything produced by one load event.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// File the data came from, when loaded from disk.
    pub source: Option<PathBuf>,
    pub headers: Vec<String>,
    pub row_count: usize,
    /// BLAKE3 digest of the raw table.
    pub fingerprint: String,
    pub mapping: ColumnMapping,
    pub report: ValidationReport,
    /// `None` whenever the report has errors.
    pub table: Option<ValuationTable>,
    pub coercion_skips: Vec<CoercionSkip>,
}

impl ProcessOutcome {
    /// Short display name for the data source.
    pub fn source_label(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "<memory>".to_string(),
        }
    }

    /// Headers, in file order, that no field resolved to.
    pub fn unmatched_headers(&self) -> Vec<&str> {
        let used: Vec<usize> = self.mapping.iter().map(|(_, c)| c.index).collect();
        self.headers
            .iter()
            .enumerate()
            .filter(|(i, h)| !used.contains(i) && !h.trim().is_empty())
            .map(|(_, h)| h.as_str())
            .collect()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// First 16 hex characters of the fingerprint.
    pub fn short_fingerprint(&self) -> &str {
        let end = self.fingerprint.len().min(16);
        &self.fingerprint[..end]
    }
}

/// Run the pipeline on a CSV file.
pub fn process_file(path: &Path, config: &AppConfig) -> Result<ProcessOutcome, RunError> {
    let raw = RawTable::from_path(path)?;
    let mut outcome = process_table(raw, config)?;
    outcome.source = Some(path.to_path_buf());
    Ok(outcome)
}

/// Run the pipeline on CSV bytes already in memory.
pub fn process_bytes(bytes: &[u8], config: &AppConfig) -> Result<ProcessOutcome, RunError> {
    let raw = RawTable::from_bytes(bytes)?;
    process_table(raw, config)
}

/// Run the pipeline on a loaded raw table.
pub fn process_table(raw: RawTable, config: &AppConfig) -> Result<ProcessOutcome, RunError> {
    let specs = config.column_specs();
    let mapping = resolve_columns(raw.headers(), &specs);
    let report = validate(&raw, &mapping, &specs, &config.validation);

    let (table, coercion_skips) = if report.is_valid() {
        let load = ValuationTable::from_raw(&raw, &mapping, &config.processing)?;
        (Some(load.table), load.skips)
    } else {
        tracing::warn!(
            errors = report.error_count(),
            "validation failed; table not processed"
        );
        (None, Vec::new())
    };

    Ok(ProcessOutcome {
        source: None,
        headers: raw.headers().to_vec(),
        row_count: raw.row_count(),
        fingerprint: raw.fingerprint(),
        mapping,
        report,
        table,
        coercion_skips,
    })
}
