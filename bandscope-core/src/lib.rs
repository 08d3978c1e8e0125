//! Bandscope Core: column aliases, validation, CSV loading and the typed
//! valuation table.
//!
//! The flow for one load event:
//! - [`RawTable`] reads the CSV with every cell kept as text
//! - [`resolve_columns`] maps canonical fields onto the file's headers
//! - [`validate`] reports missing columns and data-quality problems
//! - [`ValuationTable::from_raw`] coerces the accepted table into records

pub mod alias;
pub mod coerce;
pub mod config;
pub mod data;
pub mod domain;
pub mod processor;
pub mod schema;
pub mod validate;

pub use alias::{resolve_columns, ColumnMapping, ResolvedColumn};
pub use config::{AppConfig, ConfigError, ProcessorConfig, ValidationConfig};
pub use data::{LoadError, RawTable};
pub use domain::{CoercionSkip, StockRecord, ValuationZone};
pub use processor::{ProcessError, ProcessedLoad, ValuationTable};
pub use schema::{default_specs, ColumnSpec, ColumnType, Field};
pub use validate::{validate, IssueKind, Severity, ValidationIssue, ValidationReport};
