//! Data ingestion

pub mod ingest;

pub use ingest::{LoadError, RawTable};
