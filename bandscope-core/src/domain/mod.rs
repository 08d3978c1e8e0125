//! Domain types for valuation tables

pub mod record;

pub use record::{CoercionSkip, StockRecord, ValuationZone};
