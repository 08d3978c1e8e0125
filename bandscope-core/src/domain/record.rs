//! StockRecord: one typed row of a valuation table.

use crate::schema::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Valuation levels and closing price for one symbol in one year.
///
/// Prices are `None` where the cell was empty or failed coercion. The band is
/// expected to satisfy `cheap <= fair <= expensive` but this is only checked
/// as a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Zero-based data row in the source file.
    pub row: usize,
    pub year: Option<i32>,
    pub symbol: String,
    pub category: String,
    pub cheap: Option<f64>,
    pub fair: Option<f64>,
    pub expensive: Option<f64>,
    pub close: Option<f64>,
    pub close_date: Option<String>,
}

impl StockRecord {
    /// Value of a price field.
    pub fn price(&self, field: Field) -> Option<f64> {
        match field {
            Field::Cheap => self.cheap,
            Field::Fair => self.fair,
            Field::Expensive => self.expensive,
            Field::Close => self.close,
            _ => None,
        }
    }

    /// True when the full band is present and ordered. A partial band is
    /// treated as ordered since there is nothing to compare.
    pub fn is_valuation_ordered(&self) -> bool {
        match (self.cheap, self.fair, self.expensive) {
            (Some(c), Some(f), Some(e)) => c <= f && f <= e,
            _ => true,
        }
    }

    /// Which part of the band the close falls into.
    ///
    /// Needs the close and all three levels. The zones are `< cheap`,
    /// `cheap..=fair`, `(fair, expensive]` and `> expensive`.
    pub fn zone(&self) -> Option<ValuationZone> {
        let close = self.close?;
        let (cheap, fair, expensive) = (self.cheap?, self.fair?, self.expensive?);
        let zone = if close < cheap {
            ValuationZone::BelowCheap
        } else if close <= fair {
            ValuationZone::CheapToFair
        } else if close <= expensive {
            ValuationZone::FairToExpensive
        } else {
            ValuationZone::AboveExpensive
        };
        Some(zone)
    }

    /// Highest of the non-null price values.
    pub fn max_price(&self) -> Option<f64> {
        Field::PRICES
            .into_iter()
            .filter_map(|f| self.price(f))
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

/// Position of the close relative to the valuation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationZone {
    BelowCheap,
    CheapToFair,
    FairToExpensive,
    AboveExpensive,
}

impl ValuationZone {
    pub fn label(self) -> &'static str {
        match self {
            ValuationZone::BelowCheap => "below cheap (低於便宜價)",
            ValuationZone::CheapToFair => "cheap to fair (便宜至合理)",
            ValuationZone::FairToExpensive => "fair to expensive (合理至昂貴)",
            ValuationZone::AboveExpensive => "above expensive (高於昂貴價)",
        }
    }
}

impl fmt::Display for ValuationZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A non-null cell that could not be coerced to its column type.
///
/// The cell reads as null in the processed table; the row is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionSkip {
    pub row: usize,
    pub field: Field,
    pub raw: String,
}

impl fmt::Display for CoercionSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {} value '{}' is not valid", self.row, self.field, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> StockRecord {
        StockRecord {
            row: 0,
            year: Some(2023),
            symbol: "AAPL".into(),
            category: "Tech".into(),
            cheap: Some(120.50),
            fair: Some(150.00),
            expensive: Some(180.25),
            close: Some(145.30),
            close_date: None,
        }
    }

    #[test]
    fn ordered_band() {
        assert!(aapl().is_valuation_ordered());
        let inverted = StockRecord {
            cheap: Some(200.0),
            ..aapl()
        };
        assert!(!inverted.is_valuation_ordered());
    }

    #[test]
    fn partial_band_counts_as_ordered() {
        let partial = StockRecord {
            fair: None,
            cheap: Some(500.0),
            ..aapl()
        };
        assert!(partial.is_valuation_ordered());
    }

    #[test]
    fn zones() {
        assert_eq!(aapl().zone(), Some(ValuationZone::CheapToFair));
        let at = |close| StockRecord {
            close: Some(close),
            ..aapl()
        };
        assert_eq!(at(100.0).zone(), Some(ValuationZone::BelowCheap));
        assert_eq!(at(120.50).zone(), Some(ValuationZone::CheapToFair));
        assert_eq!(at(150.0).zone(), Some(ValuationZone::CheapToFair));
        assert_eq!(at(160.0).zone(), Some(ValuationZone::FairToExpensive));
        assert_eq!(at(200.0).zone(), Some(ValuationZone::AboveExpensive));
    }

    #[test]
    fn zone_needs_close() {
        let no_close = StockRecord {
            close: None,
            ..aapl()
        };
        assert_eq!(no_close.zone(), None);
    }

    #[test]
    fn max_price_skips_nulls() {
        assert_eq!(aapl().max_price(), Some(180.25));
        let sparse = StockRecord {
            cheap: None,
            fair: None,
            expensive: None,
            close: None,
            ..aapl()
        };
        assert_eq!(sparse.max_price(), None);
    }
}
