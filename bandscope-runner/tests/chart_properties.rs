//! Property tests for chart specs.
//!
//! 1. Every plotted value lies inside the padded y range
//! 2. Null prices drop points, never whole records
//! 3. Category segments always come in pairs around their symbol
//! 4. The gauge reports the record's own zone and fits on its axis

use bandscope_core::StockRecord;
use bandscope_runner::{band_chart, category_chart, valuation_gauge, TraceRole, TraceStyle};
use proptest::prelude::*;

fn arb_price() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        4 => (1.0f64..5_000.0).prop_map(Some),
    ]
}

fn arb_record() -> impl Strategy<Value = StockRecord> {
    (
        2000i32..2030,
        "[A-Z]{1,4}",
        arb_price(),
        arb_price(),
        arb_price(),
        arb_price(),
    )
        .prop_map(|(year, symbol, cheap, fair, expensive, close)| StockRecord {
            row: 0,
            year: Some(year),
            symbol,
            category: "Tech".into(),
            cheap,
            fair,
            expensive,
            close,
            close_date: None,
        })
}

proptest! {
    #[test]
    fn band_points_inside_range(records in proptest::collection::vec(arb_record(), 1..12)) {
        let spec = band_chart("X", &records);
        if let Some([lo, hi]) = spec.y_axis.range {
            for trace in &spec.traces {
                for p in &trace.points {
                    prop_assert!(p.y >= lo && p.y <= hi);
                }
            }
        } else {
            prop_assert!(spec.is_empty());
        }
    }

    #[test]
    fn null_prices_drop_single_points(records in proptest::collection::vec(arb_record(), 1..12)) {
        let spec = band_chart("X", &records);
        for role in TraceRole::ALL {
            let expected = records.iter().filter(|r| r.price(role.field()).is_some()).count();
            let trace = spec.trace(role).unwrap();
            prop_assert_eq!(trace.points.len(), expected);
        }
    }

    #[test]
    fn category_segments_pair_up(records in proptest::collection::vec(arb_record(), 1..8)) {
        let spec = category_chart("Tech", None, &records);
        for trace in spec.traces.iter().filter(|t| t.style == TraceStyle::Segments) {
            prop_assert_eq!(trace.points.len() % 2, 0);
            for pair in trace.points.chunks(2) {
                prop_assert_eq!(pair[0].y, pair[1].y);
                let centre = (pair[0].x + pair[1].x) / 2.0;
                prop_assert!((centre - centre.round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn gauge_matches_record(record in arb_record()) {
        match valuation_gauge(&record) {
            Some(gauge) => {
                prop_assert_eq!(Some(gauge.zone), record.zone());
                prop_assert!(gauge.value <= gauge.max);
                prop_assert_eq!(gauge.steps.len(), 4);
            }
            None => {
                let complete = record.cheap.is_some()
                    && record.fair.is_some()
                    && record.expensive.is_some()
                    && record.close.is_some();
                prop_assert!(!complete || record.zone().is_none());
            }
        }
    }
}
