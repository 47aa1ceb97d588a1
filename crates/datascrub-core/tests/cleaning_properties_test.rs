//! Integration tests for the cleaning operations
//!
//! These tests verify that:
//! - Deduplication and text normalization are idempotent
//! - Filling never touches columns without missing values
//! - Mean/median fills use the pre-fill statistic and are stable on re-run
//! - Min-max scaling maps the extremes to 0.0 and 1.0

use datascrub_core::cleaning::{FillSpec, FillStrategy, NormalizeSpec, TextCase};
use datascrub_core::report::{NoopReporter, RecordingReporter};
use datascrub_core::{fill_missing, normalize, remove_duplicates, Column, Table, Value};
use proptest::prelude::*;

fn customer_table() -> Table {
    Table::from_columns(vec![
        Column::numeric("age", vec![Some(25.0), None, Some(35.0)]),
        Column::text("city", vec![Some("ny"), None, Some("LA")]),
    ])
    .unwrap()
}

#[test]
fn test_mean_and_custom_value_scenario() {
    let mut table = customer_table();
    let spec = FillSpec::new()
        .with_strategy("age", FillStrategy::Mean)
        .with_custom_value("city", "unknown");

    let mut reporter = RecordingReporter::new();
    let filled = fill_missing(&mut table, &spec, &mut reporter).unwrap();

    assert_eq!(filled, 2);
    let age = table.column("age").unwrap();
    assert_eq!(
        (0..3).map(|row| age.get(row)).collect::<Vec<_>>(),
        vec![Some(Value::Numeric(25.0)), Some(Value::Numeric(30.0)), Some(Value::Numeric(35.0))]
    );
    let city = table.column("city").unwrap();
    assert_eq!(
        (0..3).map(|row| city.get(row)).collect::<Vec<_>>(),
        vec![Some(Value::from("ny")), Some(Value::from("unknown")), Some(Value::from("LA"))]
    );

    let columns: Vec<&str> = reporter.events().iter().map(|e| e.column.as_str()).collect();
    assert_eq!(columns, vec!["age", "city"]);
}

#[test]
fn test_median_fill_is_idempotent() {
    let mut table = customer_table();
    let spec = FillSpec::new().with_strategy("age", FillStrategy::Median);

    fill_missing(&mut table, &spec, &mut NoopReporter).unwrap();
    let once = table.clone();
    fill_missing(&mut table, &spec, &mut NoopReporter).unwrap();

    assert_eq!(table, once);
}

#[test]
fn test_median_on_text_column_is_a_no_op() {
    let mut table = customer_table();
    let before = table.clone();
    let spec = FillSpec::new().with_strategy("city", FillStrategy::Median);

    let mut reporter = RecordingReporter::new();
    fill_missing(&mut table, &spec, &mut reporter).unwrap();

    assert_eq!(table, before);
    assert_eq!(reporter.events()[0].description, "Skipped median: column is not numeric");
}

#[test]
fn test_full_pipeline_order() {
    let mut table = Table::from_columns(vec![
        Column::text("name", vec![Some("ann lee"), Some("ann lee"), Some("BOB"), None]),
        Column::numeric("score", vec![Some(10.0), Some(10.0), None, Some(30.0)]),
        Column::text("joined", vec![Some("2024-01-05"), Some("2024-01-05"), Some("bad"), None]),
    ])
    .unwrap();

    assert_eq!(remove_duplicates(&mut table), 1);

    let fill = FillSpec::new()
        .with_strategy("score", FillStrategy::ForwardFill)
        .with_custom_value("name", "anonymous");
    fill_missing(&mut table, &fill, &mut NoopReporter).unwrap();

    let spec = NormalizeSpec::new()
        .with_text_case(TextCase::Title)
        .with_scaling(true)
        .with_date_format("joined", "%Y-%m-%d");
    normalize(&mut table, &spec, &mut NoopReporter).unwrap();

    let name = table.column("name").unwrap();
    assert_eq!(name.get(0), Some(Value::from("Ann Lee")));
    assert_eq!(name.get(2), Some(Value::from("Anonymous")));

    let score = table.column("score").unwrap();
    assert_eq!(score.get(0), Some(Value::Numeric(0.0)));
    assert_eq!(score.get(1), Some(Value::Numeric(0.0)));
    assert_eq!(score.get(2), Some(Value::Numeric(1.0)));

    let joined = table.column("joined").unwrap();
    assert_eq!(joined.get(0).map(|v| v.to_string()), Some("2024-01-05".to_string()));
    assert_eq!(joined.get(1), None);
    assert_eq!(joined.get(2), None);
}

fn arb_table() -> impl Strategy<Value = Table> {
    (0usize..12).prop_flat_map(|rows| {
        (
            prop::collection::vec(prop::option::of(0i32..4), rows),
            prop::collection::vec(prop::option::of("[a-c]{1,2}"), rows),
            prop::collection::vec(prop::option::of(any::<bool>()), rows),
        )
            .prop_map(|(numbers, words, flags)| {
                Table::from_columns(vec![
                    Column::numeric("n", numbers.into_iter().map(|v| v.map(f64::from)).collect()),
                    Column::text("w", words),
                    Column::boolean("b", flags),
                ])
                .unwrap()
            })
    })
}

proptest! {
    #[test]
    fn prop_dedup_is_idempotent(table in arb_table()) {
        let mut once = table.clone();
        remove_duplicates(&mut once);
        let mut twice = once.clone();
        let removed = remove_duplicates(&mut twice);

        prop_assert_eq!(removed, 0);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_fill_leaves_complete_columns_unchanged(
        values in prop::collection::vec(-1.0e6f64..1.0e6, 1..20),
        strategy in prop::sample::select(vec![
            FillStrategy::Mean,
            FillStrategy::Median,
            FillStrategy::Mode,
            FillStrategy::ForwardFill,
            FillStrategy::BackwardFill,
        ]),
    ) {
        let column = Column::numeric("x", values.into_iter().map(Some).collect());
        let mut table = Table::from_columns(vec![column]).unwrap();
        let before = table.clone();

        let spec = FillSpec::new().with_strategy("x", strategy);
        let filled = fill_missing(&mut table, &spec, &mut NoopReporter).unwrap();

        prop_assert_eq!(filled, 0);
        prop_assert_eq!(table, before);
    }

    #[test]
    fn prop_text_normalization_is_idempotent(
        words in prop::collection::vec(prop::option::of("[a-zA-ZßﬁéÉñøσΣжЖ' -]{0,16}"), 0..10),
        case in prop::sample::select(vec![TextCase::Lower, TextCase::Upper, TextCase::Title]),
    ) {
        let mut table = Table::from_columns(vec![Column::text("w", words)]).unwrap();
        let spec = NormalizeSpec::new().with_text_case(case);

        normalize(&mut table, &spec, &mut NoopReporter).unwrap();
        let once = table.clone();
        normalize(&mut table, &spec, &mut NoopReporter).unwrap();

        prop_assert_eq!(table, once);
    }

    #[test]
    fn prop_scaling_maps_extremes(
        values in prop::collection::vec(prop::option::of(-1.0e308f64..1.0e308), 1..20),
    ) {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let mut table = Table::from_columns(vec![Column::numeric("x", values.clone())]).unwrap();
        normalize(&mut table, &NormalizeSpec::new().with_scaling(true), &mut NoopReporter)
            .unwrap();

        let column = table.column("x").unwrap();
        if let Some(min) = present.iter().copied().reduce(f64::min) {
            let max = present.iter().copied().reduce(f64::max).unwrap();
            for (row, original) in values.iter().enumerate() {
                let scaled = column.get(row);
                match original {
                    None => prop_assert_eq!(scaled, None),
                    Some(_) if min == max => prop_assert_eq!(scaled, Some(Value::Numeric(0.0))),
                    Some(v) if *v == min => prop_assert_eq!(scaled, Some(Value::Numeric(0.0))),
                    Some(v) if *v == max => prop_assert_eq!(scaled, Some(Value::Numeric(1.0))),
                    Some(_) => match scaled {
                        Some(Value::Numeric(s)) => prop_assert!((0.0..=1.0).contains(&s)),
                        other => prop_assert!(false, "unexpected cell {:?}", other),
                    },
                }
            }
        }
    }
}
