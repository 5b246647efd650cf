// crates/dht-eval-core/tests/proptest_percentile.rs
// ============================================================================
// Module: Percentile Property-Based Tests
// Description: Property tests for percentile and merge invariants.
// Purpose: Detect ordering and identity violations across wide input ranges.
// ============================================================================

//! Property-based tests for aggregation and merge invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only assertions and helpers are permitted."
)]

use dht_eval_core::AggregatedRow;
use dht_eval_core::ExperimentKey;
use dht_eval_core::MeasurementQuery;
use dht_eval_core::ResultTable;
use dht_eval_core::SampleMatrix;
use dht_eval_core::merge_tables;
use dht_eval_core::percentile;
use dht_eval_core::summarize;
use proptest::prelude::*;

fn matrix_strategy() -> impl Strategy<Value = SampleMatrix> {
    (1_usize .. 4).prop_flat_map(|columns| {
        prop::collection::vec(prop::collection::vec(-1.0e6_f64 .. 1.0e6, columns), 1 .. 64)
            .prop_map(move |rows| SampleMatrix::from_rows(columns, rows).expect("matrix"))
    })
}

fn sorted_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6_f64 .. 1.0e6, 1 .. 128).prop_map(|mut values| {
        values.sort_by(f64::total_cmp);
        values
    })
}

fn table_strategy() -> impl Strategy<Value = ResultTable> {
    prop::collection::btree_map((1_u32 .. 1024, 0_u32 .. 100), (0.0_f64 .. 1.0e4, 0.0_f64 .. 1.0e4), 0 .. 16)
        .prop_map(|entries| {
            let rows = entries
                .into_iter()
                .map(|((num_nodes, latency), (median, upper))| AggregatedRow {
                    key: ExperimentKey::new(num_nodes, latency),
                    query: MeasurementQuery::Client,
                    percentile: 99.0,
                    median: vec![median, median * 2.0],
                    upper: vec![upper, upper * 2.0],
                })
                .collect();
            ResultTable::from_rows(rows).expect("table")
        })
}

proptest! {
    #[test]
    fn median_equals_fiftieth_percentile(matrix in matrix_strategy(), rank in 0.0_f64 ..= 100.0) {
        let summary = summarize(&matrix, rank).expect("summary");
        let fiftieth = summarize(&matrix, 50.0).expect("p50");
        prop_assert_eq!(&summary.median, &fiftieth.upper);
        prop_assert_eq!(summary.median.len(), matrix.column_count());
        prop_assert_eq!(summary.upper.len(), matrix.column_count());
    }

    #[test]
    fn percentile_is_monotonic_in_rank(
        values in sorted_strategy(),
        low in 0.0_f64 ..= 100.0,
        high in 0.0_f64 ..= 100.0,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let below = percentile(&values, low).expect("low");
        let above = percentile(&values, high).expect("high");
        prop_assert!(below <= above, "p{low}={below} > p{high}={above}");
    }

    #[test]
    fn percentile_stays_within_sample_bounds(values in sorted_strategy(), rank in 0.0_f64 ..= 100.0) {
        let value = percentile(&values, rank).expect("percentile");
        prop_assert!(values[0] <= value);
        prop_assert!(value <= values[values.len() - 1]);
    }

    #[test]
    fn single_table_merge_is_identity(table in table_strategy()) {
        let merged = merge_tables(vec![table.clone()]).expect("merge");
        prop_assert_eq!(merged, table);
    }

    #[test]
    fn merging_identical_tables_returns_the_input(table in table_strategy()) {
        let merged = merge_tables(vec![table.clone(), table.clone()]).expect("merge");
        prop_assert_eq!(merged, table);
    }
}
