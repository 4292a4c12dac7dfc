mod helpers;

use helpers::*;
use tickbar::{
    Aggregation, AlignmentPolicy, ColumnSelection, DataProcessor, END_PERIOD, FrequencyFilter,
    Period, START_PERIOD, TickbarError, TimeSeriesTable, Transform,
};

const NO_NAMES: Option<&[&str]> = None;

#[test]
fn new_sorts_by_time_keeping_duplicate_order() {
    let table = TimeSeriesTable::from_float_columns(
        vec![fri(10, 0), fri(9, 0), fri(10, 0)],
        [("Px", vec![2.0, 1.0, 3.0])],
    )
    .unwrap();
    let p = DataProcessor::new(table);
    assert_eq!(p.table().index(), &[fri(9, 0), fri(10, 0), fri(10, 0)]);
    assert_eq!(p.table().float_column("Px").unwrap(), &[1.0, 2.0, 3.0]);
}

#[test]
fn data_is_a_copy() {
    let p = DataProcessor::new(two_day_ticks());
    let copy = p.data();
    assert_eq!(&copy, p.table());
    assert_eq!(copy, p.into_inner());
}

#[test]
fn between_time_keeps_session_rows() {
    let out = DataProcessor::new(two_day_ticks())
        .between_time(hm(9, 0), hm(17, 0))
        .unwrap()
        .into_inner();
    assert_eq!(out.len(), 7);
    assert!(out.index().iter().all(|t| t.time() <= hm(17, 0)));
}

#[test]
fn between_time_wraps_past_midnight() {
    let out = DataProcessor::new(two_day_ticks())
        .between_time(hm(19, 0), hm(1, 0))
        .unwrap()
        .into_inner();
    assert_eq!(out.index(), &[fri(20, 0), dt(2020, 3, 16, 23, 15, 0)]);
}

#[test]
fn index_range_is_inclusive() {
    let out = DataProcessor::new(two_day_ticks())
        .index_range(fri(9, 31), fri(9, 36))
        .unwrap()
        .into_inner();
    assert_eq!(out.index(), &[fri(9, 31), fri(9, 33), fri(9, 36)]);
}

#[test]
fn positive_column_filters_rows() {
    let out = DataProcessor::new(two_day_ticks())
        .positive_column("Return")
        .unwrap()
        .into_inner();
    assert!(out.float_column("Return").unwrap().iter().all(|r| *r > 0.0));
    assert_eq!(out.len(), 6);
}

#[test]
fn positive_column_unknown_is_error() {
    let err = DataProcessor::new(two_day_ticks())
        .positive_column("Volume")
        .unwrap_err();
    assert_eq!(err, TickbarError::unknown_column("Volume"));
}

#[test]
fn rename_length_mismatch_is_invalid_configuration() {
    let err = DataProcessor::new(two_day_ticks())
        .rename_columns(["Return"], ["A", "B"])
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn rename_then_shift_is_pure() {
    let base = DataProcessor::new(two_day_ticks());
    let before = base.data();
    let out = base
        .rename_columns(["Return"], ["R"])
        .unwrap()
        .shift_to_new_column("R_next", "R", -1)
        .unwrap()
        .into_inner();
    assert_eq!(out.column_names().collect::<Vec<_>>(), vec!["R", "R_next"]);
    let r = out.float_column("R").unwrap();
    let next = out.float_column("R_next").unwrap();
    assert_eq!(next[0], r[1]);
    assert!(next[next.len() - 1].is_nan());
    assert!(before.column("R").is_err());
}

#[test]
fn time_freq_keeps_all_rows_at_resolved_timestamps() {
    // five-minute anchors from 09:30 Friday resolve to 09:30 and 09:33 (as-of 09:35)
    let filter = FrequencyFilter::new(Period::Minute)
        .length(5)
        .starting(fri(9, 30));
    let out = DataProcessor::new(two_day_ticks())
        .index_range(fri(9, 30), fri(9, 36))
        .unwrap()
        .time_freq(filter)
        .unwrap()
        .into_inner();
    assert_eq!(out.index(), &[fri(9, 30), fri(9, 30), fri(9, 33)]);
}

#[test]
fn custom_transform_runs_through_apply() {
    let scale = Transform::custom(|t: &TimeSeriesTable| {
        let doubled: Vec<f64> = t.float_column("Return")?.iter().map(|v| v * 2.0).collect();
        t.with_column(tickbar::Column::float("Return", doubled))
    });
    let out = DataProcessor::new(two_day_ticks())
        .apply(scale)
        .unwrap()
        .into_inner();
    assert_eq!(out.float_column("Return").unwrap()[0], 0.02);
}

#[test]
fn custom_transform_error_propagates() {
    let fail = Transform::custom(|_| Err(TickbarError::Data("boom".into())));
    let err = DataProcessor::new(two_day_ticks()).apply(fail).unwrap_err();
    assert_eq!(err, TickbarError::Data("boom".into()));
}

#[test]
fn session_bars_from_ticks() {
    let bars = DataProcessor::new(two_day_ticks())
        .between_time(hm(9, 0), hm(17, 0))
        .unwrap()
        .summarize_intervals(
            &FrequencyFilter::new(Period::Minute)
                .length(3)
                .indexing(AlignmentPolicy::BeforeAndAfter),
            &Aggregation::ohlc(),
            &ColumnSelection::one("Return"),
            Some(&["Open", "High", "Low", "Close"][..]),
        )
        .unwrap()
        .into_inner();

    assert_eq!(bars.index_name(), Some(START_PERIOD));
    assert_eq!(
        bars.column_names().collect::<Vec<_>>(),
        vec!["Open", "High", "Low", "Close", END_PERIOD]
    );
    // first bar spans 09:30 (both ticks) to the first resolved boundary after it
    assert_eq!(bars.index()[0], fri(9, 30));
    assert_eq!(bars.float_column("Open").unwrap()[0], 0.01);
    assert!(bars.len() >= 2);
    let ends = bars.column(END_PERIOD).unwrap().data.as_timestamp().unwrap();
    for (s, e) in bars.index().iter().zip(ends) {
        assert!(s < e);
    }
}

#[test]
fn bad_filter_surfaces_from_summary() {
    let err = DataProcessor::new(two_day_ticks())
        .summarize_intervals(
            &FrequencyFilter::new(Period::Hour).length(0),
            &[Aggregation::mean()],
            &ColumnSelection::All,
            NO_NAMES,
        )
        .unwrap_err();
    assert!(matches!(err, TickbarError::InvalidConfiguration(_)));
}
