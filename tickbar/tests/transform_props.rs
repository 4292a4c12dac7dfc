use chrono::{DateTime, Timelike, Utc};
use proptest::prelude::*;
use tickbar::{DataProcessor, FrequencyFilter, Period, TimeSeriesTable};

fn t(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_584_057_600 + sec, 0).unwrap()
}

fn arb_table() -> impl Strategy<Value = TimeSeriesTable> {
    proptest::collection::vec((0i64..172_800, -1.0f64..1.0), 0..120).prop_map(|rows| {
        let (secs, vals): (Vec<i64>, Vec<f64>) = rows.into_iter().unzip();
        TimeSeriesTable::from_float_columns(secs.into_iter().map(t).collect(), [("v", vals)])
            .unwrap()
    })
}

proptest! {
    #[test]
    fn time_freq_keeps_whole_timestamp_groups(table in arb_table(), n in 1u32..60) {
        let p = DataProcessor::new(table);
        let src = p.data();
        let out = p.time_freq(FrequencyFilter::new(Period::Minute).length(n)).unwrap().into_inner();
        for ts in out.index() {
            let in_src = src.index().iter().filter(|x| *x == ts).count();
            let in_out = out.index().iter().filter(|x| *x == ts).count();
            prop_assert_eq!(in_src, in_out);
        }
        prop_assert!(out.is_sorted());
    }

    #[test]
    fn index_range_bounds(table in arb_table(), a in 0i64..172_800, b in 0i64..172_800) {
        let (lo, hi) = (t(a.min(b)), t(a.max(b)));
        let src = DataProcessor::new(table);
        let expected = src.table().index().iter().filter(|x| **x >= lo && **x <= hi).count();
        let out = src.index_range(lo, hi).unwrap().into_inner();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn between_time_respects_window(table in arb_table(), h0 in 0u32..24, h1 in 0u32..24) {
        let start = chrono::NaiveTime::from_hms_opt(h0, 0, 0).unwrap();
        let end = chrono::NaiveTime::from_hms_opt(h1, 0, 0).unwrap();
        let out = DataProcessor::new(table).between_time(start, end).unwrap().into_inner();
        for ts in out.index() {
            let secs = ts.num_seconds_from_midnight();
            let (s, e) = (h0 * 3600, h1 * 3600);
            if s <= e {
                prop_assert!(s <= secs && secs <= e);
            } else {
                prop_assert!(secs >= s || secs <= e);
            }
        }
    }
}
