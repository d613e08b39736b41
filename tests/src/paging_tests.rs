//! Coverage properties of the date-range paginator

use proptest::prelude::*;
use rstest::*;
use tracklet_core::paging::{DateRange, WINDOW_DAYS, date_ranges, date_ranges_from};
use tracklet_core::timing::DAY_MS;

const NOW: i64 = 1_700_000_000_000;

fn assert_gapless(ranges: &[DateRange], oldest: i64, newest: i64) {
    assert_eq!(ranges[0].end, newest);
    assert!(ranges.last().unwrap().start <= oldest);

    // Most recent first; each window reaches back to (or past) the next one's end.
    for pair in ranges.windows(2) {
        assert!(pair[1].end < pair[0].end);
        assert!(pair[0].contains(pair[1].end));
    }
}

#[rstest]
#[case(30, 15, 3)]
#[case(365, 15, 25)]
#[case(15, 15, 2)]
#[case(0, 15, 1)]
#[case(90, 30, 4)]
fn test_window_counts(#[case] max_history: u32, #[case] step: u32, #[case] expected: usize) {
    assert_eq!(date_ranges_from(NOW, max_history, step).len(), expected);
}

#[test]
fn test_thirty_days_in_fifteen_day_windows() {
    let ranges = date_ranges_from(NOW, 30, 15);

    assert_gapless(&ranges, NOW - 30 * DAY_MS, NOW);
    for range in &ranges {
        assert_eq!(range.end - range.start, 15 * DAY_MS);
    }
}

#[test]
fn test_live_clock_is_restartable() {
    let first = date_ranges(30, 15);
    let second = date_ranges(30, 15);

    assert_eq!(first.len(), second.len());
    assert!(second[0].end >= first[0].end);
}

proptest! {
    #[test]
    fn test_windows_cover_history_without_gaps(max_history in 0u32..1000, step in 1u32..=15) {
        let ranges = date_ranges_from(NOW, max_history, step);
        let oldest = NOW - i64::from(max_history) * DAY_MS;

        prop_assert!(!ranges.is_empty());
        prop_assert_eq!(ranges[0].end, NOW);
        prop_assert!(ranges.last().unwrap().start <= oldest);
        for range in &ranges {
            prop_assert_eq!(range.span_days(), WINDOW_DAYS);
        }
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].contains(pair[1].end));
        }
    }

    #[test]
    fn test_every_instant_falls_in_a_window(max_history in 0u32..1000, step in 1u32..=15, fraction in 0.0f64..=1.0) {
        let ranges = date_ranges_from(NOW, max_history, step);
        let span = i64::from(max_history) * DAY_MS;
        let instant = NOW - (span as f64 * fraction) as i64;

        prop_assert!(ranges.iter().any(|range| range.contains(instant)));
    }

    #[test]
    fn test_pure_function_of_inputs(now in 0i64..4_000_000_000_000, max_history in 0u32..400, step in 0u32..60) {
        prop_assert_eq!(
            date_ranges_from(now, max_history, step),
            date_ranges_from(now, max_history, step)
        );
    }
}
