//! Date-range pagination for history-limited endpoints
//!
//! Exchanges cap the span a single history query may cover. The paginator walks
//! backwards from "now" and yields fixed-width windows until the configured
//! look-back is covered. Consecutive windows touch at their boundary, so an event
//! stamped exactly on it can be returned twice; callers concatenate pages as-is.

use crate::timing::{DAY_MS, now_millis};
use serde::{Deserialize, Serialize};

/// Width of every emitted window, independent of the step between cursors.
pub const WINDOW_DAYS: i64 = 15;

/// One page of a historical query, in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn span_days(&self) -> i64 {
        (self.end - self.start) / DAY_MS
    }

    pub fn contains(&self, ms: i64) -> bool {
        self.start <= ms && ms <= self.end
    }
}

/// Windows covering the last `max_history_days`, most recent first.
pub fn date_ranges(max_history_days: u32, step_days: u32) -> Vec<DateRange> {
    date_ranges_from(now_millis(), max_history_days, step_days)
}

/// Same as [`date_ranges`] with an explicit "now"; a pure function of its inputs.
///
/// A zero step would never advance the cursor, so it yields the single most
/// recent window.
pub fn date_ranges_from(now_ms: i64, max_history_days: u32, step_days: u32) -> Vec<DateRange> {
    let oldest = now_ms - i64::from(max_history_days) * DAY_MS;
    let window = WINDOW_DAYS * DAY_MS;
    let step = i64::from(step_days) * DAY_MS;

    let mut ranges = Vec::new();
    let mut cursor = now_ms;

    while cursor >= oldest {
        ranges.push(DateRange {
            start: cursor - window,
            end: cursor,
        });

        if step == 0 {
            break;
        }
        cursor -= step;
    }

    ranges
}
