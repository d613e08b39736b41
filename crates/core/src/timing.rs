//! Wall-clock helpers and request timing
//!
//! Exchange history APIs speak Unix milliseconds; everything here does too.

use chrono::Utc;
use std::time::Instant;

/// Milliseconds in one day
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Current wall-clock time in Unix milliseconds.
#[inline]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Named stopwatch around one fetch stage or request.
pub struct PerfTimer {
    start: Instant,
    name: String,
}

impl PerfTimer {
    /// Start a new performance timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Log the elapsed time
    pub fn log_elapsed(&self) {
        let micros = self.start.elapsed().as_micros();
        if micros < 1000 {
            tracing::debug!("⏱️  {} took {}μs", self.name, micros);
        } else {
            tracing::debug!("⏱️  {} took {:.3}ms", self.name, micros as f64 / 1000.0);
        }
    }
}
