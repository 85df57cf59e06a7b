//! Advisor configuration.

use chrono::{Duration, NaiveTime};

use crate::domain::{DomainError, LocalDateTime, SearchWindow};

/// Configuration parameters for last-departure estimation.
///
/// Passed explicitly into the classifier, the search and the recommendation
/// grid, so tests can use narrow windows and tight thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    /// Local time of day the night window opens.
    pub window_start: NaiveTime,

    /// Local time of day the night window closes (next day when earlier
    /// than `window_start`).
    pub window_end: NaiveTime,

    /// Longest trip still counted as a real night route (minutes).
    /// Anything longer is waiting for the first morning service.
    pub max_total_mins: i64,

    /// Longest wait before the first vehicle (minutes).
    pub max_wait_mins: i64,

    /// Duration multiple of the baseline at which a trip counts as degraded.
    pub degradation_factor: f64,

    /// Number of bisection steps per last-departure search.
    pub bisection_steps: u32,

    /// Spacing of the recommendation sample grid (minutes).
    pub sample_interval_mins: i64,

    /// Upper bound on recommendation samples per request.
    pub max_samples: usize,

    /// Per-call limit on a single routing-service query (seconds).
    pub oracle_timeout_secs: u64,
}

impl AdvisorConfig {
    /// Returns the sample spacing as a Duration.
    pub fn sample_interval(&self) -> Duration {
        Duration::minutes(self.sample_interval_mins)
    }

    /// Returns the per-call oracle timeout.
    pub fn oracle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.oracle_timeout_secs)
    }

    /// The night window `now` belongs to.
    pub fn window_at(&self, now: LocalDateTime) -> Result<SearchWindow, DomainError> {
        SearchWindow::tonight(now, self.window_start, self.window_end)
    }

    /// Upper bound on routing-service calls made for one advisory.
    ///
    /// One baseline probe, two searches of two boundary probes plus the
    /// bisection steps each, and the recommendation grid.
    pub fn max_oracle_calls(&self) -> usize {
        1 + 2 * (2 + self.bisection_steps as usize) + self.max_samples
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            window_start: NaiveTime::from_hms_opt(20, 30, 0).expect("valid time"),
            window_end: NaiveTime::from_hms_opt(2, 0, 0).expect("valid time"),
            max_total_mins: 210,
            max_wait_mins: 80,
            degradation_factor: 1.5,
            bisection_steps: 6,
            sample_interval_mins: 30,
            max_samples: 24, // 12 hours of 30-minute samples
            oracle_timeout_secs: 10,
        }
    }
}
