//! Local time handling for night-window searches.
//!
//! Every instant the advisor works with is a `DateTime<FixedOffset>` in the
//! service's configured local offset. The night window crosses midnight, so
//! working out which evening "tonight" refers to depends on which side of
//! midnight the current time falls.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike};

use super::DomainError;

/// An instant in the service's local offset.
pub type LocalDateTime = DateTime<FixedOffset>;

/// The bounded interval searched for a last feasible departure.
///
/// # Invariants
///
/// - `earliest < latest`
///
/// # Examples
///
/// ```
/// use guardian_server::domain::SearchWindow;
/// use chrono::{DateTime, NaiveTime};
///
/// let now = DateTime::parse_from_rfc3339("2024-03-15T22:10:00+09:00").unwrap();
/// let start = NaiveTime::from_hms_opt(20, 30, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
///
/// let window = SearchWindow::tonight(now, start, end).unwrap();
/// assert_eq!(window.earliest().to_rfc3339(), "2024-03-15T20:30:00+09:00");
/// assert_eq!(window.latest().to_rfc3339(), "2024-03-16T02:00:00+09:00");
/// assert_eq!(window.span().num_minutes(), 330);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    earliest: LocalDateTime,
    latest: LocalDateTime,
}

impl SearchWindow {
    /// Create a window, rejecting empty or inverted intervals.
    pub fn new(earliest: LocalDateTime, latest: LocalDateTime) -> Result<Self, DomainError> {
        if earliest >= latest {
            return Err(DomainError::InvalidWindow { earliest, latest });
        }
        Ok(Self { earliest, latest })
    }

    /// Derive tonight's window from the current time.
    ///
    /// When `start` is later in the day than `end` the window crosses
    /// midnight. In that case a `now` before `end` (the small hours) belongs
    /// to the window that opened the previous evening; any other `now`
    /// belongs to the window opening this evening.
    pub fn tonight(
        now: LocalDateTime,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, DomainError> {
        let today = now.date_naive();

        let (start_date, end_date) = if start < end {
            (today, today)
        } else if now.time() < end {
            let yesterday = today.pred_opt().ok_or(DomainError::DateOutOfRange)?;
            (yesterday, today)
        } else {
            let tomorrow = today.succ_opt().ok_or(DomainError::DateOutOfRange)?;
            (today, tomorrow)
        };

        let earliest = at_local(start_date, start, now.offset())?;
        let latest = at_local(end_date, end, now.offset())?;

        Self::new(earliest, latest)
    }

    /// Start of the window.
    pub fn earliest(&self) -> LocalDateTime {
        self.earliest
    }

    /// End of the window.
    pub fn latest(&self) -> LocalDateTime {
        self.latest
    }

    /// Length of the window.
    pub fn span(&self) -> Duration {
        self.latest - self.earliest
    }
}

/// Build a local instant from a calendar date and a time of day.
fn at_local(
    date: NaiveDate,
    time: NaiveTime,
    offset: &FixedOffset,
) -> Result<LocalDateTime, DomainError> {
    let naive = date.and_time(time);
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or(DomainError::InvalidLocalTime(naive))
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(t: LocalDateTime) -> LocalDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Whole minutes in a duration, rounding towards negative infinity.
///
/// A departure 30 seconds in the past has `-1` minutes left, not `0`.
pub fn whole_minutes(d: Duration) -> i64 {
    d.num_seconds().div_euclid(60)
}

/// Format an instant as "HH:MM" in its own offset.
pub fn format_hhmm(t: LocalDateTime) -> String {
    t.format("%H:%M").to_string()
}
