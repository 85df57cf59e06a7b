//! How urgently the user needs to leave.

use crate::domain::{LocalDateTime, whole_minutes};

/// Minutes left on the subway at or below which the user should run.
pub const RUN_NOW_MINS: i64 = 10;

/// Minutes left on the subway at or below which the user should hurry.
pub const HURRY_MINS: i64 = 30;

/// Urgency level derived from the last departures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Nothing runs any more tonight
    AllGone,
    /// The subway has stopped but other transit still runs
    SubwayGone { any_minutes_left: i64 },
    /// The last subway leaves within `RUN_NOW_MINS`
    RunNow { minutes_left: i64 },
    /// The last subway leaves within `HURRY_MINS`
    Hurry { minutes_left: i64 },
    /// Plenty of time left
    Relaxed { minutes_left: i64 },
}

impl Urgency {
    /// Classify urgency at `now`.
    ///
    /// A missing last departure counts as zero minutes left.
    pub fn assess(
        now: LocalDateTime,
        any_last: Option<LocalDateTime>,
        subway_last: Option<LocalDateTime>,
    ) -> Self {
        let left = |last: Option<LocalDateTime>| last.map_or(0, |t| whole_minutes(t - now));
        let subway_left = left(subway_last);
        let any_left = left(any_last);

        if subway_left <= 0 {
            if any_left > 0 {
                Urgency::SubwayGone {
                    any_minutes_left: any_left,
                }
            } else {
                Urgency::AllGone
            }
        } else if subway_left <= RUN_NOW_MINS {
            Urgency::RunNow {
                minutes_left: subway_left,
            }
        } else if subway_left <= HURRY_MINS {
            Urgency::Hurry {
                minutes_left: subway_left,
            }
        } else {
            Urgency::Relaxed {
                minutes_left: subway_left,
            }
        }
    }

    /// Short machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Urgency::AllGone => "all_gone",
            Urgency::SubwayGone { .. } => "subway_gone",
            Urgency::RunNow { .. } => "run_now",
            Urgency::Hurry { .. } => "hurry",
            Urgency::Relaxed { .. } => "relaxed",
        }
    }

    /// One-line headline.
    pub fn headline(&self) -> &'static str {
        match self {
            Urgency::AllGone => "🚨 Everything has stopped!",
            Urgency::SubwayGone { .. } => "🚇 Subway is done. Take the bus!",
            Urgency::RunNow { .. } => "🔥 Run, right now!",
            Urgency::Hurry { .. } => "⚠️ Hurry up!",
            Urgency::Relaxed { .. } => "⏰ Still some time",
        }
    }

    /// Advice sentence to go with the headline.
    pub fn advice(&self) -> String {
        match self {
            Urgency::AllGone => {
                "No public transport tonight. Aim for the first service tomorrow.".to_string()
            }
            Urgency::SubwayGone { any_minutes_left } => {
                format!("{any_minutes_left} minutes until the last departure.")
            }
            Urgency::RunNow { minutes_left } => {
                format!("{minutes_left} minutes to the last subway. Put the phone away and run!")
            }
            Urgency::Hurry { minutes_left } => {
                format!("{minutes_left} minutes to the last subway. Leave now!")
            }
            Urgency::Relaxed { minutes_left } => {
                format!("{minutes_left} minutes to the last subway, but don't leave it too late.")
            }
        }
    }
}
