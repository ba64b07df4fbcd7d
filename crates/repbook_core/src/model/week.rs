//! Calendar-week windows for volume aggregation.
//!
//! # Responsibility
//! - Turn an instant plus the caller's time zone into the half-open
//!   `[start, end)` windows for the current and previous week.
//!
//! # Invariants
//! - Weeks start on Monday 00:00 in the caller's time zone.
//! - `last_week.end == this_week.start`, so an instant exactly on the
//!   boundary falls into exactly one window, never both, never neither.

use chrono::{DateTime, Days, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Weekday};

/// First day of the aggregation week.
pub const WEEK_START: Weekday = Weekday::Mon;

/// A half-open week window in epoch seconds: `start <= t < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: i64,
    pub end: i64,
}

impl WeekRange {
    /// Whether an epoch-second instant falls inside this window.
    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time < self.end
    }
}

/// Computes `(this_week, last_week)` for the week containing `now`.
///
/// Both windows are derived from local calendar dates, so they stay aligned
/// with local midnight across daylight-saving transitions and remain
/// contiguous by construction.
pub fn week_windows<Tz: TimeZone>(now: &DateTime<Tz>) -> (WeekRange, WeekRange) {
    let tz = now.timezone();
    let monday = now.date_naive().week(WEEK_START).first_day();

    let this_start = local_midnight(&tz, monday).timestamp();
    let this_end = local_midnight(&tz, monday + Days::new(7)).timestamp();
    let last_start = local_midnight(&tz, monday - Days::new(7)).timestamp();

    (
        WeekRange {
            start: this_start,
            end: this_end,
        },
        WeekRange {
            start: last_start,
            end: this_start,
        },
    )
}

/// Resolves local midnight on `date`, skipping forward hour by hour when a
/// daylight-saving gap swallows it and taking the earlier instant when the
/// wall-clock time is ambiguous.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    for hour in 0..4 {
        let candidate = midnight + Duration::hours(hour);
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(resolved) => return resolved,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => continue,
        }
    }
    // No real time zone skips more than a few hours; fall back to reading
    // the naive timestamp as UTC.
    tz.from_utc_datetime(&midnight)
}
