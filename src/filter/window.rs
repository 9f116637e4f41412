//! Civil-day time windows.
//!
//! Bounds are reconstructed from calendar dates in a reference zone and then
//! compared as absolute instants, so a 23- or 25-hour day around a DST change
//! gets exactly the instants that belong to it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::WindowRule;

pub const DEFAULT_REFERENCE_ZONE: Tz = chrono_tz::Europe::London;

const LAST_SECOND_OF_DAY: i64 = 86_399;
// Longest DST gap in the tz database is well under this.
const GAP_SEARCH_MINUTES: i64 = 180;

/// An inclusive interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The calendar day before `now`'s civil date in `zone`, from 00:00:00
    /// to 23:59:59 local time.
    pub fn previous_day(now: DateTime<Utc>, zone: Tz) -> Self {
        let today = now.with_timezone(&zone).date_naive();
        let yesterday = today.pred_opt().unwrap_or(today);
        Self::civil_day(yesterday, zone)
    }

    pub fn civil_day(date: NaiveDate, zone: Tz) -> Self {
        let midnight = date.and_time(NaiveTime::MIN);
        let last_second = midnight + TimeDelta::seconds(LAST_SECOND_OF_DAY);

        Self {
            start: resolve_earliest(zone, midnight),
            end: resolve_latest(zone, last_second),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl WindowRule {
    pub fn bounds(&self, now: DateTime<Utc>, zone: Tz) -> TimeWindow {
        match self {
            WindowRule::PreviousDay => TimeWindow::previous_day(now, zone),
        }
    }
}

/// Earliest instant for a local time; a time skipped by a DST gap resolves
/// to the first valid instant after it.
fn resolve_earliest(zone: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=GAP_SEARCH_MINUTES)
        .find_map(|m| {
            zone.from_local_datetime(&(local + TimeDelta::minutes(m)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}

/// Latest instant for a local time; a skipped time resolves to the last
/// valid instant before it.
fn resolve_latest(zone: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=GAP_SEARCH_MINUTES)
        .find_map(|m| {
            zone.from_local_datetime(&(local - TimeDelta::minutes(m)))
                .latest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}
