// Playtime conversion engine
// Decomposes raw minute counts into display units and daily averages

use chrono::Duration;
use thiserror::Error;

pub const SECS_PER_MINUTE: i64 = 60;
pub const MINS_PER_HOUR: u64 = 60;
pub const HOURS_PER_DAY: u64 = 24;
pub const DAYS_PER_WEEK: u64 = 7;
pub const WEEKS_PER_YEAR: u64 = 52;

pub const MINS_PER_DAY: u64 = MINS_PER_HOUR * HOURS_PER_DAY;
pub const MINS_PER_WEEK: u64 = MINS_PER_DAY * DAYS_PER_WEEK;
pub const MINS_PER_YEAR: u64 = MINS_PER_WEEK * WEEKS_PER_YEAR;

/// Returned when an average is requested over a zero or negative time span
/// (start epoch at or after the current time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("start time {start_epoch_secs} is not in the past of {now_epoch_secs}")]
pub struct InvalidTimeRangeError {
    pub start_epoch_secs: i64,
    pub now_epoch_secs: i64,
}

/// Display units for a playtime breakdown, largest first.
/// Labels take singular form so pluralization can happen at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Year,
    Week,
    Day,
    Hour,
    Minute,
}

impl TimeUnit {
    /// All units, largest to smallest
    pub const DESCENDING: [TimeUnit; 5] = [
        TimeUnit::Year,
        TimeUnit::Week,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
    ];

    pub fn mins(self) -> u64 {
        match self {
            TimeUnit::Year => MINS_PER_YEAR,
            TimeUnit::Week => MINS_PER_WEEK,
            TimeUnit::Day => MINS_PER_DAY,
            TimeUnit::Hour => MINS_PER_HOUR,
            TimeUnit::Minute => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Year => "year",
            TimeUnit::Week => "week",
            TimeUnit::Day => "day",
            TimeUnit::Hour => "hour",
            TimeUnit::Minute => "minute",
        }
    }
}

/// Ordered decomposition of a minute count, largest unit first.
/// Units with a zero count are omitted, except the trailing minute entry
/// which is always present, so a breakdown is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBreakdown {
    entries: Vec<(TimeUnit, u64)>,
}

impl TimeBreakdown {
    /// Entries in display order
    pub fn entries(&self) -> &[(TimeUnit, u64)] {
        &self.entries
    }

    /// Count for a unit, if that unit is part of the breakdown
    pub fn get(&self, unit: TimeUnit) -> Option<u64> {
        self.entries
            .iter()
            .find(|(u, _)| *u == unit)
            .map(|(_, count)| *count)
    }

    /// Coarsest unit present
    pub fn largest_unit(&self) -> TimeUnit {
        self.entries[0].0
    }

    /// Reconstruct the minute count this breakdown was built from
    pub fn total_mins(&self) -> u64 {
        self.entries
            .iter()
            .map(|(unit, count)| count * unit.mins())
            .sum()
    }
}

/// Decompose a minute count into years, weeks, days, hours, and minutes,
/// greedily from the largest unit down
pub fn mins_to_breakdown(total_mins_played: u64) -> TimeBreakdown {
    let mut entries = Vec::new();
    let mut mins_remainder = total_mins_played;

    for unit in [TimeUnit::Year, TimeUnit::Week, TimeUnit::Day, TimeUnit::Hour] {
        let count = mins_remainder / unit.mins();
        if count > 0 {
            entries.push((unit, count));
            mins_remainder %= unit.mins();
        }
    }

    // Minutes (remainder) - always emitted, even at zero
    entries.push((TimeUnit::Minute, mins_remainder));

    TimeBreakdown { entries }
}

/// Number of hours from minutes, rounded to one decimal place.
/// Zero minutes means no data, not 0.0 hours.
pub fn hours_from_minutes(mins_played: u64) -> Option<f64> {
    if mins_played == 0 {
        return None;
    }

    Some((mins_played as f64 / MINS_PER_HOUR as f64 * 10.0).round() / 10.0)
}

/// Average number of minutes played per day since a start time.
/// Returns 0.0 without dividing when nothing was played; the time span
/// must be strictly positive otherwise.
pub fn avg_mins_per_day(
    mins_played: u64,
    start_epoch_secs: i64,
    now_epoch_secs: i64,
) -> Result<f64, InvalidTimeRangeError> {
    if mins_played == 0 {
        return Ok(0.0);
    }

    let elapsed_secs = now_epoch_secs - start_epoch_secs;
    if elapsed_secs <= 0 {
        return Err(InvalidTimeRangeError {
            start_epoch_secs,
            now_epoch_secs,
        });
    }

    let days_since_start = elapsed_secs as f64 / SECS_PER_MINUTE as f64 / MINS_PER_DAY as f64;
    Ok(mins_played as f64 / days_since_start)
}

/// Epoch seconds for the start of the trailing two week window,
/// derived from the supplied current time on every call
pub fn two_weeks_ago(now_epoch_secs: i64) -> i64 {
    now_epoch_secs - Duration::weeks(2).num_seconds()
}
