// Dashboard panel aggregation
// Turns a profile's raw playtime counters into display-ready stats

use chrono::Utc;

use crate::models::profile::PlayerProfile;
use crate::utils::time_calc::{
    self, InvalidTimeRangeError, TimeBreakdown, MINS_PER_HOUR,
};

/// Panel stats over a player profile, pinned to one observation time so
/// every panel in a render agrees on what "now" is
pub struct PanelData<'a> {
    profile: &'a PlayerProfile,
    now_epoch_secs: i64,
}

impl<'a> PanelData<'a> {
    pub fn new(profile: &'a PlayerProfile) -> Self {
        Self::at(profile, Utc::now().timestamp())
    }

    /// Pin the observation time explicitly; tests run against a fixed clock
    pub fn at(profile: &'a PlayerProfile, now_epoch_secs: i64) -> Self {
        Self {
            profile,
            now_epoch_secs,
        }
    }

    ///////// Lifetime panels /////////

    /// Total hours played, rounded to one decimal place; None when the
    /// player has no recorded playtime
    pub fn time_played_hours_total(&self) -> Option<f64> {
        time_calc::hours_from_minutes(self.profile.total_playtime_mins())
    }

    /// Total time played as an ordered unit breakdown
    pub fn time_played_total(&self) -> TimeBreakdown {
        time_calc::mins_to_breakdown(self.profile.total_playtime_mins())
    }

    /// Average minutes played per day since joining; None when the join
    /// date is unknown
    pub fn avg_daily_mins_total(&self) -> Result<Option<f64>, InvalidTimeRangeError> {
        let Some(time_joined) = self.profile.time_joined else {
            return Ok(None);
        };

        let avg = time_calc::avg_mins_per_day(
            self.profile.total_playtime_mins(),
            time_joined,
            self.now_epoch_secs,
        )?;
        Ok(Some(avg))
    }

    /// Average hours played per day since joining, rounded to two decimals
    pub fn avg_daily_hours_total(&self) -> Result<Option<f64>, InvalidTimeRangeError> {
        Ok(self
            .avg_daily_mins_total()?
            .map(|mins| (mins / MINS_PER_HOUR as f64 * 100.0).round() / 100.0))
    }

    /// Breakdown of the daily average since joining, rounded to the
    /// nearest whole minute before decomposing
    pub fn avg_daily_time_total(&self) -> Result<Option<TimeBreakdown>, InvalidTimeRangeError> {
        Ok(self
            .avg_daily_mins_total()?
            .map(|mins| time_calc::mins_to_breakdown(mins.round() as u64)))
    }

    ///////// Trailing two-week panels /////////

    /// Time played over the past two weeks as a unit breakdown
    pub fn time_played_two_weeks(&self) -> TimeBreakdown {
        time_calc::mins_to_breakdown(self.profile.two_week_playtime_mins())
    }

    /// Average minutes played per day over the past two weeks
    pub fn avg_daily_mins_two_weeks(&self) -> Result<f64, InvalidTimeRangeError> {
        time_calc::avg_mins_per_day(
            self.profile.two_week_playtime_mins(),
            time_calc::two_weeks_ago(self.now_epoch_secs),
            self.now_epoch_secs,
        )
    }

    /// Breakdown of the two-week daily average
    pub fn avg_daily_time_two_weeks(&self) -> Result<TimeBreakdown, InvalidTimeRangeError> {
        let avg = self.avg_daily_mins_two_weeks()?;
        Ok(time_calc::mins_to_breakdown(avg.round() as u64))
    }
}
