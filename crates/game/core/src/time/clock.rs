//! Calendar clock with cascading rollovers.

use crate::config::ProgressionConfig;

/// Day of the week. [`DayOfWeek::Monday`] starts a new week.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayOfWeek {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days in week order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Zero-based position in the week.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Following day, wrapping Sunday → Monday.
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub const fn is_first_day(self) -> bool {
        matches!(self, DayOfWeek::Monday)
    }
}

/// In-game calendar position.
///
/// `day` runs 1..=30 within a month, `month` 1..=12, `hour` is fractional and
/// always within `[0, 24)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    pub day: u32,
    pub hour: f32,
    pub day_of_week: DayOfWeek,
    pub week: u32,
    pub month: u32,
    pub year: u32,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            day: 1,
            hour: 0.0,
            day_of_week: DayOfWeek::Monday,
            week: 1,
            month: 1,
            year: 1,
        }
    }
}

impl Clock {
    /// Check the range of every field; the message names the offending one.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.hour.is_finite() && (0.0..ProgressionConfig::HOURS_PER_DAY).contains(&self.hour))
        {
            return Err("hour must be within [0, 24)");
        }
        if !(1..=ProgressionConfig::DAYS_PER_MONTH).contains(&self.day) {
            return Err("day must be within 1..=30");
        }
        if !(1..=ProgressionConfig::MONTHS_PER_YEAR).contains(&self.month) {
            return Err("month must be within 1..=12");
        }
        Ok(())
    }

    /// Add `hours` and apply every rollover it causes.
    ///
    /// Whole days are counted up front and cascaded arithmetically, so the
    /// cost does not grow with the size of the jump. Returns the number of
    /// day boundaries crossed, saturating at `u32::MAX`.
    pub(crate) fn advance(&mut self, hours: f32) -> u32 {
        let total = self.hour + hours;
        let mut days = (total / ProgressionConfig::HOURS_PER_DAY).floor();
        let mut hour = total - days * ProgressionConfig::HOURS_PER_DAY;
        if hour >= ProgressionConfig::HOURS_PER_DAY {
            hour -= ProgressionConfig::HOURS_PER_DAY;
            days += 1.0;
        }
        self.hour = hour.max(0.0);

        // Float to int casts saturate.
        let days = days as u64;
        if days > 0 {
            self.roll_days(days);
        }
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    fn roll_days(&mut self, days: u64) {
        let week_len = DayOfWeek::ALL.len() as u64;
        let weekday = self.day_of_week.index() as u64;
        let weeks_started = weekday.saturating_add(days) / week_len;
        self.day_of_week = DayOfWeek::ALL[((weekday + days % week_len) % week_len) as usize];
        self.week = saturate(u64::from(self.week).saturating_add(weeks_started));

        let days_per_month = u64::from(ProgressionConfig::DAYS_PER_MONTH);
        let months_per_year = u64::from(ProgressionConfig::MONTHS_PER_YEAR);
        let day_index = u64::from(self.day.saturating_sub(1)).saturating_add(days);
        self.day = (day_index % days_per_month) as u32 + 1;

        let month_index =
            u64::from(self.month.saturating_sub(1)).saturating_add(day_index / days_per_month);
        self.month = (month_index % months_per_year) as u32 + 1;
        self.year = saturate(u64::from(self.year).saturating_add(month_index / months_per_year));
    }
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
