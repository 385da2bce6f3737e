//! Recurrence rule value type.
//!
//! A rule is a flat bag of optional qualifier fields; only a subset is
//! populated for any given frequency. Field presence is tracked with
//! `Option` rather than a presence bitmask, which keeps the mutual
//! exclusion rules (day-in-month vs. week-in-month, day-in-year vs.
//! month-in-year) visible at the call sites that enforce them.

use serde::{Deserialize, Serialize};

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Weekday flags for `day_in_week`.
pub mod weekday {
    pub const SATURDAY: u32 = 0x400;
    pub const FRIDAY: u32 = 0x800;
    pub const THURSDAY: u32 = 0x1000;
    pub const WEDNESDAY: u32 = 0x2000;
    pub const TUESDAY: u32 = 0x4000;
    pub const MONDAY: u32 = 0x8000;
    pub const SUNDAY: u32 = 0x10000;
}

/// Ordinal-week flags for `week_in_month` (1st..5th, last..5th-last).
pub mod week {
    pub const FIRST: u32 = 0x1;
    pub const SECOND: u32 = 0x2;
    pub const THIRD: u32 = 0x4;
    pub const FOURTH: u32 = 0x8;
    pub const FIFTH: u32 = 0x10;
    pub const LAST: u32 = 0x20;
    pub const SECOND_LAST: u32 = 0x40;
    pub const THIRD_LAST: u32 = 0x80;
    pub const FOURTH_LAST: u32 = 0x100;
    pub const FIFTH_LAST: u32 = 0x200;
}

/// Month flags for `month_in_year`.
pub mod month {
    pub const JANUARY: u32 = 0x20000;
    pub const FEBRUARY: u32 = 0x40000;
    pub const MARCH: u32 = 0x80000;
    pub const APRIL: u32 = 0x100000;
    pub const MAY: u32 = 0x200000;
    pub const JUNE: u32 = 0x400000;
    pub const JULY: u32 = 0x800000;
    pub const AUGUST: u32 = 0x1000000;
    pub const SEPTEMBER: u32 = 0x2000000;
    pub const OCTOBER: u32 = 0x4000000;
    pub const NOVEMBER: u32 = 0x8000000;
    pub const DECEMBER: u32 = 0x10000000;
}

/// A recurrence rule attached to an event record.
///
/// Timestamps are milliseconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatRule {
    pub frequency: Option<Frequency>,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub end: Option<i64>,
    pub day_in_week: Option<u32>,
    pub week_in_month: Option<u32>,
    pub day_in_month: Option<u32>,
    pub day_in_year: Option<u32>,
    pub month_in_year: Option<u32>,
    pub except_dates: Vec<i64>,
}

impl RepeatRule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval with the default of 1 applied.
    #[must_use]
    pub fn interval_or_default(&self) -> u32 {
        self.interval.unwrap_or(1)
    }

    pub fn add_except_date(&mut self, date: i64) {
        self.except_dates.push(date);
    }
}
