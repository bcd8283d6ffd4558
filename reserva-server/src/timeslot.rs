//! Opening hours and the 15-minute slot grid
//!
//! The restaurant day runs 10:00 to 23:30 local time; the last bookable
//! slot starts at 23:30 and runs past midnight. All instants are epoch
//! milliseconds (UTC); local time is a fixed UTC offset configured at
//! startup, so conversions stay pure integer math.

use chrono::{NaiveDate, NaiveTime};

/// Slot grid granularity
pub const SLOT_MS: i64 = 15 * 60 * 1000;
/// Every reservation occupies its tables for 90 minutes
pub const RESERVATION_MS: i64 = 90 * 60 * 1000;
/// Grace period after slot start before a pending reservation can be
/// marked no-show
pub const NO_SHOW_GRACE_MS: i64 = 15 * 60 * 1000;

/// First bookable minute of the local day (10:00)
pub const OPEN_MINUTE: i64 = 10 * 60;
/// Last bookable slot start of the local day (23:30)
pub const LAST_SLOT_MINUTE: i64 = 23 * 60 + 30;

const MINUTE_MS: i64 = 60 * 1000;
const DAY_MS: i64 = 24 * 60 * MINUTE_MS;

/// Fixed-offset local clock for a deployment region
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset_ms: i64,
}

impl LocalClock {
    pub fn new(offset_minutes: i32) -> Self {
        Self {
            offset_ms: i64::from(offset_minutes) * MINUTE_MS,
        }
    }

    /// Offset applied to UTC instants, in milliseconds
    pub fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Minute of the local day (0..1440) for a UTC instant
    pub fn minute_of_day(&self, instant_ms: i64) -> i64 {
        (instant_ms + self.offset_ms).rem_euclid(DAY_MS) / MINUTE_MS
    }

    /// Whether an instant is a valid slot start: on the 15-minute grid
    /// and between 10:00 and 23:30 local time inclusive
    pub fn within_opening_hours(&self, instant_ms: i64) -> bool {
        if (instant_ms + self.offset_ms).rem_euclid(SLOT_MS) != 0 {
            return false;
        }
        let minute = self.minute_of_day(instant_ms);
        (OPEN_MINUTE..=LAST_SLOT_MINUTE).contains(&minute)
    }

    /// All 55 slot starts of a local calendar day, as UTC instants
    pub fn day_slots(&self, date: NaiveDate) -> Vec<i64> {
        let local_midnight = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() - self.offset_ms;
        (OPEN_MINUTE..=LAST_SLOT_MINUTE)
            .step_by(15)
            .map(|minute| local_midnight + minute * MINUTE_MS)
            .collect()
    }
}
