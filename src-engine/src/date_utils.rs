//! Date utility functions for frost-relative calendar arithmetic
//!
//! All offsets are whole calendar days. Arithmetic is checked: a result
//! outside chrono's representable range comes back as None so callers can
//! treat it as an impossible date instead of panicking.

use chrono::{Days, NaiveDate};

use crate::error::{PlantingError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shift a date by a signed number of days
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// Shift a date back by a signed number of days
pub fn sub_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    days.checked_neg().and_then(|d| add_days(date, d))
}

/// Signed days from `start` to `end` (positive if end is later)
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Parse a "YYYY-MM-DD" string
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
        .map_err(|_| PlantingError::InvalidDate(date_str.to_string()))
}

/// Format a date as "YYYY-MM-DD"
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Describe an offset relative to last frost, e.g. "2 weeks after last frost"
pub fn describe_frost_offset(days: i64) -> String {
    let relation = if days < 0 { "before" } else { "after" };
    let magnitude = days.unsigned_abs();

    if magnitude == 0 {
        return "on the last frost date".to_string();
    }
    if magnitude % 7 == 0 {
        let weeks = magnitude / 7;
        let unit = if weeks == 1 { "week" } else { "weeks" };
        format!("{} {} {} last frost", weeks, unit, relation)
    } else {
        let unit = if magnitude == 1 { "day" } else { "days" };
        format!("{} {} {} last frost", magnitude, unit, relation)
    }
}

/// Get today's date (UTC)
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
