//! Moon phase approximation for lunar planting annotations
//!
//! Uses the mean synodic month from a reference new moon. Good to within
//! about a day of the true phase, which is plenty for a gardening hint.
//! Phase buckets follow the 0/90/180/270 degree convention (new, first
//! quarter, full, last quarter) split into eighths.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::LunarAffinity;

/// Mean length of a lunation in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588853;

/// Reference new moon: 2000-01-06 18:14 UTC
const REFERENCE_NEW_MOON: (i32, u32, u32) = (2000, 1, 6);
/// Offset from noon on the reference day to 18:14, in days
const REFERENCE_NOON_OFFSET: f64 = (6.0 * 60.0 + 14.0) / 1440.0;

/// Human-readable phase names indexed by phase number 0..7
pub const MOON_PHASE_NAMES: &[&str] = &[
    "New Moon",
    "Waxing Crescent",
    "First Quarter",
    "Waxing Gibbous",
    "Full Moon",
    "Waning Gibbous",
    "Last Quarter",
    "Waning Crescent",
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn display_name(&self) -> &'static str {
        MOON_PHASE_NAMES[self.index()]
    }
}

/// Days since the most recent new moon, evaluated at noon on `date`.
/// Always in `[0, SYNODIC_MONTH_DAYS)`.
pub fn moon_age_days(date: NaiveDate) -> f64 {
    let (y, m, d) = REFERENCE_NEW_MOON;
    let reference = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    let elapsed = (date - reference).num_days() as f64 - REFERENCE_NOON_OFFSET;
    elapsed.rem_euclid(SYNODIC_MONTH_DAYS)
}

/// Eighth-of-a-lunation bucket, centred on the principal phases
pub fn moon_phase(date: NaiveDate) -> MoonPhase {
    let fraction = moon_age_days(date) / SYNODIC_MONTH_DAYS;
    MoonPhase::from_index((fraction * 8.0 + 0.5).floor() as usize)
}

/// New moon to full moon
pub fn is_waxing(date: NaiveDate) -> bool {
    moon_age_days(date) < SYNODIC_MONTH_DAYS / 2.0
}

impl LunarAffinity {
    /// Whether `date` falls in the half of the lunation this affinity favours
    pub fn is_aligned(&self, date: NaiveDate) -> bool {
        match self {
            LunarAffinity::Waxing => is_waxing(date),
            LunarAffinity::Waning => !is_waxing(date),
        }
    }
}
