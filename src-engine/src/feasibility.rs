//! Late-planting feasibility checker
//!
//! Answers "can this crop still be planted and mature before first frost?"
//! for a given day, independently of full schedule generation.

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::date_utils::{days_between, format_date, sub_days};
use crate::types::{Crop, FeasibilityResult, FrostDates, Variety};

/// Check with the default thresholds (14-day urgency window, 14-day transplant lead)
pub fn can_still_plant(
    crop: &Crop,
    variety: &Variety,
    frost: &FrostDates,
    as_of: NaiveDate,
) -> FeasibilityResult {
    can_still_plant_with(crop, variety, frost, as_of, &EngineConfig::default())
}

/// Check with explicit thresholds
pub fn can_still_plant_with(
    crop: &Crop,
    variety: &Variety,
    frost: &FrostDates,
    as_of: NaiveDate,
    config: &EngineConfig,
) -> FeasibilityResult {
    let maturity_days = i64::from(crop.maturity_days(variety));

    let lead_days = if crop.direct_sow.is_some() {
        maturity_days
    } else if crop.transplant.is_some() {
        maturity_days + config.transplant_lead_days
    } else {
        return not_plantable(
            format!("{} has no planting method defined", crop.name),
            None,
            None,
        );
    };

    let last_plant_date = match sub_days(frost.first_fall_frost, lead_days) {
        Some(date) => date,
        None => {
            return not_plantable(
                format!("{} cannot be scheduled against this frost calendar", crop.name),
                None,
                None,
            )
        }
    };

    let days_remaining = days_between(as_of, last_plant_date);

    if days_remaining < 0 {
        return not_plantable(
            format!(
                "Too late to plant {} this season. The last planting date was {}.",
                crop.name,
                format_date(last_plant_date)
            ),
            Some(last_plant_date),
            Some(days_remaining),
        );
    }

    let urgent = days_remaining < config.urgent_window_days;
    let message = if urgent {
        format!(
            "Last chance! Plant {} within {} {} (by {}).",
            crop.name,
            days_remaining,
            if days_remaining == 1 { "day" } else { "days" },
            format_date(last_plant_date)
        )
    } else {
        format!(
            "You have {} days left to plant {} (until {}).",
            days_remaining,
            crop.name,
            format_date(last_plant_date)
        )
    };

    FeasibilityResult {
        can_plant: true,
        last_chance_date: Some(last_plant_date),
        days_remaining: Some(days_remaining),
        urgent,
        message,
    }
}

fn not_plantable(
    message: String,
    last_chance_date: Option<NaiveDate>,
    days_remaining: Option<i64>,
) -> FeasibilityResult {
    FeasibilityResult {
        can_plant: false,
        last_chance_date,
        days_remaining,
        urgent: false,
        message,
    }
}
