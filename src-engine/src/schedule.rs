//! Planting schedule calculation engine
//!
//! Builds the dated events (start indoors, transplant, direct sow, harvest)
//! for a primary planting and its succession repeats, all anchored on the
//! region's last spring frost and bounded by the first fall frost.
//!
//! A planting cycle is all-or-nothing: if its harvest would land on or after
//! first frost, none of its events are emitted. Output is in computation
//! order; callers sort.

use chrono::NaiveDate;

use crate::date_utils::{add_days, days_between, describe_frost_offset, sub_days};
use crate::lunar::moon_phase;
use crate::types::{
    Crop, FrostDates, LunarAffinity, PlantingAction, PlantingDate, SelectedCrop, Variety,
};

const DAYS_PER_WEEK: i64 = 7;

/// Dates of one planting cycle that survived the frost-window check
#[derive(Debug, Clone, PartialEq)]
struct CycleDates {
    start_indoors: Option<NaiveDate>,
    transplant: Option<NaiveDate>,
    direct_sow: Option<NaiveDate>,
    harvest: NaiveDate,
}

/// Compute one planting cycle with every anchor shifted by `shift_days`.
/// Returns None when the cycle cannot finish before first frost.
fn plan_cycle(
    crop: &Crop,
    maturity_days: u32,
    frost: &FrostDates,
    shift_days: i64,
) -> Option<CycleDates> {
    let last_frost = add_days(frost.last_spring_frost, shift_days)?;

    // Some(None) = step not defined for this crop; None = date out of range
    let offset_date = |offset: Option<i64>| -> Option<Option<NaiveDate>> {
        match offset {
            Some(days) => add_days(last_frost, days).map(Some),
            None => Some(None),
        }
    };

    let start_indoors = match crop.start_indoors {
        Some(days) => Some(sub_days(last_frost, days)?),
        None => None,
    };
    let transplant = offset_date(crop.transplant)?;
    let direct_sow = offset_date(crop.direct_sow)?;

    let planting = direct_sow.or(transplant)?;
    let harvest = add_days(planting, i64::from(maturity_days))?;

    if harvest >= frost.first_fall_frost {
        tracing::debug!(
            crop_id = %crop.id,
            shift_days,
            %harvest,
            first_fall_frost = %frost.first_fall_frost,
            "planting cycle omitted: harvest not before first frost"
        );
        return None;
    }

    let before_frost = |date: Option<NaiveDate>| date.filter(|d| *d < frost.first_fall_frost);

    Some(CycleDates {
        start_indoors: before_frost(start_indoors),
        transplant: before_frost(transplant),
        direct_sow: before_frost(direct_sow),
        harvest,
    })
}

/// Effective succession interval in weeks, or None when succession is off
fn succession_interval_weeks(crop: &Crop, selected: &SelectedCrop) -> Option<u32> {
    if !(selected.succession_enabled && crop.succession_enabled) {
        return None;
    }
    Some(selected.succession_interval.unwrap_or(crop.succession_interval))
}

/// Number of plantings (primary included) that fit before first frost,
/// capped by the crop's `succession_max`.
///
/// Always at least 1. A zero interval, disabled succession or degenerate
/// frost calendar yields exactly 1.
pub fn succession_plantings_possible(
    crop: &Crop,
    variety: &Variety,
    selected: &SelectedCrop,
    frost: &FrostDates,
) -> u32 {
    let interval_weeks = match succession_interval_weeks(crop, selected) {
        Some(weeks) if weeks > 0 => weeks,
        _ => return 1,
    };
    if frost.is_degenerate() {
        return 1;
    }

    let interval_days = i64::from(interval_weeks) * DAYS_PER_WEEK;
    let maturity_days = i64::from(crop.maturity_days(variety));

    let anchor = crop
        .planting_offset()
        .and_then(|offset| add_days(frost.last_spring_frost, offset));
    let last_plant = sub_days(frost.first_fall_frost, maturity_days);

    let (anchor, last_plant) = match (anchor, last_plant) {
        (Some(a), Some(l)) => (a, l),
        _ => return 1,
    };

    let days_available = days_between(anchor, last_plant);
    let max_intervals = if days_available < 0 {
        0
    } else {
        days_available / interval_days
    };

    let possible = max_intervals
        .saturating_add(1)
        .min(i64::from(crop.succession_max));
    u32::try_from(possible).unwrap_or(1).max(1)
}

/// Calculate every planting event for a crop selection
///
/// # Arguments
/// * `crop` / `variety` - catalog definitions
/// * `selected` - the user's succession preferences
/// * `frost` - the region's frost calendar
/// * `lunar_sync` - annotate planting events with moon phase
///
/// # Returns
/// Events for the primary cycle followed by each succession cycle, each
/// cycle ordered start indoors, transplant, direct sow, harvest. Empty when
/// nothing fits the frost-free window.
pub fn calculate_crop_schedule(
    crop: &Crop,
    variety: &Variety,
    selected: &SelectedCrop,
    frost: &FrostDates,
    lunar_sync: bool,
) -> Vec<PlantingDate> {
    if frost.is_degenerate() {
        tracing::warn!(
            zip_code = %frost.zip_code,
            last_spring_frost = %frost.last_spring_frost,
            first_fall_frost = %frost.first_fall_frost,
            "first fall frost is not after last spring frost; nothing can be scheduled"
        );
        return Vec::new();
    }

    let maturity_days = crop.maturity_days(variety);
    let builder = EventBuilder {
        crop,
        variety,
        maturity_days,
        lunar_sync,
    };
    let mut events = Vec::new();

    if let Some(cycle) = plan_cycle(crop, maturity_days, frost, 0) {
        builder.push_cycle(&mut events, &cycle, None);
    }

    let plantings = succession_plantings_possible(crop, variety, selected, frost);
    let interval_days = succession_interval_weeks(crop, selected)
        .map(|weeks| i64::from(weeks) * DAYS_PER_WEEK)
        .unwrap_or(0);

    for i in 1..plantings {
        let shift_days = i64::from(i) * interval_days;
        if let Some(cycle) = plan_cycle(crop, maturity_days, frost, shift_days) {
            builder.push_cycle(&mut events, &cycle, Some((i + 1, shift_days)));
        }
    }

    events
}

/// Turns cycle dates into annotated events for one crop/variety
struct EventBuilder<'a> {
    crop: &'a Crop,
    variety: &'a Variety,
    maturity_days: u32,
    lunar_sync: bool,
}

impl EventBuilder<'_> {
    /// `succession` is (succession number, days after the primary cycle)
    fn push_cycle(
        &self,
        events: &mut Vec<PlantingDate>,
        cycle: &CycleDates,
        succession: Option<(u32, i64)>,
    ) {
        let steps = [
            (PlantingAction::StartIndoors, cycle.start_indoors),
            (PlantingAction::Transplant, cycle.transplant),
            (PlantingAction::DirectSow, cycle.direct_sow),
            (PlantingAction::Harvest, Some(cycle.harvest)),
        ];

        for (action, date) in steps {
            if let Some(date) = date {
                events.push(self.event(action, date, succession));
            }
        }
    }

    fn event(
        &self,
        action: PlantingAction,
        date: NaiveDate,
        succession: Option<(u32, i64)>,
    ) -> PlantingDate {
        let mut notes = Vec::new();

        match succession {
            Some((number, shift_days)) => {
                notes.push(format!(
                    "Succession planting #{} ({} days after the first planting)",
                    number, shift_days
                ));
            }
            None => {
                if let Some(note) = self.timing_note(action) {
                    notes.push(note);
                }
            }
        }
        if action == PlantingAction::Harvest {
            notes.push(format!(
                "Ready about {} days after planting",
                self.maturity_days
            ));
        }

        let mut event = PlantingDate {
            crop_id: self.crop.id.clone(),
            crop_name: self.crop.name.clone(),
            variety_name: self.variety.name.clone(),
            action,
            date,
            succession_number: succession.map(|(number, _)| number),
            notes,
            lunar_phase: None,
            lunar_aligned: None,
        };

        if self.lunar_sync && action.is_planting() {
            self.annotate_lunar(&mut event);
        }
        event
    }

    fn timing_note(&self, action: PlantingAction) -> Option<String> {
        match action {
            PlantingAction::StartIndoors => self
                .crop
                .start_indoors
                .map(|days| format!("Start seeds indoors {}", describe_frost_offset(-days))),
            PlantingAction::Transplant => self
                .crop
                .transplant
                .map(|days| format!("Transplant outdoors {}", describe_frost_offset(days))),
            PlantingAction::DirectSow => self
                .crop
                .direct_sow
                .map(|days| format!("Sow directly outdoors {}", describe_frost_offset(days))),
            PlantingAction::Harvest => None,
        }
    }

    fn annotate_lunar(&self, event: &mut PlantingDate) {
        let phase = moon_phase(event.date);
        event.lunar_phase = Some(phase);

        if let Some(affinity) = self.crop.lunar_affinity {
            let aligned = affinity.is_aligned(event.date);
            event.lunar_aligned = Some(aligned);
            if !aligned {
                let preferred = match affinity {
                    LunarAffinity::Waxing => "waxing",
                    LunarAffinity::Waning => "waning",
                };
                event.notes.push(format!(
                    "{} falls outside the preferred {} moon",
                    phase.display_name(),
                    preferred
                ));
            }
        }
    }
}
