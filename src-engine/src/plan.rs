//! Garden Plan State Container
//!
//! Holds the frost calendar and the user's crop selections, and merges the
//! per-crop schedules into one garden calendar with an omission list.

use std::collections::HashMap;

use crate::catalog::CropCatalog;
use crate::error::{PlantingError, Result};
use crate::schedule::calculate_crop_schedule;
use crate::types::{
    FrostDates, GardenSchedule, OmittedCrop, PlantingDate, ScheduleStats, SelectedCrop,
};

/// Garden plan state
///
/// One selection per crop id; selection order is preserved for output.
#[derive(Debug, Clone, Default)]
pub struct GardenPlan {
    /// Selections indexed by crop id
    selections: HashMap<String, SelectedCrop>,

    /// Crop ids in the order they were selected
    selection_order: Vec<String>,

    frost_dates: Option<FrostDates>,

    pub lunar_sync: bool,
}

impl GardenPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frost_dates(&mut self, frost_dates: FrostDates) {
        self.frost_dates = Some(frost_dates);
    }

    pub fn frost_dates(&self) -> Option<&FrostDates> {
        self.frost_dates.as_ref()
    }

    /// Replace all selections
    pub fn load_selections(&mut self, selections: Vec<SelectedCrop>) {
        self.selections.clear();
        self.selection_order.clear();
        for selection in selections {
            self.select_crop(selection);
        }
    }

    /// Add a selection, replacing any existing one for the same crop
    pub fn select_crop(&mut self, selection: SelectedCrop) {
        let crop_id = selection.crop_id.clone();
        if !self.selection_order.contains(&crop_id) {
            self.selection_order.push(crop_id.clone());
        }
        self.selections.insert(crop_id, selection);
    }

    /// Apply a partial update to an existing selection
    ///
    /// Recognised keys: varietyId, successionEnabled, successionInterval
    /// (null clears the override). Unknown keys are ignored.
    pub fn update_selection(&mut self, crop_id: &str, updates: serde_json::Value) -> Result<()> {
        let selection = self
            .selections
            .get_mut(crop_id)
            .ok_or_else(|| PlantingError::CropNotFound(crop_id.to_string()))?;

        if let Some(obj) = updates.as_object() {
            for (key, value) in obj {
                match key.as_str() {
                    "varietyId" => {
                        if let Some(v) = value.as_str() {
                            selection.variety_id = v.to_string();
                        }
                    }
                    "successionEnabled" => {
                        if let Some(v) = value.as_bool() {
                            selection.succession_enabled = v;
                        }
                    }
                    "successionInterval" => {
                        if value.is_null() {
                            selection.succession_interval = None;
                        } else if let Some(v) = value.as_u64() {
                            if let Ok(weeks) = u32::try_from(v) {
                                selection.succession_interval = Some(weeks);
                            } else {
                                tracing::warn!(crop_id, value = v, "successionInterval overflow");
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Replace all selections once every one resolves in `catalog`.
    /// On error the current selections are left as they were.
    pub fn sync_selections(
        &mut self,
        selections: Vec<SelectedCrop>,
        catalog: &CropCatalog,
    ) -> Result<()> {
        for selection in &selections {
            catalog.resolve(selection)?;
        }
        self.load_selections(selections);
        Ok(())
    }

    /// Like `update_selection`, but rolls back if the updated selection no
    /// longer resolves in `catalog`
    pub fn update_selection_checked(
        &mut self,
        crop_id: &str,
        updates: serde_json::Value,
        catalog: &CropCatalog,
    ) -> Result<()> {
        let previous = self
            .selections
            .get(crop_id)
            .cloned()
            .ok_or_else(|| PlantingError::CropNotFound(crop_id.to_string()))?;
        self.update_selection(crop_id, updates)?;

        let check = match self.selections.get(crop_id) {
            Some(updated) => catalog.resolve(updated).map(|_| ()),
            None => Ok(()),
        };
        if let Err(err) = check {
            self.selections.insert(crop_id.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }

    pub fn remove_crop(&mut self, crop_id: &str) -> Result<()> {
        if self.selections.remove(crop_id).is_none() {
            return Err(PlantingError::CropNotFound(crop_id.to_string()));
        }
        self.selection_order.retain(|id| id != crop_id);
        Ok(())
    }

    /// Selections in selection order
    pub fn selections_ordered(&self) -> Vec<SelectedCrop> {
        self.selection_order
            .iter()
            .filter_map(|id| self.selections.get(id).cloned())
            .collect()
    }

    pub fn selection_count(&self) -> usize {
        self.selections.len()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
        self.selection_order.clear();
        self.frost_dates = None;
    }

    /// Calculate the merged schedule for every selection
    pub fn calculate(&self, catalog: &CropCatalog) -> Result<GardenSchedule> {
        let timer = Timer::start();
        let frost = self.frost_dates.as_ref().ok_or(PlantingError::MissingFrostDates)?;

        let mut events: Vec<PlantingDate> = Vec::new();
        let mut omitted = Vec::new();
        let selections = self.selections_ordered();

        for selection in &selections {
            let (crop, variety) = catalog.resolve(selection)?;
            let crop_events =
                calculate_crop_schedule(crop, variety, selection, frost, self.lunar_sync);

            if crop_events.is_empty() {
                let reason = if frost.is_degenerate() {
                    "First fall frost is not after last spring frost".to_string()
                } else {
                    format!(
                        "{} ({} days) cannot mature before first frost on {}",
                        variety.name,
                        crop.maturity_days(variety),
                        frost.first_fall_frost
                    )
                };
                omitted.push(OmittedCrop {
                    crop_id: crop.id.clone(),
                    crop_name: crop.name.clone(),
                    reason,
                });
            }
            events.extend(crop_events);
        }

        let stats = ScheduleStats {
            calc_time: timer.elapsed_ms(),
            crop_count: selections.len(),
            event_count: events.len(),
            omitted_count: omitted.len(),
            first_event: events.iter().map(|e| e.date).min(),
            last_event: events.iter().map(|e| e.date).max(),
        };

        tracing::debug!(
            crops = stats.crop_count,
            events = stats.event_count,
            omitted = stats.omitted_count,
            "garden schedule calculated"
        );

        Ok(GardenSchedule { events, omitted, stats })
    }
}

/// Wall-clock timer for `ScheduleStats::calc_time`.
/// `std::time::Instant` is unavailable on wasm32; bindings there time the call themselves.
struct Timer {
    #[cfg(not(target_arch = "wasm32"))]
    started: std::time::Instant,
}

impl Timer {
    fn start() -> Self {
        Timer {
            #[cfg(not(target_arch = "wasm32"))]
            started: std::time::Instant::now(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_ms(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn plan_with(selections: &[(&str, &str)]) -> GardenPlan {
        let mut plan = GardenPlan::new();
        plan.load_selections(
            selections
                .iter()
                .map(|(crop, variety)| SelectedCrop::new(*crop, *variety))
                .collect(),
        );
        plan
    }

    #[test]
    fn selection_order_survives_replace_and_remove() {
        let mut plan =
            plan_with(&[("tomato", "roma"), ("lettuce", "little-gem"), ("basil", "thai")]);
        plan.select_crop(SelectedCrop::new("tomato", "sungold"));
        plan.remove_crop("lettuce").unwrap();

        let ordered = plan.selections_ordered();
        let ids: Vec<&str> = ordered.iter().map(|s| s.crop_id.as_str()).collect();
        assert_eq!(ids, ["tomato", "basil"]);
        assert_eq!(ordered[0].variety_id, "sungold");
        assert!(matches!(plan.remove_crop("lettuce"), Err(PlantingError::CropNotFound(_))));
    }

    #[test]
    fn partial_updates() {
        let mut plan = plan_with(&[("lettuce", "little-gem")]);
        plan.update_selection(
            "lettuce",
            json!({
                "varietyId": "buttercrunch",
                "successionEnabled": true,
                "successionInterval": 3,
                "color": "red"
            }),
        )
        .unwrap();
        let s = &plan.selections_ordered()[0];
        assert_eq!(s.variety_id, "buttercrunch");
        assert!(s.succession_enabled);
        assert_eq!(s.succession_interval, Some(3));

        plan.update_selection("lettuce", json!({"successionInterval": null})).unwrap();
        assert_eq!(plan.selections_ordered()[0].succession_interval, None);

        assert!(plan.update_selection("okra", json!({})).is_err());
    }

    #[test]
    fn sync_rejects_unknown_ids_and_keeps_selections() {
        let catalog = CropCatalog::builtin().unwrap();
        let mut plan = plan_with(&[("tomato", "roma")]);

        let stale = vec![
            SelectedCrop::new("lettuce", "little-gem"),
            SelectedCrop::new("okra", "x"),
        ];
        assert!(matches!(
            plan.sync_selections(stale, &catalog),
            Err(PlantingError::CropNotFound(id)) if id == "okra"
        ));
        let bad_variety = vec![SelectedCrop::new("lettuce", "iceberg-9000")];
        assert!(matches!(
            plan.sync_selections(bad_variety, &catalog),
            Err(PlantingError::VarietyNotFound { .. })
        ));
        assert_eq!(plan.selections_ordered()[0].crop_id, "tomato");
        assert_eq!(plan.selection_count(), 1);

        let good = vec![
            SelectedCrop::new("radish", "cherry-belle"),
            SelectedCrop::new("lettuce", "little-gem"),
        ];
        plan.sync_selections(good, &catalog).unwrap();
        let ids: Vec<String> =
            plan.selections_ordered().into_iter().map(|s| s.crop_id).collect();
        assert_eq!(ids, ["radish", "lettuce"]);
    }

    #[test]
    fn checked_update_rolls_back_unknown_variety() {
        let catalog = CropCatalog::builtin().unwrap();
        let mut plan = plan_with(&[("lettuce", "little-gem")]);

        let result = plan.update_selection_checked(
            "lettuce",
            json!({"varietyId": "roma", "successionInterval": 4}),
            &catalog,
        );
        assert!(matches!(result, Err(PlantingError::VarietyNotFound { .. })));
        let s = &plan.selections_ordered()[0];
        assert_eq!(s.variety_id, "little-gem");
        assert_eq!(s.succession_interval, None);

        plan.update_selection_checked("lettuce", json!({"varietyId": "buttercrunch"}), &catalog)
            .unwrap();
        assert_eq!(plan.selections_ordered()[0].variety_id, "buttercrunch");
        assert!(matches!(
            plan.update_selection_checked("okra", json!({}), &catalog),
            Err(PlantingError::CropNotFound(_))
        ));
    }

    #[test]
    fn calculate_requires_frost_dates() {
        let catalog = CropCatalog::builtin().unwrap();
        let plan = plan_with(&[("tomato", "roma")]);
        assert!(matches!(plan.calculate(&catalog), Err(PlantingError::MissingFrostDates)));
    }

    #[test]
    fn calculate_merges_and_reports_omissions() {
        let catalog = CropCatalog::builtin().unwrap();
        let mut plan = plan_with(&[("radish", "cherry-belle"), ("winter-squash", "sugar-pie")]);
        // 60-day season: radishes fit, 110-day squash does not
        plan.set_frost_dates(FrostDates::new("99999", date("2024-06-01"), date("2024-07-31")));

        let schedule = plan.calculate(&catalog).unwrap();
        assert!(schedule.events.iter().all(|e| e.crop_id == "radish"));
        assert!(!schedule.events.is_empty());
        assert_eq!(schedule.omitted.len(), 1);
        assert_eq!(schedule.omitted[0].crop_id, "winter-squash");
        assert_eq!(schedule.stats.crop_count, 2);
        assert_eq!(schedule.stats.event_count, schedule.events.len());
        assert_eq!(schedule.stats.omitted_count, 1);
        assert!(schedule.stats.first_event <= schedule.stats.last_event);
    }

    #[test]
    fn degenerate_calendar_omits_everything() {
        let catalog = CropCatalog::builtin().unwrap();
        let mut plan = plan_with(&[("radish", "cherry-belle"), ("tomato", "roma")]);
        plan.set_frost_dates(FrostDates::new("99999", date("2024-10-01"), date("2024-04-01")));

        let schedule = plan.calculate(&catalog).unwrap();
        assert!(schedule.events.is_empty());
        assert_eq!(schedule.omitted.len(), 2);
        assert!(schedule.omitted[0].reason.contains("not after last spring frost"));
        assert_eq!(schedule.stats.first_event, None);
    }

    #[test]
    fn stale_selection_is_an_error() {
        let catalog = CropCatalog::builtin().unwrap();
        let mut plan = plan_with(&[("tomato", "not-a-variety")]);
        plan.set_frost_dates(FrostDates::new("99999", date("2024-05-01"), date("2024-10-15")));
        assert!(matches!(
            plan.calculate(&catalog),
            Err(PlantingError::VarietyNotFound { .. })
        ));
    }

    #[test]
    fn sorted_events_are_chronological() {
        let catalog = CropCatalog::builtin().unwrap();
        let mut plan = plan_with(&[("tomato", "roma"), ("lettuce", "little-gem")]);
        plan.set_frost_dates(FrostDates::new("02134", date("2024-05-01"), date("2024-10-15")));

        let schedule = plan.calculate(&catalog).unwrap();
        let sorted = schedule.sorted_events();
        assert_eq!(sorted.len(), schedule.events.len());
        assert!(sorted.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
