//! Planting Engine - WASM binding
//!
//! Exposes a `PlantingEngine` class to JavaScript. The engine owns the crop
//! catalog and the current garden plan (frost dates plus selections) and
//! hands back plain JS objects shaped like the engine's serde types.
//!
//! ## Usage from JavaScript
//!
//! ```javascript
//! import init, { PlantingEngine } from 'planting_wasm';
//!
//! await init();
//! const engine = new PlantingEngine();
//! engine.setFrostDates({
//!   zipCode: '02134',
//!   lastSpringFrost: '2024-05-01',
//!   firstFallFrost: '2024-10-15',
//! });
//! engine.selectCrop({ cropId: 'tomato', varietyId: 'roma', successionEnabled: false });
//! const { events, omitted, stats } = engine.calculate();
//! ```

mod utils;

use planting_engine::{
    calculate_crop_schedule, can_still_plant_with, CropCatalog, CropCategory, EngineConfig,
    FrostDates, GardenPlan, SelectedCrop,
};
use wasm_bindgen::prelude::*;

use crate::utils::{parse_as_of, to_js_error};

// Import console.log for debugging
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// Log macro for console output
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => (crate::log(&format_args!($($t)*).to_string()))
}

/// The planting engine exposed to JavaScript
#[wasm_bindgen]
pub struct PlantingEngine {
    catalog: CropCatalog,
    plan: GardenPlan,
    config: EngineConfig,
}

#[wasm_bindgen]
impl PlantingEngine {
    /// Create an engine loaded with the builtin crop catalog
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PlantingEngine, JsValue> {
        utils::set_panic_hook();
        let catalog = CropCatalog::builtin().map_err(|e| to_js_error("Failed to load catalog", e))?;
        console_log!("[WASM] PlantingEngine created with {} crops", catalog.len());

        let config = EngineConfig::default();
        let mut plan = GardenPlan::new();
        plan.lunar_sync = config.lunar_sync;

        Ok(PlantingEngine { catalog, plan, config })
    }

    /// Replace the crop catalog with a JSON array of crops
    #[wasm_bindgen(js_name = loadCatalog)]
    pub fn load_catalog(&mut self, catalog_json: &str) -> Result<(), JsValue> {
        self.catalog = CropCatalog::from_json(catalog_json)
            .map_err(|e| to_js_error("Failed to load catalog", e))?;
        log(&format!("[WASM] Catalog loaded with {} crops", self.catalog.len()));
        Ok(())
    }

    /// Set the engine config from a JS object (all fields optional)
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config_val: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(config_val)
            .map_err(|e| to_js_error("Failed to deserialize config", e))?;
        let config = EngineConfig::from_json_str(&value.to_string())
            .map_err(|e| to_js_error("Invalid config", e))?;
        self.plan.lunar_sync = config.lunar_sync;
        self.config = config;
        Ok(())
    }

    #[wasm_bindgen(js_name = setFrostDates)]
    pub fn set_frost_dates(&mut self, frost_val: JsValue) -> Result<(), JsValue> {
        let frost: FrostDates = serde_wasm_bindgen::from_value(frost_val)
            .map_err(|e| to_js_error("Failed to deserialize frost dates", e))?;
        if frost.is_degenerate() {
            log("[WASM] First fall frost is not after last spring frost; schedules will be empty");
        }
        self.plan.set_frost_dates(frost);
        Ok(())
    }

    #[wasm_bindgen(js_name = setLunarSync)]
    pub fn set_lunar_sync(&mut self, enabled: bool) {
        self.plan.lunar_sync = enabled;
    }

    /// Add or replace a crop selection
    #[wasm_bindgen(js_name = selectCrop)]
    pub fn select_crop(&mut self, selection_val: JsValue) -> Result<(), JsValue> {
        let selection: SelectedCrop = serde_wasm_bindgen::from_value(selection_val)
            .map_err(|e| to_js_error("Failed to deserialize selection", e))?;
        self.catalog.resolve(&selection).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.plan.select_crop(selection);
        Ok(())
    }

    /// Apply a partial update to a selection
    ///
    /// # Arguments
    /// * `crop_id` - crop whose selection changes
    /// * `updates_val` - object with any of varietyId, successionEnabled, successionInterval
    #[wasm_bindgen(js_name = updateSelection)]
    pub fn update_selection(
        &mut self,
        crop_id: String,
        updates_val: JsValue,
    ) -> Result<(), JsValue> {
        let updates: serde_json::Value = serde_wasm_bindgen::from_value(updates_val)
            .map_err(|e| to_js_error("Failed to deserialize updates", e))?;
        self.plan
            .update_selection_checked(&crop_id, updates, &self.catalog)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = removeCrop)]
    pub fn remove_crop(&mut self, crop_id: String) -> Result<(), JsValue> {
        self.plan.remove_crop(&crop_id).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace all selections (bulk sync)
    #[wasm_bindgen(js_name = syncSelections)]
    pub fn sync_selections(&mut self, selections_val: JsValue) -> Result<(), JsValue> {
        let selections: Vec<SelectedCrop> = serde_wasm_bindgen::from_value(selections_val)
            .map_err(|e| to_js_error("Failed to deserialize selections", e))?;
        let count = selections.len();
        self.plan
            .sync_selections(selections, &self.catalog)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log(&format!("[WASM] Synced {} selections", count));
        Ok(())
    }

    /// Calculate the garden schedule
    ///
    /// # Returns
    /// A JavaScript object containing:
    /// - `events`: planting events in computation order
    /// - `omitted`: crops that cannot fit the season, with reasons
    /// - `stats`: calculation statistics
    pub fn calculate(&self) -> Result<JsValue, JsValue> {
        let start = js_sys::Date::now();
        let mut schedule = self
            .plan
            .calculate(&self.catalog)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        schedule.stats.calc_time = js_sys::Date::now() - start;

        log(&format!(
            "[WASM] Schedule complete: {} crops, {} events, {} omitted, {:.2}ms",
            schedule.stats.crop_count,
            schedule.stats.event_count,
            schedule.stats.omitted_count,
            schedule.stats.calc_time
        ));

        serde_wasm_bindgen::to_value(&schedule)
            .map_err(|e| to_js_error("Failed to serialize schedule", e))
    }

    /// Calculate events for a single selection against the current frost dates
    #[wasm_bindgen(js_name = calculateCrop)]
    pub fn calculate_crop(&self, selection_val: JsValue) -> Result<JsValue, JsValue> {
        let selection: SelectedCrop = serde_wasm_bindgen::from_value(selection_val)
            .map_err(|e| to_js_error("Failed to deserialize selection", e))?;
        let frost = self
            .plan
            .frost_dates()
            .ok_or_else(|| JsValue::from_str("Frost dates not set"))?;
        let (crop, variety) = self
            .catalog
            .resolve(&selection)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let events =
            calculate_crop_schedule(crop, variety, &selection, frost, self.plan.lunar_sync);
        serde_wasm_bindgen::to_value(&events)
            .map_err(|e| to_js_error("Failed to serialize events", e))
    }

    /// Check whether a crop can still be planted
    ///
    /// `as_of` is "YYYY-MM-DD"; omitted means today.
    #[wasm_bindgen(js_name = canStillPlant)]
    pub fn can_still_plant(
        &self,
        crop_id: String,
        variety_id: String,
        as_of: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let frost = self
            .plan
            .frost_dates()
            .ok_or_else(|| JsValue::from_str("Frost dates not set"))?;
        let selection = SelectedCrop::new(crop_id, variety_id);
        let (crop, variety) = self
            .catalog
            .resolve(&selection)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let as_of = parse_as_of(as_of)?;

        let result = can_still_plant_with(crop, variety, frost, as_of, &self.config);
        serde_wasm_bindgen::to_value(&result)
            .map_err(|e| to_js_error("Failed to serialize result", e))
    }

    /// All crops in catalog order
    #[wasm_bindgen(js_name = getCrops)]
    pub fn get_crops(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.catalog.get_all_crops())
            .map_err(|e| to_js_error("Failed to serialize crops", e))
    }

    #[wasm_bindgen(js_name = getCropsByCategory)]
    pub fn get_crops_by_category(&self, category: String) -> Result<JsValue, JsValue> {
        let category = CropCategory::from_name(&category)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown category: {}", category)))?;
        serde_wasm_bindgen::to_value(&self.catalog.get_crops_by_category(category))
            .map_err(|e| to_js_error("Failed to serialize crops", e))
    }

    #[wasm_bindgen(js_name = getVarieties)]
    pub fn get_varieties(&self, crop_id: String) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.catalog.get_crop_varieties(&crop_id))
            .map_err(|e| to_js_error("Failed to serialize varieties", e))
    }

    #[wasm_bindgen(js_name = getSelections)]
    pub fn get_selections(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.plan.selections_ordered())
            .map_err(|e| to_js_error("Failed to serialize selections", e))
    }

    #[wasm_bindgen(js_name = selectionCount)]
    pub fn selection_count(&self) -> usize {
        self.plan.selection_count()
    }

    /// Drop selections and frost dates
    pub fn dispose(&mut self) {
        self.plan.clear();
        log("[WASM] Engine disposed");
    }
}

/// Module initialization - called when WASM module is loaded
#[wasm_bindgen(start)]
pub fn main() {
    utils::set_panic_hook();
    log("[WASM] Planting WASM module loaded");
}
