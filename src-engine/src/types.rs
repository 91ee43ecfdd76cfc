//! Type definitions for the planting engine
//!
//! These types mirror the object shapes the garden UI exchanges with the engine.
//! IMPORTANT: Field names use camelCase via serde rename to match JS

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lunar::MoonPhase;

/// Crop grouping used for catalog filtering
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CropCategory {
    Vegetable,
    Herb,
    Fruit,
}

impl CropCategory {
    /// Parse the wire name ("vegetable", "herb", "fruit")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "vegetable" => Some(CropCategory::Vegetable),
            "herb" => Some(CropCategory::Herb),
            "fruit" => Some(CropCategory::Fruit),
            _ => None,
        }
    }
}

/// Preferred lunar phase for sowing. Advisory only, never gates scheduling.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LunarAffinity {
    /// New moon to full moon (leafy and above-ground crops)
    Waxing,
    /// Full moon to new moon (root crops)
    Waning,
}

/// A cultivar within a crop
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variety {
    pub id: String,
    pub name: String,

    /// Overrides the crop's maturity when present and non-zero
    #[serde(default)]
    pub days_to_maturity: Option<u32>,

    /// Display-only cultivar type ("cherry", "heirloom", ...)
    #[serde(rename = "type", default)]
    pub variety_type: Option<String>,

    /// Display-only tags
    #[serde(default)]
    pub special: Vec<String>,
}

/// Species-level crop definition
///
/// All timing offsets are days relative to the region's last spring frost.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    // === Identity ===
    pub id: String,
    pub name: String,
    pub category: CropCategory,
    #[serde(default)]
    pub icon: String,

    // === Timing (days relative to last frost) ===
    /// Days BEFORE last frost to start seeds indoors
    #[serde(default)]
    pub start_indoors: Option<i64>,

    /// Days AFTER last frost to move seedlings outside
    #[serde(default)]
    pub transplant: Option<i64>,

    /// Days relative to last frost to sow outside (negative = before frost)
    #[serde(default)]
    pub direct_sow: Option<i64>,

    /// Default days from planting to harvest
    pub days_to_maturity: u32,

    // === Succession ===
    #[serde(default)]
    pub succession_enabled: bool,

    /// Weeks between repeat plantings (fallback when the user gives none)
    #[serde(default)]
    pub succession_interval: u32,

    /// Hard cap on plantings, primary included
    #[serde(default = "default_succession_max")]
    pub succession_max: u32,

    pub varieties: Vec<Variety>,

    #[serde(default)]
    pub lunar_affinity: Option<LunarAffinity>,
}

fn default_succession_max() -> u32 {
    1
}

impl Crop {
    /// Look up a variety by id
    pub fn variety(&self, variety_id: &str) -> Option<&Variety> {
        self.varieties.iter().find(|v| v.id == variety_id)
    }

    /// Days from planting to harvest for a variety.
    /// Variety overrides the crop default only when non-zero.
    pub fn maturity_days(&self, variety: &Variety) -> u32 {
        match variety.days_to_maturity {
            Some(days) if days > 0 => days,
            _ => self.days_to_maturity,
        }
    }

    /// Offset of the day seeds or seedlings go into the ground.
    /// Direct sow wins over transplant when both are defined.
    pub fn planting_offset(&self) -> Option<i64> {
        self.direct_sow.or(self.transplant)
    }
}

/// A region's frost calendar, supplied by the geocoding collaborator
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrostDates {
    pub zip_code: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,

    pub last_spring_frost: NaiveDate,
    pub first_fall_frost: NaiveDate,

    /// +/- days of uncertainty on the last spring frost
    #[serde(default)]
    pub last_frost_confidence: Option<u32>,
    /// +/- days of uncertainty on the first fall frost
    #[serde(default)]
    pub first_frost_confidence: Option<u32>,

    /// Provider-reported frost-free days (display-only)
    #[serde(default)]
    pub frost_free_days: Option<i64>,

    #[serde(default)]
    pub growing_zone: Option<String>,
}

impl FrostDates {
    /// Build a bare calendar from the two frost dates
    pub fn new(
        zip_code: impl Into<String>,
        last_spring_frost: NaiveDate,
        first_fall_frost: NaiveDate,
    ) -> Self {
        Self {
            zip_code: zip_code.into(),
            city: None,
            state: None,
            last_spring_frost,
            first_fall_frost,
            last_frost_confidence: None,
            first_frost_confidence: None,
            frost_free_days: None,
            growing_zone: None,
        }
    }

    /// Signed days between last spring frost and first fall frost
    pub fn frost_free_window(&self) -> i64 {
        (self.first_fall_frost - self.last_spring_frost).num_days()
    }

    /// True when no planting can ever fit (first frost on or before last frost)
    pub fn is_degenerate(&self) -> bool {
        self.first_fall_frost <= self.last_spring_frost
    }
}

/// A user's crop choice
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCrop {
    pub crop_id: String,
    pub variety_id: String,

    #[serde(default)]
    pub succession_enabled: bool,

    /// Weeks between plantings, overriding the crop default. 0 is legal.
    #[serde(default)]
    pub succession_interval: Option<u32>,
}

impl SelectedCrop {
    pub fn new(crop_id: impl Into<String>, variety_id: impl Into<String>) -> Self {
        Self {
            crop_id: crop_id.into(),
            variety_id: variety_id.into(),
            succession_enabled: false,
            succession_interval: None,
        }
    }

    /// Enable succession with an optional interval override
    pub fn with_succession(mut self, interval_weeks: Option<u32>) -> Self {
        self.succession_enabled = true;
        self.succession_interval = interval_weeks;
        self
    }
}

/// What happens on a planting date
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum PlantingAction {
    StartIndoors,
    Transplant,
    DirectSow,
    Harvest,
}

impl PlantingAction {
    pub fn label(&self) -> &'static str {
        match self {
            PlantingAction::StartIndoors => "Start indoors",
            PlantingAction::Transplant => "Transplant",
            PlantingAction::DirectSow => "Direct sow",
            PlantingAction::Harvest => "Harvest",
        }
    }

    /// Whether this action puts a plant in the ground (gets lunar annotations)
    pub fn is_planting(&self) -> bool {
        matches!(self, PlantingAction::Transplant | PlantingAction::DirectSow)
    }
}

/// One dated event of a planting cycle
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlantingDate {
    pub crop_id: String,
    pub crop_name: String,
    pub variety_name: String,
    pub action: PlantingAction,
    pub date: NaiveDate,

    /// 1-based succession index; None on the primary planting
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub succession_number: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lunar_phase: Option<MoonPhase>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lunar_aligned: Option<bool>,
}

/// Result of a "can I still plant this?" check
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResult {
    pub can_plant: bool,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_chance_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub days_remaining: Option<i64>,

    /// Plantable, but inside the last-chance window
    #[serde(default)]
    pub urgent: bool,

    pub message: String,
}

/// Why a selected crop produced no events
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OmittedCrop {
    pub crop_id: String,
    pub crop_name: String,
    pub reason: String,
}

/// Garden calculation statistics
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub calc_time: f64,
    pub crop_count: usize,
    pub event_count: usize,
    pub omitted_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_event: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<NaiveDate>,
}

/// Merged schedule for every selected crop
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GardenSchedule {
    pub events: Vec<PlantingDate>,
    pub omitted: Vec<OmittedCrop>,
    pub stats: ScheduleStats,
}

impl GardenSchedule {
    /// Events in chronological order (ties: crop id, then action order)
    pub fn sorted_events(&self) -> Vec<PlantingDate> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.crop_id.cmp(&b.crop_id))
                .then_with(|| a.action.cmp(&b.action))
        });
        events
    }
}
