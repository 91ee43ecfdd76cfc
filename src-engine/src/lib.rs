//! Planting Engine
//!
//! Frost-window planting calendars for home gardens. Given a crop catalog,
//! a chosen variety and a region's frost dates, the engine derives every
//! start-indoors, transplant, direct-sow and harvest date for the primary
//! planting and its succession repeats.
//!
//! - `catalog`: validated, read-only crop registry (builtin JSON asset)
//! - `schedule`: the schedule calculator
//! - `feasibility`: "can I still plant this?" checks
//! - `lunar`: moon phase annotations
//! - `plan`: multi-crop garden plans with omission reporting
//!
//! Everything is synchronous and side-effect free apart from `tracing` events.
//!
//! ```
//! use planting_engine::{calculate_crop_schedule, CropCatalog, FrostDates, SelectedCrop};
//! use chrono::NaiveDate;
//!
//! let catalog = CropCatalog::builtin().unwrap();
//! let selected = SelectedCrop::new("tomato", "roma");
//! let (crop, variety) = catalog.resolve(&selected).unwrap();
//! let frost = FrostDates::new(
//!     "02134",
//!     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
//! );
//! let events = calculate_crop_schedule(crop, variety, &selected, &frost, false);
//! assert_eq!(events.len(), 3);
//! ```

pub mod catalog;
pub mod config;
pub mod date_utils;
pub mod error;
pub mod feasibility;
pub mod lunar;
pub mod plan;
pub mod schedule;
pub mod types;

pub use catalog::CropCatalog;
pub use config::EngineConfig;
pub use error::{PlantingError, Result};
pub use feasibility::{can_still_plant, can_still_plant_with};
pub use lunar::{moon_phase, MoonPhase};
pub use plan::GardenPlan;
pub use schedule::{calculate_crop_schedule, succession_plantings_possible};
pub use types::*;
