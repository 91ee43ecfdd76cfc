//! Error types for the planting engine
//!
//! Infeasible plantings are NOT errors; they produce empty schedules.
//! These variants cover broken catalog data, stale ids and malformed input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlantingError {
    #[error("Failed to parse crop catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("Invalid crop '{crop_id}': {reason}")]
    InvalidCrop { crop_id: String, reason: String },

    #[error("Duplicate crop id in catalog: {0}")]
    DuplicateCrop(String),

    #[error("Crop not found: {0}")]
    CropNotFound(String),

    #[error("Variety '{variety_id}' not found for crop '{crop_id}'")]
    VarietyNotFound { crop_id: String, variety_id: String },

    #[error("Frost dates not set")]
    MissingFrostDates,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid engine config: {0}")]
    Config(String),
}

impl PlantingError {
    pub(crate) fn invalid_crop(crop_id: &str, reason: impl Into<String>) -> Self {
        PlantingError::InvalidCrop {
            crop_id: crop_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlantingError>;
