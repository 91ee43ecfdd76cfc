//! Crop Catalog
//!
//! Read-only registry of crop definitions. The builtin catalog is a JSON asset
//! compiled into the crate; any other JSON source with the same shape can be
//! loaded through `from_json`. Every crop is validated on load so broken data
//! fails here and never reaches the date arithmetic.

use std::collections::{HashMap, HashSet};

use crate::error::{PlantingError, Result};
use crate::types::{Crop, CropCategory, SelectedCrop, Variety};

const BUILTIN_CATALOG: &str = include_str!("../data/crops.json");

/// Largest accepted timing offset, in days either side of last frost
const MAX_OFFSET_DAYS: i64 = 366;

/// Immutable crop registry
///
/// Crops keep their source order; lookups go through an id index.
#[derive(Debug, Clone, Default)]
pub struct CropCatalog {
    crops: Vec<Crop>,
    index: HashMap<String, usize>,
}

impl CropCatalog {
    /// Load the catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a JSON array of crops
    pub fn from_json(json: &str) -> Result<Self> {
        let crops: Vec<Crop> = serde_json::from_str(json)?;
        Self::from_crops(crops)
    }

    /// Build from already-deserialized crops
    pub fn from_crops(crops: Vec<Crop>) -> Result<Self> {
        let mut index = HashMap::with_capacity(crops.len());

        for (position, crop) in crops.iter().enumerate() {
            validate_crop(crop)?;
            if index.insert(crop.id.clone(), position).is_some() {
                return Err(PlantingError::DuplicateCrop(crop.id.clone()));
            }
        }

        tracing::info!(crop_count = crops.len(), "crop catalog loaded");
        Ok(Self { crops, index })
    }

    pub fn get_crop_by_id(&self, id: &str) -> Option<&Crop> {
        self.index.get(id).map(|&i| &self.crops[i])
    }

    /// All crops in catalog order
    pub fn get_all_crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn get_crops_by_category(&self, category: CropCategory) -> Vec<&Crop> {
        self.crops.iter().filter(|c| c.category == category).collect()
    }

    /// Varieties of a crop; empty if the crop is unknown
    pub fn get_crop_varieties(&self, crop_id: &str) -> &[Variety] {
        self.get_crop_by_id(crop_id)
            .map(|c| c.varieties.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a user selection to its crop and variety
    pub fn resolve(&self, selected: &SelectedCrop) -> Result<(&Crop, &Variety)> {
        let crop = self
            .get_crop_by_id(&selected.crop_id)
            .ok_or_else(|| PlantingError::CropNotFound(selected.crop_id.clone()))?;
        let variety = crop
            .variety(&selected.variety_id)
            .ok_or_else(|| PlantingError::VarietyNotFound {
                crop_id: selected.crop_id.clone(),
                variety_id: selected.variety_id.clone(),
            })?;
        Ok((crop, variety))
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

/// Check the structural invariants the calculator relies on
fn validate_crop(crop: &Crop) -> Result<()> {
    let id = crop.id.as_str();

    if id.trim().is_empty() {
        return Err(PlantingError::invalid_crop(id, "id is empty"));
    }
    if crop.transplant.is_none() && crop.direct_sow.is_none() {
        return Err(PlantingError::invalid_crop(
            id,
            "needs a transplant or directSow offset",
        ));
    }
    if crop.start_indoors.is_some() && crop.transplant.is_none() {
        return Err(PlantingError::invalid_crop(
            id,
            "startIndoors requires a transplant offset",
        ));
    }
    if let Some(days) = crop.start_indoors {
        if days < 0 {
            return Err(PlantingError::invalid_crop(
                id,
                "startIndoors counts days before last frost and cannot be negative",
            ));
        }
    }
    for (field, offset) in [
        ("startIndoors", crop.start_indoors),
        ("transplant", crop.transplant),
        ("directSow", crop.direct_sow),
    ] {
        if let Some(days) = offset {
            if days.abs() > MAX_OFFSET_DAYS {
                return Err(PlantingError::invalid_crop(
                    id,
                    format!("{} offset {} is outside +/-{} days", field, days, MAX_OFFSET_DAYS),
                ));
            }
        }
    }
    if crop.days_to_maturity == 0 {
        return Err(PlantingError::invalid_crop(id, "daysToMaturity must be positive"));
    }
    if crop.succession_max == 0 {
        return Err(PlantingError::invalid_crop(id, "successionMax must be at least 1"));
    }
    if crop.varieties.is_empty() {
        return Err(PlantingError::invalid_crop(id, "has no varieties"));
    }

    let mut seen = HashSet::new();
    for variety in &crop.varieties {
        if !seen.insert(variety.id.as_str()) {
            return Err(PlantingError::invalid_crop(
                id,
                format!("duplicate variety id '{}'", variety.id),
            ));
        }
    }

    Ok(())
}
