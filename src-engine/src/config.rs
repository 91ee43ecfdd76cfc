//! Engine configuration
//!
//! Every field has a default, so an empty TOML/JSON document is valid.

use serde::{Deserialize, Serialize};

use crate::error::{PlantingError, Result};

/// Tunables for the feasibility checker and garden plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Days before the last chance date at which a planting becomes urgent
    pub urgent_window_days: i64,

    /// Extra lead time for transplant-only crops (hardening off, moving out)
    pub transplant_lead_days: i64,

    /// Default lunar annotation setting for new garden plans
    pub lunar_sync: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            urgent_window_days: 14,
            transplant_lead_days: 14,
            lunar_sync: false,
        }
    }
}

impl EngineConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| PlantingError::Config(e.to_string()))?;
        config.validate()
    }

    /// Parse from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(text).map_err(|e| PlantingError::Config(e.to_string()))?;
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.urgent_window_days < 0 {
            return Err(PlantingError::Config(
                "urgentWindowDays cannot be negative".to_string(),
            ));
        }
        if self.transplant_lead_days < 0 {
            return Err(PlantingError::Config(
                "transplantLeadDays cannot be negative".to_string(),
            ));
        }
        Ok(self)
    }
}
