//! Accounting configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SecurityError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingConfig {
    /// Width of one PDR-versus-distance bin, meters.
    #[serde(default = "default_bin_width")]
    pub distance_bin_width_m: f64,

    /// Keep every emitted sample on each peer's accountant.
    #[serde(default)]
    pub record_samples: bool,
}

fn default_bin_width() -> f64 {
    50.0
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            distance_bin_width_m: default_bin_width(),
            record_samples: false,
        }
    }
}

impl AccountingConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| SecurityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let w = self.distance_bin_width_m;
        if !w.is_finite() || w <= 0.0 {
            return Err(SecurityError::Config(format!(
                "distance_bin_width_m must be positive, got {w}"
            )));
        }
        Ok(())
    }
}
