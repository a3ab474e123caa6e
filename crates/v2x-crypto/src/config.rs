//! Identity configuration.
//!
//! The signing algorithm is an explicit value resolved once when an
//! identity is built; nothing reads it from the environment later.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::error::{CryptoError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Subject written into the certificate.
    #[serde(default = "default_subject_id")]
    pub subject_id: String,

    /// Signature scheme for this identity (`ecdsa`, `falcon-512`, `dilithium-2`).
    #[serde(default)]
    pub algorithm: Algorithm,

    #[serde(default)]
    pub not_before: i64,

    #[serde(default = "default_not_after")]
    pub not_after: i64,
}

fn default_subject_id() -> String {
    "node".to_string()
}

fn default_not_after() -> i64 {
    i64::MAX
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            subject_id: default_subject_id(),
            algorithm: Algorithm::default(),
            not_before: 0,
            not_after: default_not_after(),
        }
    }
}

impl IdentityConfig {
    pub fn new(subject_id: impl Into<String>, algorithm: Algorithm) -> Self {
        Self {
            subject_id: subject_id.into(),
            algorithm,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| CryptoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CryptoError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.subject_id.is_empty() {
            return Err(CryptoError::Config("subject_id must not be empty".into()));
        }
        if self.not_before > self.not_after {
            return Err(CryptoError::Config(format!(
                "not_before ({}) is after not_after ({})",
                self.not_before, self.not_after
            )));
        }
        Ok(())
    }
}
