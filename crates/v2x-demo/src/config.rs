//! Demo scenario configuration.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use v2x_crypto::Algorithm;
use v2x_security::{AccountingConfig, Coord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub subject_id: String,
    pub algorithm: Algorithm,
    pub start: Coord,
    #[serde(default = "default_speed")]
    pub speed_mps: f64,
    #[serde(default)]
    pub heading_rad: f64,
}

fn default_speed() -> f64 {
    13.9
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadsideConfig {
    pub subject_id: String,
    #[serde(default)]
    pub algorithm: Algorithm,
    pub position: Coord,
    #[serde(default = "default_intersection")]
    pub intersection_id: i32,
    /// Broadcast a warning every this many ticks.
    #[serde(default = "default_warning_every")]
    pub warning_every: u32,
}

fn default_intersection() -> i32 {
    1
}

fn default_warning_every() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of broadcast ticks.
    pub ticks: u32,
    pub interval_ms: i64,
    /// Independent per-packet drop probability.
    pub loss_probability: f64,
    pub base_latency_ms: i64,
    pub bitrate_bps: u64,
    pub receiver: Coord,
    pub accounting: AccountingConfig,
    pub vehicles: Vec<VehicleConfig>,
    pub roadside: Option<RoadsideConfig>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let vehicles = Algorithm::ALL
            .iter()
            .enumerate()
            .map(|(i, alg)| VehicleConfig {
                subject_id: format!("car[{i}]"),
                algorithm: *alg,
                start: Coord::new(-100.0 * (i as f64 + 1.0), 5.0 * i as f64),
                speed_mps: default_speed(),
                heading_rad: 0.0,
            })
            .collect();

        Self {
            ticks: 300,
            interval_ms: 100,
            loss_probability: 0.1,
            base_latency_ms: 2,
            bitrate_bps: 6_000_000,
            receiver: Coord::new(0.0, 0.0),
            accounting: AccountingConfig::default(),
            vehicles,
            roadside: Some(RoadsideConfig {
                subject_id: "rsu[0]".to_string(),
                algorithm: Algorithm::Dilithium2,
                position: Coord::new(150.0, 20.0),
                intersection_id: default_intersection(),
                warning_every: default_warning_every(),
            }),
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("invalid demo configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.loss_probability),
            "loss_probability must be within [0, 1]"
        );
        ensure!(self.interval_ms > 0, "interval_ms must be positive");
        ensure!(self.bitrate_bps > 0, "bitrate_bps must be positive");
        ensure!(
            !self.vehicles.is_empty() || self.roadside.is_some(),
            "scenario has no senders"
        );
        if let Some(rsu) = &self.roadside {
            ensure!(rsu.warning_every > 0, "warning_every must be positive");
        }
        self.accounting.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_fleet_covers_every_algorithm() {
        let config = DemoConfig::default();
        config.validate().unwrap();
        let algs: Vec<_> = config.vehicles.iter().map(|v| v.algorithm).collect();
        assert_eq!(algs, Algorithm::ALL.to_vec());
        assert!(config.roadside.is_some());
    }

    #[test]
    fn test_parse_scenario() {
        let toml = r#"
            ticks = 20
            loss_probability = 0.5

            [accounting]
            distance_bin_width_m = 25.0

            [[vehicles]]
            subject_id = "car[9]"
            algorithm = "Falcon-512"
            start = { x = 10.0, y = 0.0 }
        "#;
        let config = DemoConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.ticks, 20);
        assert_eq!(config.vehicles.len(), 1);
        assert_eq!(config.vehicles[0].algorithm, Algorithm::Falcon512);
        assert_eq!(config.vehicles[0].speed_mps, 13.9);
        assert_eq!(config.accounting.distance_bin_width_m, 25.0);
        // Unspecified sections keep their defaults.
        assert!(config.roadside.is_some());
    }

    #[test]
    fn test_rejects_bad_loss_probability() {
        assert!(DemoConfig::from_toml_str("loss_probability = 1.5").is_err());
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        let toml = r#"
            [[vehicles]]
            subject_id = "car[0]"
            algorithm = "rsa"
            start = { x = 0.0, y = 0.0 }
        "#;
        assert!(DemoConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ticks = 3\ninterval_ms = 50").unwrap();
        let config = DemoConfig::load_from_file(file.path()).unwrap();
        assert_eq!((config.ticks, config.interval_ms), (3, 50));
    }
}
