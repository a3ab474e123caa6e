//! One delivery accountant per remote peer.

use std::collections::HashMap;

use serde::Serialize;

use crate::binning::PdrByDistance;
use crate::config::AccountingConfig;
use crate::delivery::{DeliveryAccountant, Observation};
use crate::error::Result;

/// Per-peer totals at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdrSummary {
    pub peer: String,
    pub received: u64,
    pub expected: u64,
    pub verified: u64,
    pub pdr: f64,
}

/// Tracks every peer heard from, keyed by certificate subject id.
///
/// Peers are never merged: each subject gets its own sequence state.
#[derive(Debug, Clone)]
pub struct PeerTracker {
    config: AccountingConfig,
    peers: HashMap<String, DeliveryAccountant>,
    by_distance: PdrByDistance,
}

impl PeerTracker {
    pub fn new(config: AccountingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            by_distance: PdrByDistance::new(config.distance_bin_width_m),
            peers: HashMap::new(),
            config,
        })
    }

    /// Feed one packet from `peer`, creating its accountant on first contact.
    pub fn observe(
        &mut self,
        peer: &str,
        sequence: i64,
        verified: bool,
        distance: f64,
    ) -> Observation {
        let record = self.config.record_samples;
        let accountant = self.peers.entry(peer.to_string()).or_insert_with(|| {
            if record {
                DeliveryAccountant::recording()
            } else {
                DeliveryAccountant::new()
            }
        });
        let observation = accountant.observe(sequence, verified, distance);
        self.by_distance.extend(observation.samples());
        observation
    }

    pub fn accountant(&self, peer: &str) -> Option<&DeliveryAccountant> {
        self.peers.get(peer)
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn by_distance(&self) -> &PdrByDistance {
        &self.by_distance
    }

    /// Per-peer summaries sorted by peer id.
    pub fn summary(&self) -> Vec<PdrSummary> {
        let mut out: Vec<PdrSummary> = self
            .peers
            .iter()
            .map(|(peer, acc)| PdrSummary {
                peer: peer.clone(),
                received: acc.received(),
                expected: acc.expected(),
                verified: acc.verified(),
                pdr: acc.pdr(),
            })
            .collect();
        out.sort_by(|a, b| a.peer.cmp(&b.peer));
        out
    }
}
