//! Receive pipeline: verify, measure, account.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};
use v2x_crypto::{Algorithm, SignedEnvelope};

use crate::config::AccountingConfig;
use crate::delivery::Observation;
use crate::error::{Result, SecurityError};
use crate::geometry::{source_coord, Coord};
use crate::tracker::PeerTracker;

/// Counters for one signature scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlgorithmStats {
    pub received: u64,
    pub verified: u64,
    pub verify_time: Duration,
    pub signature_bytes: u64,
    pub wire_bytes: u64,
}

impl AlgorithmStats {
    pub fn mean_verify_time(&self) -> Duration {
        match u32::try_from(self.received) {
            Ok(n) if n > 0 => self.verify_time / n,
            _ => Duration::ZERO,
        }
    }

    pub fn mean_signature_len(&self) -> u64 {
        self.signature_bytes.checked_div(self.received).unwrap_or(0)
    }

    pub fn mean_wire_len(&self) -> u64 {
        self.wire_bytes.checked_div(self.received).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReceptionStats {
    /// Every arrival, including dropped ones.
    pub received: u64,
    pub verified: u64,
    /// Checked but not authentic.
    pub rejected: u64,
    /// Could not be decoded or checked; never reached the accountant.
    pub dropped: u64,
    pub per_algorithm: HashMap<Algorithm, AlgorithmStats>,
}

impl ReceptionStats {
    pub fn for_algorithm(&self, algorithm: Algorithm) -> Option<&AlgorithmStats> {
        self.per_algorithm.get(&algorithm)
    }
}

/// What happened to one accepted envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Reception {
    pub sender: String,
    pub algorithm: Algorithm,
    pub verified: bool,
    pub distance_m: f64,
    pub delay_ms: i64,
    pub verify_time: Duration,
    pub observation: Observation,
}

/// A stationary or moving receiver.
#[derive(Debug)]
pub struct Receiver {
    position: Coord,
    tracker: PeerTracker,
    stats: ReceptionStats,
}

impl Receiver {
    pub fn new(position: Coord, config: AccountingConfig) -> Result<Self> {
        Ok(Self {
            position,
            tracker: PeerTracker::new(config)?,
            stats: ReceptionStats::default(),
        })
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn set_position(&mut self, position: Coord) {
        self.position = position;
    }

    /// Verify `envelope` and account for it.
    ///
    /// Envelopes that cannot be checked at all are counted as dropped and
    /// returned as errors; the sender's accountant is left untouched. An
    /// envelope whose signature does not match is still accounted, with
    /// `verified = false`.
    pub fn receive(&mut self, envelope: &SignedEnvelope, now_ms: i64) -> Result<Reception> {
        self.stats.received += 1;

        let start = Instant::now();
        let verified = match envelope.verify() {
            Ok(v) => v,
            Err(e) => {
                self.stats.dropped += 1;
                warn!(sender = %envelope.sender(), error = %e, "dropping envelope");
                return Err(e.into());
            }
        };
        let verify_time = start.elapsed();

        let algorithm = envelope.certificate.algorithm();
        let distance_m = self.position.distance(&source_coord(&envelope.payload));
        let delay_ms = envelope.delay_ms(now_ms);
        let observation =
            self.tracker
                .observe(envelope.sender(), envelope.sequence(), verified, distance_m);

        if verified {
            self.stats.verified += 1;
        } else {
            self.stats.rejected += 1;
            warn!(
                sender = %envelope.sender(),
                algorithm = %algorithm,
                sequence = envelope.sequence(),
                "signature did not verify"
            );
        }

        let per_alg = self.stats.per_algorithm.entry(algorithm).or_default();
        per_alg.received += 1;
        if verified {
            per_alg.verified += 1;
        }
        per_alg.verify_time += verify_time;
        per_alg.signature_bytes += envelope.signature.len() as u64;
        per_alg.wire_bytes += envelope.estimated_wire_len() as u64;

        debug!(
            sender = %envelope.sender(),
            algorithm = %algorithm,
            verified,
            distance_m,
            delay_ms,
            verify_us = verify_time.as_micros() as u64,
            "envelope received"
        );

        Ok(Reception {
            sender: envelope.sender().to_string(),
            algorithm,
            verified,
            distance_m,
            delay_ms,
            verify_time,
            observation,
        })
    }

    /// Decode a JSON envelope and [`receive`](Self::receive) it.
    pub fn receive_json(&mut self, json: &str, now_ms: i64) -> Result<Reception> {
        match serde_json::from_str::<SignedEnvelope>(json) {
            Ok(envelope) => self.receive(&envelope, now_ms),
            Err(e) => {
                self.stats.received += 1;
                self.stats.dropped += 1;
                warn!(error = %e, "dropping undecodable envelope");
                Err(SecurityError::Envelope(e.to_string()))
            }
        }
    }

    pub fn stats(&self) -> &ReceptionStats {
        &self.stats
    }

    pub fn tracker(&self) -> &PeerTracker {
        &self.tracker
    }
}
