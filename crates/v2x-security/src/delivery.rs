//! Packet delivery accounting over an 8-bit wrapping sequence counter.
//!
//! The wire carries a single sequence byte, so gaps are measured as the
//! forward distance `(seq - last + 256) mod 256`. Packets missing inside a
//! gap are imputed at the last distance we actually observed the peer at,
//! because nothing is known about where the lost packets were sent from.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sequence numbers wrap modulo this value.
pub const SEQUENCE_MODULUS: i64 = 256;

/// One delivered-or-lost data point for a PDR-versus-distance curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdrSample {
    pub delivered: bool,
    pub distance: f64,
}

/// Outcome of a single [`DeliveryAccountant::observe`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Sequence number reduced modulo 256.
    pub sequence: u8,
    /// Forward distance from the previous sequence; never zero.
    pub delta: u32,
    /// Packets presumed lost between the previous and current sequence.
    pub imputed_misses: u32,
    /// Where the imputed misses are attributed.
    pub miss_distance: f64,
    /// Hit flag for the current packet (the caller's `verified`).
    pub delivered: bool,
    pub distance: f64,
}

impl Observation {
    /// Samples this observation contributes: the imputed misses first, then
    /// the current packet.
    pub fn samples(&self) -> impl Iterator<Item = PdrSample> {
        let miss = PdrSample {
            delivered: false,
            distance: self.miss_distance,
        };
        let current = PdrSample {
            delivered: self.delivered,
            distance: self.distance,
        };
        std::iter::repeat(miss)
            .take(self.imputed_misses as usize)
            .chain(std::iter::once(current))
    }
}

/// Per-peer delivery state.
///
/// One instance per remote identity; observations must be applied in
/// arrival order from a single owner.
#[derive(Debug, Clone, Default)]
pub struct DeliveryAccountant {
    last_sequence: Option<u8>,
    expected: u64,
    received: u64,
    verified: u64,
    last_known_distance: f64,
    record_samples: bool,
    samples: Vec<PdrSample>,
}

impl DeliveryAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accountant that also keeps every emitted [`PdrSample`].
    pub fn recording() -> Self {
        Self {
            record_samples: true,
            ..Self::default()
        }
    }

    /// Account for one arriving packet.
    pub fn observe(&mut self, sequence: i64, verified: bool, distance: f64) -> Observation {
        let seq = sequence.rem_euclid(SEQUENCE_MODULUS) as u8;

        let delta = match self.last_sequence {
            None => 1,
            Some(last) => {
                let forward = (i64::from(seq) - i64::from(last) + SEQUENCE_MODULUS)
                    .rem_euclid(SEQUENCE_MODULUS) as u32;
                // Duplicate or a full wrap: both look the same, keep counting.
                forward.max(1)
            }
        };

        let observation = Observation {
            sequence: seq,
            delta,
            imputed_misses: delta - 1,
            miss_distance: self.last_known_distance,
            delivered: verified,
            distance,
        };

        self.expected += u64::from(delta);
        self.received += 1;
        if verified {
            self.verified += 1;
        }
        if observation.imputed_misses > 0 {
            debug!(
                sequence = seq,
                imputed_misses = observation.imputed_misses,
                distance = self.last_known_distance,
                "sequence gap"
            );
        }
        if self.record_samples {
            self.samples.extend(observation.samples());
        }

        self.last_sequence = Some(seq);
        self.last_known_distance = distance;
        observation
    }

    /// Last sequence seen, `None` before the first observation.
    pub fn last_sequence(&self) -> Option<u8> {
        self.last_sequence
    }

    pub fn expected(&self) -> u64 {
        self.expected
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn verified(&self) -> u64 {
        self.verified
    }

    /// Packets presumed lost so far.
    pub fn missed(&self) -> u64 {
        self.expected - self.received
    }

    pub fn last_known_distance(&self) -> f64 {
        self.last_known_distance
    }

    /// `received / expected`, or 0 before anything was expected.
    pub fn pdr(&self) -> f64 {
        ratio(self.received, self.expected)
    }

    /// Like [`pdr`](Self::pdr) but only counting verified packets.
    pub fn verified_pdr(&self) -> f64 {
        ratio(self.verified, self.expected)
    }

    /// Recorded samples; empty unless built with [`recording`](Self::recording).
    pub fn samples(&self) -> &[PdrSample] {
        &self.samples
    }
}

pub(crate) fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_stream() {
        let mut acc = DeliveryAccountant::recording();
        for seq in 0..3 {
            let obs = acc.observe(seq, true, 10.0);
            assert_eq!(obs.imputed_misses, 0);
        }
        assert_eq!(acc.expected(), 3);
        assert_eq!(acc.received(), 3);
        assert_eq!(acc.pdr(), 1.0);
        assert_eq!(acc.samples().len(), 3);
        assert!(acc.samples().iter().all(|s| s.delivered && s.distance == 10.0));
    }

    #[test]
    fn test_gap_imputes_misses_at_previous_distance() {
        let mut acc = DeliveryAccountant::recording();
        acc.observe(0, true, 12.5);
        let obs = acc.observe(5, true, 20.0);

        assert_eq!(obs.delta, 5);
        assert_eq!(obs.imputed_misses, 4);
        assert_eq!(acc.expected(), 6);
        assert_eq!(acc.received(), 2);
        assert_eq!(acc.missed(), 4);

        let misses: Vec<_> = acc.samples().iter().filter(|s| !s.delivered).collect();
        assert_eq!(misses.len(), 4);
        assert!(misses.iter().all(|s| s.distance == 12.5));
        assert_eq!(
            acc.samples().last(),
            Some(&PdrSample {
                delivered: true,
                distance: 20.0
            })
        );
        assert_eq!(acc.last_known_distance(), 20.0);
    }

    #[test]
    fn test_wraparound() {
        let mut acc = DeliveryAccountant::new();
        acc.observe(254, true, 1.0);
        let obs = acc.observe(1, true, 2.0);
        assert_eq!(obs.delta, 3);
        assert_eq!(obs.imputed_misses, 2);
        assert_eq!(acc.expected(), 4);
    }

    #[test]
    fn test_sequence_reduced_modulo_256() {
        let mut acc = DeliveryAccountant::new();
        assert_eq!(acc.observe(257, true, 0.0).sequence, 1);
        assert_eq!(acc.last_sequence(), Some(1));
        assert_eq!(acc.observe(-1, true, 0.0).sequence, 255);
    }

    #[test]
    fn test_duplicate_counts_as_one_step() {
        let mut acc = DeliveryAccountant::new();
        acc.observe(9, true, 0.0);
        let before = acc.expected();
        let obs = acc.observe(9, true, 0.0);
        assert_eq!(obs.delta, 1);
        assert_eq!(obs.imputed_misses, 0);
        assert_eq!(acc.expected(), before + 1);
    }

    #[test]
    fn test_unverified_packet_still_received() {
        let mut acc = DeliveryAccountant::recording();
        acc.observe(0, true, 5.0);
        acc.observe(1, false, 6.0);
        assert_eq!(acc.received(), 2);
        assert_eq!(acc.verified(), 1);
        assert_eq!(acc.pdr(), 1.0);
        assert_eq!(acc.verified_pdr(), 0.5);
        assert!(!acc.samples()[1].delivered);
    }

    #[test]
    fn test_empty_accountant() {
        let acc = DeliveryAccountant::new();
        assert_eq!(acc.last_sequence(), None);
        assert_eq!(acc.pdr(), 0.0);
        assert_eq!(acc.verified_pdr(), 0.0);
    }

    #[test]
    fn test_samples_not_kept_by_default() {
        let mut acc = DeliveryAccountant::new();
        let obs = acc.observe(0, true, 1.0);
        let obs2 = acc.observe(3, true, 2.0);
        assert!(acc.samples().is_empty());
        assert_eq!(obs.samples().count(), 1);
        assert_eq!(obs2.samples().count(), 3);
    }
}
