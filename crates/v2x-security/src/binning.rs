//! PDR versus distance, aggregated into fixed-width bins.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::delivery::{ratio, PdrSample};

/// Highest bin index. Everything at or beyond it shares one open-ended bin.
const OVERFLOW_BIN: u64 = 1 << 32;

/// Counts for one distance range `[lower_m, upper_m)`.
///
/// The overflow bin has `upper_m = f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceBin {
    pub lower_m: f64,
    pub upper_m: f64,
    pub delivered: u64,
    pub total: u64,
}

impl DistanceBin {
    pub fn pdr(&self) -> f64 {
        ratio(self.delivered, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct PdrByDistance {
    width_m: f64,
    // bin index -> (delivered, total)
    bins: BTreeMap<u64, (u64, u64)>,
}

impl PdrByDistance {
    /// `width_m` must be positive; see `AccountingConfig::validate`.
    pub fn new(width_m: f64) -> Self {
        Self {
            width_m,
            bins: BTreeMap::new(),
        }
    }

    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    pub fn record(&mut self, sample: PdrSample) {
        // Saturating cast: negative and NaN distances land in bin 0.
        let index = ((sample.distance / self.width_m).floor() as u64).min(OVERFLOW_BIN);
        let entry = self.bins.entry(index).or_insert((0, 0));
        if sample.delivered {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    pub fn extend(&mut self, samples: impl IntoIterator<Item = PdrSample>) {
        for sample in samples {
            self.record(sample);
        }
    }

    pub fn total(&self) -> u64 {
        self.bins.values().map(|(_, total)| total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Non-empty bins in increasing distance order.
    pub fn bins(&self) -> Vec<DistanceBin> {
        self.bins
            .iter()
            .map(|(&index, &(delivered, total))| DistanceBin {
                lower_m: index as f64 * self.width_m,
                upper_m: if index == OVERFLOW_BIN {
                    f64::INFINITY
                } else {
                    (index + 1) as f64 * self.width_m
                },
                delivered,
                total,
            })
            .collect()
    }
}
