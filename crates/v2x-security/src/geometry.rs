//! Planar positions and sender locations.

use serde::{Deserialize, Serialize};
use v2x_crypto::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Coord) -> f64 {
        distance(*self, *other)
    }
}

/// Euclidean distance in meters.
pub fn distance(a: Coord, b: Coord) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Where the sender claims to be.
///
/// Safety messages carry planar coordinates in their latitude/longitude
/// fields; warnings carry the roadside unit's position in fixed point.
pub fn source_coord(payload: &Payload) -> Coord {
    match payload {
        Payload::SafetyMessage(m) => Coord::new(m.latitude, m.longitude),
        Payload::Warning(w) => {
            let (x, y) = w.coarse_position();
            Coord::new(x, y)
        }
    }
}
