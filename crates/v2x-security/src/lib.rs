#![forbid(unsafe_code)]

//! Receive-side accounting for V2X safety broadcasts.
//!
//! - Packet delivery accounting over an 8-bit wrapping sequence counter
//! - Per-peer tracking and PDR-versus-distance bins
//! - A receive pipeline that verifies envelopes and records statistics

pub mod error;
pub mod config;
pub mod geometry;
pub mod delivery;
pub mod binning;
pub mod tracker;
pub mod receiver;

#[cfg(test)]
mod proptests;

pub use binning::{DistanceBin, PdrByDistance};
pub use config::AccountingConfig;
pub use delivery::{DeliveryAccountant, Observation, PdrSample};
pub use error::SecurityError;
pub use geometry::Coord;
pub use receiver::{AlgorithmStats, Receiver, Reception, ReceptionStats};
pub use tracker::{PdrSummary, PeerTracker};
