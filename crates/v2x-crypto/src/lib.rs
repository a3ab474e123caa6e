#![forbid(unsafe_code)]

//! Crypto-agile authentication for V2X safety broadcasts.
//!
//! - Hex and `ALG:<tag>:<hex>` tagged-key codecs
//! - Algorithm registry over ECDSA P-256, Falcon-512 and Dilithium2
//! - Canonical payload encoding (the exact bytes that are signed)
//! - Self-asserted certificates and signed envelopes

pub mod algorithm;
pub mod codec;
pub mod error;

mod backends;
pub mod registry;

pub mod canonical;
pub mod payload;

pub mod certificate;
pub mod config;
pub mod envelope;
pub mod identity;

#[cfg(test)]
mod proptests;

pub use algorithm::Algorithm;
pub use canonical::{Canonical, CanonicalEncoder};
pub use certificate::Certificate;
pub use codec::TaggedKey;
pub use config::IdentityConfig;
pub use envelope::SignedEnvelope;
pub use error::CryptoError;
pub use identity::Identity;
pub use payload::{LaneSelector, Payload, SafetyMessage, Warning};
pub use registry::KeyPair;
