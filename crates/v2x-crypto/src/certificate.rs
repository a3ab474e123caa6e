//! Self-asserted certificates.
//!
//! A certificate binds a subject id, an algorithm label and raw public key
//! bytes for a validity window. No issuer chain exists: receivers trust it
//! only as far as the enclosed signature checks out.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::algorithm::Algorithm;
use crate::codec::{build_tagged_key, prefix_key_with_label, to_hex};
use crate::registry::KeyPair;

/// Size of the two validity timestamps on the wire.
const VALIDITY_WIRE_LEN: usize = 2 * std::mem::size_of::<i64>();

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub subject_id: String,
    /// Free text, e.g. `"Falcon-512"`; mapped to an algorithm by substring.
    pub algorithm_label: String,
    pub public_key: Vec<u8>,
    pub not_before: i64,
    pub not_after: i64,
}

impl Certificate {
    /// An all-time-valid certificate for the public half of `keypair`.
    pub fn for_keypair(subject_id: impl Into<String>, keypair: &KeyPair) -> Self {
        Self {
            subject_id: subject_id.into(),
            algorithm_label: keypair.algorithm().label().to_string(),
            public_key: keypair.public_key().to_vec(),
            not_before: 0,
            not_after: i64::MAX,
        }
    }

    pub fn with_validity(mut self, not_before: i64, not_after: i64) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }

    /// Algorithm implied by the label.
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::from_label(&self.algorithm_label)
    }

    /// The enclosed key in `ALG:<tag>:<hex>` form, tag taken from the label.
    pub fn tagged_public_key(&self) -> String {
        build_tagged_key(self.algorithm(), &self.public_key)
    }

    /// Tag a raw hex key string the way a legacy receiver would.
    pub fn tag_raw_key(&self, raw_hex: &str) -> String {
        prefix_key_with_label(raw_hex, &self.algorithm_label)
    }

    /// Inclusive on both ends. Informational; verification does not consult it.
    pub fn is_valid_at(&self, timestamp: i64) -> bool {
        self.not_before <= timestamp && timestamp <= self.not_after
    }

    /// SHA-256 of the public key.
    pub fn fingerprint(&self) -> [u8; 32] {
        Sha256::digest(&self.public_key).into()
    }

    /// First eight fingerprint bytes in hex, for logs.
    pub fn short_fingerprint(&self) -> String {
        to_hex(&self.fingerprint()[..8])
    }

    /// Bytes this certificate adds to an envelope on the wire.
    pub fn wire_len(&self) -> usize {
        self.subject_id.len() + self.algorithm_label.len() + self.public_key.len() + VALIDITY_WIRE_LEN
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject_id", &self.subject_id)
            .field("algorithm_label", &self.algorithm_label)
            .field("fingerprint", &self.short_fingerprint())
            .field("public_key_len", &self.public_key.len())
            .field("not_before", &self.not_before)
            .field("not_after", &self.not_after)
            .finish()
    }
}
