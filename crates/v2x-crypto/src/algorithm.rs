//! Signature algorithm identifiers.
//!
//! Every peer advertises its scheme either through the tag embedded in a
//! tagged key (`ALG:<tag>:<hex>`) or through the human-readable label in its
//! certificate. Both map onto the closed [`Algorithm`] set below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// The three supported signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    /// ECDSA over NIST P-256 with a SHA-256 digest.
    EcdsaP256,
    /// Falcon-512 lattice signatures.
    Falcon512,
    /// CRYSTALS-Dilithium, parameter set 2.
    #[default]
    Dilithium2,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::EcdsaP256,
        Algorithm::Falcon512,
        Algorithm::Dilithium2,
    ];

    /// Wire tag used in `ALG:<tag>:<hex>` strings.
    pub fn tag(self) -> &'static str {
        match self {
            Algorithm::EcdsaP256 => "ecdsa",
            Algorithm::Falcon512 => "falcon-512",
            Algorithm::Dilithium2 => "dilithium-2",
        }
    }

    /// Label carried in certificates.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::EcdsaP256 => "ECDSA P-256",
            Algorithm::Falcon512 => "Falcon-512",
            Algorithm::Dilithium2 => "Dilithium 2",
        }
    }

    pub fn is_post_quantum(self) -> bool {
        !matches!(self, Algorithm::EcdsaP256)
    }

    /// Resolve a wire tag. Matching is case-insensitive; unknown tags are
    /// rejected rather than defaulted.
    pub fn from_tag(tag: &str) -> Result<Self, CryptoError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ecdsa" | "ecdsa-p256" | "p256" => Ok(Algorithm::EcdsaP256),
            "falcon-512" | "falcon512" => Ok(Algorithm::Falcon512),
            "dilithium-2" | "dilithium2" => Ok(Algorithm::Dilithium2),
            _ => Err(CryptoError::UnknownAlgorithmTag {
                tag: tag.to_string(),
            }),
        }
    }

    /// Map a free-text certificate label onto an algorithm by substring.
    ///
    /// Anything that is neither ECDSA nor Falcon is treated as Dilithium2.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        if label.contains("ecdsa") {
            Algorithm::EcdsaP256
        } else if label.contains("falcon") {
            Algorithm::Falcon512
        } else {
            Algorithm::Dilithium2
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::from_tag(s)
    }
}

impl TryFrom<String> for Algorithm {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Algorithm::from_tag(&value)
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.tag().to_string()
    }
}
