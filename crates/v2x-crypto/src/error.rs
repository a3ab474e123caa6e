//! Error types for signing, verification and wire decoding.

use thiserror::Error;

use crate::algorithm::Algorithm;

/// Errors raised by the crypto layer.
///
/// A signature that simply does not match is *not* an error: verification
/// returns `Ok(false)` for that case so callers can tell "disproven" apart
/// from "could not be parsed".
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed hex or tagged-key string.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("unknown algorithm tag: {tag:?}")]
    UnknownAlgorithmTag { tag: String },

    /// The primitive for this algorithm is not compiled in or could not be built.
    #[error("signature backend unavailable: {algorithm}")]
    BackendUnavailable { algorithm: Algorithm },

    #[error("{algorithm} signing failed: {reason}")]
    Sign { algorithm: Algorithm, reason: String },

    #[error("malformed {field} for {algorithm}: expected {expected}, got {got} bytes")]
    MalformedInput {
        algorithm: Algorithm,
        field: &'static str,
        expected: String,
        got: usize,
    },

    #[error("invalid payload: {0}")]
    Payload(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CryptoError {
    /// True for errors that mean the message itself could not be parsed,
    /// as opposed to a broken local identity.
    pub fn is_wire_error(&self) -> bool {
        matches!(
            self,
            CryptoError::Decode(_)
                | CryptoError::UnknownAlgorithmTag { .. }
                | CryptoError::MalformedInput { .. }
                | CryptoError::Payload(_)
        )
    }
}

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        CryptoError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
