//! Receive-side error types.

use thiserror::Error;
use v2x_crypto::CryptoError;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("malformed envelope: {0}")]
    Envelope(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SecurityError>;
