//! Concrete signature primitives.
//!
//! Each backend exposes the same three free functions (`generate`, `sign`,
//! `verify`) over raw byte buffers. A backend whose cargo feature is off is
//! replaced by a stub that reports [`CryptoError::BackendUnavailable`].

#[cfg(any(not(feature = "ecdsa"), not(feature = "falcon"), not(feature = "dilithium")))]
macro_rules! unavailable_backend {
    ($algorithm:expr) => {
        use crate::algorithm::Algorithm;
        use crate::error::{CryptoError, Result};

        const ALGORITHM: Algorithm = $algorithm;

        pub(crate) fn generate() -> Result<(Vec<u8>, Vec<u8>)> {
            Err(CryptoError::BackendUnavailable { algorithm: ALGORITHM })
        }

        pub(crate) fn sign(_message: &[u8], _secret_key: &[u8]) -> Result<Vec<u8>> {
            Err(CryptoError::BackendUnavailable { algorithm: ALGORITHM })
        }

        pub(crate) fn verify(_message: &[u8], _signature: &[u8], _public_key: &[u8]) -> Result<bool> {
            Err(CryptoError::BackendUnavailable { algorithm: ALGORITHM })
        }
    };
}

#[cfg(feature = "ecdsa")]
pub(crate) mod ecdsa;
#[cfg(not(feature = "ecdsa"))]
pub(crate) mod ecdsa {
    unavailable_backend!(Algorithm::EcdsaP256);
}

#[cfg(feature = "falcon")]
pub(crate) mod falcon;
#[cfg(not(feature = "falcon"))]
pub(crate) mod falcon {
    unavailable_backend!(Algorithm::Falcon512);
}

#[cfg(feature = "dilithium")]
pub(crate) mod dilithium;
#[cfg(not(feature = "dilithium"))]
pub(crate) mod dilithium {
    unavailable_backend!(Algorithm::Dilithium2);
}
