//! ECDSA P-256 backend.
//!
//! Keys are DER encoded (SubjectPublicKeyInfo / PKCS#8). Signatures are the
//! fixed 64-byte `r || s` form computed over SHA-256 of the message; the DER
//! signature encoding is never produced or accepted.

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rand_core::OsRng;
use tracing::debug;

use crate::algorithm::Algorithm;
use crate::error::{CryptoError, Result};

const ALGORITHM: Algorithm = Algorithm::EcdsaP256;

/// DER SubjectPublicKeyInfo length for an uncompressed P-256 point.
pub(crate) const PUBLIC_KEY_LEN: usize = 91;
/// Raw `r || s` signature length.
pub(crate) const SIGNATURE_LEN: usize = 64;

pub(crate) fn generate() -> Result<(Vec<u8>, Vec<u8>)> {
    let signing_key = SigningKey::random(&mut OsRng);

    let public_der = signing_key
        .verifying_key()
        .to_public_key_der()
        .map_err(|e| {
            debug!(error = %e, "P-256 public key encoding failed");
            CryptoError::BackendUnavailable { algorithm: ALGORITHM }
        })?;
    let secret_der = signing_key.to_pkcs8_der().map_err(|e| {
        debug!(error = %e, "P-256 private key encoding failed");
        CryptoError::BackendUnavailable { algorithm: ALGORITHM }
    })?;

    Ok((public_der.as_bytes().to_vec(), secret_der.as_bytes().to_vec()))
}

pub(crate) fn sign(message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
    let signing_key = SigningKey::from_pkcs8_der(secret_key).map_err(|e| CryptoError::Sign {
        algorithm: ALGORITHM,
        reason: format!("invalid PKCS#8 private key: {e}"),
    })?;
    let signature: Signature = signing_key.try_sign(message).map_err(|e| CryptoError::Sign {
        algorithm: ALGORITHM,
        reason: e.to_string(),
    })?;
    Ok(signature.to_bytes().to_vec())
}

pub(crate) fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::MalformedInput {
            algorithm: ALGORITHM,
            field: "signature",
            expected: SIGNATURE_LEN.to_string(),
            got: signature.len(),
        });
    }
    if public_key.len() != PUBLIC_KEY_LEN {
        return Err(CryptoError::MalformedInput {
            algorithm: ALGORITHM,
            field: "public key",
            expected: PUBLIC_KEY_LEN.to_string(),
            got: public_key.len(),
        });
    }

    // Right size but not a curve point or valid scalar: the message is
    // disproven, not unparseable.
    let verifying_key = match VerifyingKey::from_public_key_der(public_key) {
        Ok(key) => key,
        Err(e) => {
            debug!(error = %e, "P-256 public key does not decode");
            return Ok(false);
        }
    };
    let signature = match Signature::from_slice(signature) {
        Ok(sig) => sig,
        Err(_) => return Ok(false),
    };

    Ok(verifying_key.verify(message, &signature).is_ok())
}
