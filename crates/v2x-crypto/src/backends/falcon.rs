//! Falcon-512 backend.
//!
//! Falcon signatures are variable length; anything up to the scheme
//! maximum is structurally acceptable.

use pqcrypto_falcon::falcon512;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

use crate::algorithm::Algorithm;
use crate::error::{CryptoError, Result};

const ALGORITHM: Algorithm = Algorithm::Falcon512;

pub(crate) fn generate() -> Result<(Vec<u8>, Vec<u8>)> {
    let (pk, sk) = falcon512::keypair();
    Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
}

pub(crate) fn sign(message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
    let sk = falcon512::SecretKey::from_bytes(secret_key).map_err(|e| CryptoError::Sign {
        algorithm: ALGORITHM,
        reason: format!("invalid secret key: {e:?}"),
    })?;
    let signature = falcon512::detached_sign(message, &sk);
    Ok(signature.as_bytes().to_vec())
}

pub(crate) fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
    let max_sig = falcon512::signature_bytes();
    if signature.is_empty() || signature.len() > max_sig {
        return Err(CryptoError::MalformedInput {
            algorithm: ALGORITHM,
            field: "signature",
            expected: format!("1..={max_sig}"),
            got: signature.len(),
        });
    }
    if public_key.len() != falcon512::public_key_bytes() {
        return Err(CryptoError::MalformedInput {
            algorithm: ALGORITHM,
            field: "public key",
            expected: falcon512::public_key_bytes().to_string(),
            got: public_key.len(),
        });
    }

    let sig = falcon512::DetachedSignature::from_bytes(signature).map_err(|_| {
        CryptoError::MalformedInput {
            algorithm: ALGORITHM,
            field: "signature",
            expected: format!("1..={max_sig}"),
            got: signature.len(),
        }
    })?;
    let pk = falcon512::PublicKey::from_bytes(public_key).map_err(|_| {
        CryptoError::MalformedInput {
            algorithm: ALGORITHM,
            field: "public key",
            expected: falcon512::public_key_bytes().to_string(),
            got: public_key.len(),
        }
    })?;

    Ok(falcon512::verify_detached_signature(&sig, message, &pk).is_ok())
}
