//! Dilithium2 backend. Signatures have a single fixed length.

use pqcrypto_dilithium::dilithium2;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

use crate::algorithm::Algorithm;
use crate::error::{CryptoError, Result};

const ALGORITHM: Algorithm = Algorithm::Dilithium2;

pub(crate) fn generate() -> Result<(Vec<u8>, Vec<u8>)> {
    let (pk, sk) = dilithium2::keypair();
    Ok((pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
}

pub(crate) fn sign(message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
    let sk = dilithium2::SecretKey::from_bytes(secret_key).map_err(|e| CryptoError::Sign {
        algorithm: ALGORITHM,
        reason: format!("invalid secret key: {e:?}"),
    })?;
    Ok(dilithium2::detached_sign(message, &sk).as_bytes().to_vec())
}

fn malformed(field: &'static str, expected: usize, got: usize) -> CryptoError {
    CryptoError::MalformedInput {
        algorithm: ALGORITHM,
        field,
        expected: expected.to_string(),
        got,
    }
}

pub(crate) fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
    let sig_len = dilithium2::signature_bytes();
    let pk_len = dilithium2::public_key_bytes();
    if signature.len() != sig_len {
        return Err(malformed("signature", sig_len, signature.len()));
    }
    if public_key.len() != pk_len {
        return Err(malformed("public key", pk_len, public_key.len()));
    }

    let sig = dilithium2::DetachedSignature::from_bytes(signature)
        .map_err(|_| malformed("signature", sig_len, signature.len()))?;
    let pk = dilithium2::PublicKey::from_bytes(public_key)
        .map_err(|_| malformed("public key", pk_len, public_key.len()))?;

    Ok(dilithium2::verify_detached_signature(&sig, message, &pk).is_ok())
}
