//! Algorithm registry: uniform keygen/sign/verify over every backend.
//!
//! Dispatch is an exhaustive match on [`Algorithm`]; callers holding tagged
//! key strings go through [`sign_tagged`] / [`verify_tagged`], which resolve
//! the algorithm from the key itself so that peers using different schemes
//! can share a channel.

use std::fmt;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::algorithm::Algorithm;
use crate::backends::{dilithium, ecdsa, falcon};
use crate::codec::{build_tagged_key, TaggedKey};
use crate::error::Result;

/// A signing key pair for one identity.
///
/// Private key bytes are zeroized when the pair is dropped and never appear
/// in `Debug` output.
#[derive(Clone)]
pub struct KeyPair {
    algorithm: Algorithm,
    public_key: Vec<u8>,
    private_key: Zeroizing<Vec<u8>>,
}

impl KeyPair {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// `ALG:<tag>:<hex>` form of the public key.
    pub fn public_tagged(&self) -> String {
        build_tagged_key(self.algorithm, &self.public_key)
    }

    /// `ALG:<tag>:<hex>` form of the private key.
    pub fn private_tagged(&self) -> Zeroizing<String> {
        Zeroizing::new(build_tagged_key(self.algorithm, &self.private_key))
    }

    /// Sign with this pair's own algorithm.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        sign(self.algorithm, message, &self.private_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm)
            .field("public_key_len", &self.public_key.len())
            .field("private_key_len", &self.private_key.len())
            .finish()
    }
}

/// Generate a fresh key pair.
///
/// Fails with `BackendUnavailable` when the algorithm's primitive is not
/// built into this binary.
pub fn generate_keypair(algorithm: Algorithm) -> Result<KeyPair> {
    let (public_key, private_key) = match algorithm {
        Algorithm::EcdsaP256 => ecdsa::generate()?,
        Algorithm::Falcon512 => falcon::generate()?,
        Algorithm::Dilithium2 => dilithium::generate()?,
    };

    info!(
        algorithm = %algorithm,
        public_key_len = public_key.len(),
        private_key_len = private_key.len(),
        "generated signing key pair"
    );

    Ok(KeyPair {
        algorithm,
        public_key,
        private_key: Zeroizing::new(private_key),
    })
}

pub fn sign(algorithm: Algorithm, message: &[u8], private_key: &[u8]) -> Result<Vec<u8>> {
    let signature = match algorithm {
        Algorithm::EcdsaP256 => ecdsa::sign(message, private_key)?,
        Algorithm::Falcon512 => falcon::sign(message, private_key)?,
        Algorithm::Dilithium2 => dilithium::sign(message, private_key)?,
    };
    debug!(algorithm = %algorithm, message_len = message.len(), signature_len = signature.len(), "signed");
    Ok(signature)
}

/// Verify a signature.
///
/// A mismatching signature yields `Ok(false)`. Errors are reserved for
/// structurally invalid input and missing backends.
pub fn verify(
    algorithm: Algorithm,
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
) -> Result<bool> {
    let valid = match algorithm {
        Algorithm::EcdsaP256 => ecdsa::verify(message, signature, public_key)?,
        Algorithm::Falcon512 => falcon::verify(message, signature, public_key)?,
        Algorithm::Dilithium2 => dilithium::verify(message, signature, public_key)?,
    };
    debug!(algorithm = %algorithm, valid, "verified");
    Ok(valid)
}

/// Sign with the algorithm named by a tagged private key.
pub fn sign_tagged(message: &[u8], private_key: &str) -> Result<Vec<u8>> {
    let TaggedKey { algorithm, bytes } = TaggedKey::parse(private_key, None)?;
    let bytes = Zeroizing::new(bytes);
    sign(algorithm, message, &bytes)
}

/// Verify against a tagged public key.
///
/// The key's own tag decides the algorithm; an untagged (legacy) key falls
/// back to the certificate `label`. Without either the key is rejected.
pub fn verify_tagged(
    message: &[u8],
    signature: &[u8],
    public_key: &str,
    label: Option<&str>,
) -> Result<bool> {
    let key = TaggedKey::parse(public_key, label.map(Algorithm::from_label))?;
    verify(key.algorithm, message, signature, &key.bytes)
}
