//! Signing identity: a key pair plus the certificate advertising it.
//!
//! Built once per node at startup and kept for the session. The private key
//! never leaves this struct except through signing.

use tracing::info;

use crate::algorithm::Algorithm;
use crate::canonical::Canonical;
use crate::certificate::Certificate;
use crate::config::IdentityConfig;
use crate::error::Result;
use crate::registry::{generate_keypair, KeyPair};

#[derive(Debug)]
pub struct Identity {
    keypair: KeyPair,
    certificate: Certificate,
}

impl Identity {
    /// Generate a fresh key pair with the configured algorithm and issue the
    /// matching certificate.
    pub fn generate(config: &IdentityConfig) -> Result<Self> {
        config.validate()?;
        let keypair = generate_keypair(config.algorithm)?;
        let certificate = Certificate::for_keypair(config.subject_id.clone(), &keypair)
            .with_validity(config.not_before, config.not_after);

        info!(
            subject = %certificate.subject_id,
            algorithm = %config.algorithm,
            fingerprint = %certificate.short_fingerprint(),
            "identity initialized"
        );

        Ok(Self {
            keypair,
            certificate,
        })
    }

    pub fn subject_id(&self) -> &str {
        &self.certificate.subject_id
    }

    pub fn algorithm(&self) -> Algorithm {
        self.keypair.algorithm()
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn public_tagged_key(&self) -> String {
        self.keypair.public_tagged()
    }

    /// Sign raw bytes.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.keypair.sign(message)
    }

    /// Sign the canonical encoding of `value`.
    pub fn sign_canonical<T: Canonical + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        self.sign(&value.canonical_bytes())
    }
}
