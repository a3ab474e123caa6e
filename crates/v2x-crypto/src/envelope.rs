//! Signed envelope: payload, signature and sender certificate travelling
//! together.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canonical::Canonical;
use crate::certificate::Certificate;
use crate::error::Result;
use crate::identity::Identity;
use crate::payload::Payload;
use crate::registry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub payload: Payload,
    pub signature: Vec<u8>,
    pub certificate: Certificate,
    /// Generation time at the sender, milliseconds.
    pub timestamp_ms: i64,
}

impl SignedEnvelope {
    /// Sign `payload` with `identity` and attach its certificate.
    pub fn seal(identity: &Identity, payload: impl Into<Payload>, timestamp_ms: i64) -> Result<Self> {
        let payload = payload.into();
        let signature = identity.sign_canonical(&payload)?;
        debug!(
            subject = %identity.subject_id(),
            kind = payload.kind(),
            sequence = payload.sequence(),
            signature_len = signature.len(),
            "sealed envelope"
        );
        Ok(Self {
            payload,
            signature,
            certificate: identity.certificate().clone(),
            timestamp_ms,
        })
    }

    /// Check the signature against the enclosed certificate.
    ///
    /// `Ok(false)` means the payload is not authentic; `Err` means the
    /// envelope could not be checked at all (bad key or signature shape,
    /// missing backend).
    pub fn verify(&self) -> Result<bool> {
        let message = self.payload.canonical_bytes();
        registry::verify(
            self.certificate.algorithm(),
            &message,
            &self.signature,
            &self.certificate.public_key,
        )
    }

    pub fn sender(&self) -> &str {
        &self.certificate.subject_id
    }

    pub fn sequence(&self) -> i64 {
        self.payload.sequence()
    }

    /// Estimated on-air size: payload body, signature and certificate.
    pub fn estimated_wire_len(&self) -> usize {
        self.payload.estimated_wire_len() + self.signature.len() + self.certificate.wire_len()
    }

    /// Saturates; the timestamp is whatever the sender put on the wire.
    pub fn delay_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}
