//! Hex and tagged-key codecs.
//!
//! Keys travel as self-describing strings of the form `ALG:<tag>:<hex>`.
//! Older peers send bare hex or `0x<hex>`; those are still accepted on
//! read, with the algorithm inferred from context (usually the
//! certificate label), but are never produced on write.

use std::fmt;

use crate::algorithm::Algorithm;
use crate::error::{CryptoError, Result};

const TAG_PREFIX: &str = "ALG:";

/// Lowercase hex, two digits per byte, no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex, tolerating a leading `0x`.
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(strip_0x(s.trim()))?)
}

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Split a key string into its optional algorithm tag and hex payload.
///
/// The `ALG:` prefix is matched case-insensitively and the tag runs up to
/// the *last* colon. The returned tag is not validated here.
pub fn strip_tag_prefix(s: &str) -> Result<(Option<&str>, &str)> {
    let s = s.trim();
    match s.get(..TAG_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(TAG_PREFIX) => {
            let rest = &s[TAG_PREFIX.len()..];
            let split = rest
                .rfind(':')
                .ok_or_else(|| CryptoError::Decode(format!("tagged key without payload: {s:.24}")))?;
            Ok((Some(&rest[..split]), &rest[split + 1..]))
        }
        _ => Ok((None, strip_0x(s))),
    }
}

/// Always emits the explicit `ALG:<tag>:<hex>` form.
pub fn build_tagged_key(algorithm: Algorithm, bytes: &[u8]) -> String {
    format!("{TAG_PREFIX}{}:{}", algorithm.tag(), to_hex(bytes))
}

/// An algorithm tag together with raw key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct TaggedKey {
    pub algorithm: Algorithm,
    pub bytes: Vec<u8>,
}

impl TaggedKey {
    pub fn new(algorithm: Algorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// Parse a tagged key.
    ///
    /// When the string carries no tag, `context` supplies the algorithm;
    /// with neither, parsing fails with an empty `UnknownAlgorithmTag`.
    pub fn parse(s: &str, context: Option<Algorithm>) -> Result<Self> {
        let (tag, payload) = strip_tag_prefix(s)?;
        let algorithm = match (tag, context) {
            (Some(tag), _) => Algorithm::from_tag(tag)?,
            (None, Some(algorithm)) => algorithm,
            (None, None) => {
                return Err(CryptoError::UnknownAlgorithmTag { tag: String::new() });
            }
        };
        let bytes = hex::decode(payload)?;
        Ok(Self { algorithm, bytes })
    }

    pub fn to_wire(&self) -> String {
        build_tagged_key(self.algorithm, &self.bytes)
    }
}

impl fmt::Debug for TaggedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedKey")
            .field("algorithm", &self.algorithm)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Attach the algorithm named by a certificate label to a raw hex key.
///
/// Keys that already carry a tag are returned unchanged.
pub fn prefix_key_with_label(raw_hex: &str, label: &str) -> String {
    match strip_tag_prefix(raw_hex) {
        Ok((Some(_), _)) => raw_hex.trim().to_string(),
        Ok((None, payload)) => format!(
            "{TAG_PREFIX}{}:{}",
            Algorithm::from_label(label).tag(),
            payload.to_ascii_lowercase()
        ),
        // Malformed `ALG:` strings are left for the parser to reject.
        Err(_) => raw_hex.trim().to_string(),
    }
}

/// The algorithm a tagged key string declares, if it declares one.
pub fn algorithm_of_tagged_key(s: &str) -> Result<Option<Algorithm>> {
    match strip_tag_prefix(s)? {
        (Some(tag), _) => Ok(Some(Algorithm::from_tag(tag)?)),
        (None, _) => Ok(None),
    }
}
