//! Canonical encoding of payloads.
//!
//! The bytes produced here are exactly what gets signed and verified, so
//! field order and number formatting are a wire contract: integers render as
//! decimal, floats use Rust's shortest round-trip `Display` form, and fields
//! are joined with `,`. Only sender-asserted fields are included; anything a
//! receiver derives (reception time, distance, byte length) stays out.

use std::fmt::{self, Write as _};

use bytes::{BufMut, Bytes, BytesMut};

use crate::payload::{Payload, SafetyMessage, Warning};

/// Comma-joined field builder.
#[derive(Clone, Debug, Default)]
pub struct CanonicalEncoder {
    buf: BytesMut,
    fields: usize,
}

impl CanonicalEncoder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(128),
            fields: 0,
        }
    }

    fn separator(&mut self) {
        if self.fields > 0 {
            self.buf.put_u8(b',');
        }
        self.fields += 1;
    }

    fn append_display(&mut self, v: impl fmt::Display) -> &mut Self {
        self.separator();
        // Writing into BytesMut cannot fail.
        let _ = write!(self.buf, "{v}");
        self
    }

    pub fn append_int(&mut self, v: i64) -> &mut Self {
        self.append_display(v)
    }

    pub fn append_float(&mut self, v: f64) -> &mut Self {
        self.append_display(v)
    }

    pub fn append_str(&mut self, s: &str) -> &mut Self {
        self.separator();
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Types with a canonical signing form.
pub trait Canonical {
    fn encode_canonical(&self, enc: &mut CanonicalEncoder);

    fn canonical_bytes(&self) -> Bytes {
        let mut enc = CanonicalEncoder::new();
        self.encode_canonical(&mut enc);
        enc.finish()
    }
}

impl Canonical for SafetyMessage {
    fn encode_canonical(&self, enc: &mut CanonicalEncoder) {
        enc.append_int(i64::from(self.message_id))
            .append_float(self.latitude)
            .append_float(self.longitude)
            .append_float(self.heading)
            .append_float(self.speed);
    }
}

impl Canonical for Warning {
    fn encode_canonical(&self, enc: &mut CanonicalEncoder) {
        enc.append_int(i64::from(self.message_counter))
            .append_int(i64::from(self.intersection_id))
            .append_int(i64::from(self.lane.approach_code()))
            .append_int(i64::from(self.lane.lane_code()))
            .append_int(i64::from(self.event_flag))
            .append_float(self.source_x)
            .append_float(self.source_y)
            .append_int(self.coarse_lat)
            .append_int(self.coarse_lon)
            .append_str(&self.temporary_id);
    }
}

impl Canonical for Payload {
    fn encode_canonical(&self, enc: &mut CanonicalEncoder) {
        match self {
            Payload::SafetyMessage(m) => m.encode_canonical(enc),
            Payload::Warning(w) => w.encode_canonical(enc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::LaneSelector;

    fn bsm() -> SafetyMessage {
        SafetyMessage {
            message_id: 7,
            latitude: 1234.5,
            longitude: -0.1,
            heading: std::f64::consts::FRAC_PI_2,
            speed: 0.0,
        }
    }

    fn warning() -> Warning {
        Warning {
            message_counter: 255,
            intersection_id: 12,
            lane: LaneSelector::Approach(3),
            event_flag: 1,
            source_x: 10.25,
            source_y: 3.0,
            coarse_lat: 10_250_000,
            coarse_lon: -3_000_000,
            temporary_id: "a1b2".into(),
        }
    }

    #[test]
    fn test_safety_message_encoding() {
        assert_eq!(
            &bsm().canonical_bytes()[..],
            b"7,1234.5,-0.1,1.5707963267948966,0"
        );
    }

    #[test]
    fn test_warning_encoding() {
        assert_eq!(
            &warning().canonical_bytes()[..],
            b"255,12,3,-1,1,10.25,3,10250000,-3000000,a1b2"
        );
    }

    #[test]
    fn test_payload_delegates() {
        let p = Payload::Warning(warning());
        assert_eq!(p.canonical_bytes(), warning().canonical_bytes());
    }

    #[test]
    fn test_independent_encoders_agree() {
        let a = bsm().canonical_bytes();
        let b = bsm().canonical_bytes();
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_field_change_changes_encoding() {
        let base = warning().canonical_bytes();
        let mut w = warning();
        w.lane = LaneSelector::Lane(3);
        assert_ne!(w.canonical_bytes(), base);

        let mut m = bsm();
        m.speed = 0.5;
        assert_ne!(m.canonical_bytes(), bsm().canonical_bytes());
    }

    #[test]
    fn test_encoder_separators() {
        let mut enc = CanonicalEncoder::new();
        enc.append_int(1).append_str("x").append_float(2.5);
        assert_eq!(enc.as_bytes(), b"1,x,2.5");

        assert!(CanonicalEncoder::new().finish().is_empty());
    }
}
