//! Property-based tests for codecs, canonical encoding and signatures.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::algorithm::Algorithm;
    use crate::canonical::Canonical;
    use crate::codec::{build_tagged_key, from_hex, to_hex, TaggedKey};
    use crate::payload::{LaneSelector, SafetyMessage, Warning};
    use crate::registry::{generate_keypair, verify};

    fn any_algorithm() -> impl Strategy<Value = Algorithm> {
        prop_oneof![
            Just(Algorithm::EcdsaP256),
            Just(Algorithm::Falcon512),
            Just(Algorithm::Dilithium2),
        ]
    }

    fn finite_f64() -> impl Strategy<Value = f64> {
        prop::num::f64::NORMAL | prop::num::f64::ZERO
    }

    proptest! {
        #[test]
        fn test_hex_round_trip(bytes in any::<Vec<u8>>()) {
            let encoded = to_hex(&bytes);
            prop_assert_eq!(encoded.len(), bytes.len() * 2);
            prop_assert!(encoded.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            prop_assert_eq!(from_hex(&encoded).unwrap(), bytes);
        }

        #[test]
        fn test_tagged_key_round_trip(alg in any_algorithm(), bytes in any::<Vec<u8>>()) {
            let wire = build_tagged_key(alg, &bytes);
            let parsed = TaggedKey::parse(&wire, None).unwrap();
            prop_assert_eq!(parsed.algorithm, alg);
            prop_assert_eq!(parsed.bytes, bytes);
        }

        #[test]
        fn test_safety_message_encoding_deterministic(
            id in any::<i32>(),
            lat in finite_f64(),
            lon in finite_f64(),
            heading in finite_f64(),
            speed in finite_f64(),
        ) {
            let a = SafetyMessage { message_id: id, latitude: lat, longitude: lon, heading, speed };
            let b = a.clone();
            prop_assert_eq!(a.canonical_bytes(), b.canonical_bytes());

            // Floats survive the text form exactly.
            let text = String::from_utf8(a.canonical_bytes().to_vec()).unwrap();
            let fields: Vec<&str> = text.split(',').collect();
            prop_assert_eq!(fields.len(), 5);
            prop_assert_eq!(fields[1].parse::<f64>().unwrap(), lat);
            prop_assert_eq!(fields[4].parse::<f64>().unwrap(), speed);
        }

        #[test]
        fn test_warning_encoding_field_count(
            counter in any::<i32>(),
            lane in any::<i32>(),
            approach in any::<bool>(),
            lat in any::<i64>(),
            temp in "[0-9a-f]{0,16}",
        ) {
            let w = Warning {
                message_counter: counter,
                intersection_id: 1,
                lane: if approach { LaneSelector::Approach(lane) } else { LaneSelector::Lane(lane) },
                event_flag: 0,
                source_x: 1.0,
                source_y: 2.0,
                coarse_lat: lat,
                coarse_lon: -lat.saturating_abs(),
                temporary_id: temp,
            };
            let text = String::from_utf8(w.canonical_bytes().to_vec()).unwrap();
            prop_assert_eq!(text.split(',').count(), 10);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn test_sign_verify_and_tamper(
            alg in any_algorithm(),
            message in prop::collection::vec(any::<u8>(), 1..256),
            flip in any::<prop::sample::Index>(),
        ) {
            let kp = generate_keypair(alg).unwrap();
            let sig = kp.sign(&message).unwrap();
            prop_assert!(verify(alg, &message, &sig, kp.public_key()).unwrap());

            let mut bad_message = message.clone();
            let i = flip.index(bad_message.len());
            bad_message[i] ^= 0x01;
            prop_assert!(!verify(alg, &bad_message, &sig, kp.public_key()).unwrap());

            let mut bad_sig = sig.clone();
            let i = flip.index(bad_sig.len());
            bad_sig[i] ^= 0x01;
            // A flipped byte may also make the signature unparseable; it must
            // never verify.
            prop_assert!(!verify(alg, &message, &bad_sig, kp.public_key()).unwrap_or(false));
        }
    }
}
