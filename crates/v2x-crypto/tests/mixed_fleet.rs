//! Integration tests: peers on different signature schemes sharing one channel.

use v2x_crypto::codec::{prefix_key_with_label, to_hex};
use v2x_crypto::registry::{verify, verify_tagged};
use v2x_crypto::{
    Algorithm, Canonical, CryptoError, Identity, IdentityConfig, LaneSelector, Payload,
    SafetyMessage, SignedEnvelope, Warning,
};

fn fleet() -> Vec<Identity> {
    Algorithm::ALL
        .iter()
        .enumerate()
        .map(|(i, alg)| {
            Identity::generate(&IdentityConfig::new(format!("car[{i}]"), *alg))
                .expect("identity generation")
        })
        .collect()
}

fn bsm(id: i32, x: f64) -> SafetyMessage {
    SafetyMessage {
        message_id: id,
        latitude: x,
        longitude: 12.0,
        heading: 0.0,
        speed: 13.5,
    }
}

#[test]
fn test_every_peer_verifies_every_other_peer() {
    let fleet = fleet();
    let envelopes: Vec<SignedEnvelope> = fleet
        .iter()
        .enumerate()
        .map(|(i, id)| SignedEnvelope::seal(id, bsm(i as i32, 10.0 * i as f64), 0).unwrap())
        .collect();

    // Receivers hold no per-sender state: the certificate alone selects the scheme.
    for _receiver in &fleet {
        for env in &envelopes {
            assert!(env.verify().unwrap(), "{}", env.certificate.algorithm_label);
        }
    }
}

#[test]
fn test_legacy_receiver_path_via_raw_key_and_label() {
    for id in fleet() {
        let env = SignedEnvelope::seal(&id, bsm(5, 1.0), 0).unwrap();
        let raw = to_hex(&env.certificate.public_key);
        let tagged = prefix_key_with_label(&raw, &env.certificate.algorithm_label);
        let message = env.payload.canonical_bytes();
        assert!(verify_tagged(&message, &env.signature, &tagged, None).unwrap());
    }
}

#[test]
fn test_altered_public_key_never_verifies() {
    for id in fleet() {
        let env = SignedEnvelope::seal(&id, bsm(6, 2.0), 0).unwrap();
        let message = env.payload.canonical_bytes();
        let mut pk = env.certificate.public_key.clone();
        let last = pk.len() - 1;
        pk[last] ^= 0x01;
        let outcome = verify(id.algorithm(), &message, &env.signature, &pk);
        assert!(!outcome.unwrap_or(false), "{}", id.algorithm());
    }
}

#[test]
fn test_label_mismatch_is_error_or_false() {
    // A Falcon signature presented under an ECDSA label must not pass.
    let falcon = Identity::generate(&IdentityConfig::new("car[9]", Algorithm::Falcon512)).unwrap();
    let mut env = SignedEnvelope::seal(&falcon, bsm(1, 0.0), 0).unwrap();
    env.certificate.algorithm_label = "ECDSA P-256".into();
    assert!(matches!(env.verify(), Err(CryptoError::MalformedInput { .. })));
}

#[test]
fn test_roadside_warning_from_trigger() {
    let rsu = Identity::generate(&IdentityConfig::new("rsu[0]", Algorithm::Dilithium2)).unwrap();
    let mut warning = Warning::from_trigger_json(
        r#"{"msgCnt": 257, "id": "0badc0de", "intersectionID": {"id": 4},
            "laneNumber": {"choice": "lane", "value": 1}, "eventFlag": 1}"#,
    )
    .unwrap();
    warning.stamp_position(120.0, 80.0);
    assert_eq!(warning.lane, LaneSelector::Lane(1));

    let env = SignedEnvelope::seal(&rsu, warning, 100).unwrap();
    assert!(env.verify().unwrap());
    assert_eq!(env.sequence(), 257);

    let Payload::Warning(w) = &env.payload else {
        panic!("expected a warning payload");
    };
    assert_eq!(w.coarse_position(), (120.0, 80.0));
}
