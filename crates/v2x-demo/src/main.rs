#![forbid(unsafe_code)]

//! Drives a mixed-algorithm fleet and a roadside unit over a lossy broadcast
//! channel into a single receiver, then prints delivery statistics.
//!
//! Usage: `v2x-demo [scenario.toml]`

mod channel;
mod config;

use std::path::Path;

use anyhow::{Context, Result};
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use v2x_crypto::codec::to_hex;
use v2x_crypto::{Algorithm, Identity, IdentityConfig, SafetyMessage, SignedEnvelope, Warning};
use v2x_security::{Coord, Receiver};

use crate::channel::LossyChannel;
use crate::config::{DemoConfig, RoadsideConfig, VehicleConfig};

struct Vehicle {
    config: VehicleConfig,
    identity: Identity,
}

impl Vehicle {
    fn new(config: &VehicleConfig) -> Result<Self> {
        let identity = Identity::generate(&IdentityConfig::new(&config.subject_id, config.algorithm))
            .with_context(|| format!("failed to create identity for {}", config.subject_id))?;
        Ok(Self {
            config: config.clone(),
            identity,
        })
    }

    fn position(&self, elapsed_s: f64) -> Coord {
        let travelled = self.config.speed_mps * elapsed_s;
        Coord::new(
            self.config.start.x + travelled * self.config.heading_rad.cos(),
            self.config.start.y + travelled * self.config.heading_rad.sin(),
        )
    }

    fn beacon(&self, tick: u32, now_ms: i64) -> Result<SignedEnvelope> {
        let position = self.position(now_ms as f64 / 1000.0);
        let message = SafetyMessage {
            message_id: (tick % 256) as i32,
            latitude: position.x,
            longitude: position.y,
            heading: self.config.heading_rad,
            speed: self.config.speed_mps,
        };
        Ok(SignedEnvelope::seal(&self.identity, message, now_ms)?)
    }
}

struct Roadside {
    config: RoadsideConfig,
    identity: Identity,
    counter: u32,
}

impl Roadside {
    fn new(config: &RoadsideConfig) -> Result<Self> {
        let identity = Identity::generate(&IdentityConfig::new(&config.subject_id, config.algorithm))
            .with_context(|| format!("failed to create identity for {}", config.subject_id))?;
        Ok(Self {
            config: config.clone(),
            identity,
            counter: 0,
        })
    }

    /// Build a warning the way an intersection controller triggers one.
    fn warning(&mut self, now_ms: i64, rng: &mut impl RngCore) -> Result<SignedEnvelope> {
        let mut temporary_id = [0u8; 4];
        rng.fill_bytes(&mut temporary_id);
        let trigger = serde_json::json!({
            "msgCnt": self.counter % 256,
            "id": to_hex(&temporary_id),
            "intersectionID": { "id": self.config.intersection_id },
            "laneNumber": { "choice": "approach", "value": 2 },
            "eventFlag": 1,
        });
        self.counter = self.counter.wrapping_add(1);

        let mut warning = Warning::from_trigger_json(&trigger.to_string())?;
        let position = self.config.position;
        warning.source_x = position.x;
        warning.source_y = position.y;
        warning.stamp_position(position.x, position.y);
        Ok(SignedEnvelope::seal(&self.identity, warning, now_ms)?)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load_from_file(Path::new(&path))?,
        None => DemoConfig::default(),
    };
    run(&config)
}

fn run(config: &DemoConfig) -> Result<()> {
    let vehicles = config
        .vehicles
        .iter()
        .map(Vehicle::new)
        .collect::<Result<Vec<_>>>()?;
    let mut roadside = config.roadside.as_ref().map(Roadside::new).transpose()?;

    println!("== identities");
    for identity in vehicles
        .iter()
        .map(|v| &v.identity)
        .chain(roadside.iter().map(|r| &r.identity))
    {
        let cert = identity.certificate();
        println!(
            "{:<10} {:<12} pk={:>5}B cert={:>5}B fp={}",
            identity.subject_id(),
            identity.algorithm().label(),
            cert.public_key.len(),
            cert.wire_len(),
            cert.short_fingerprint(),
        );
    }

    let channel = LossyChannel::new(
        config.loss_probability,
        config.base_latency_ms,
        config.bitrate_bps,
    );
    let mut receiver = Receiver::new(config.receiver, config.accounting.clone())?;
    let mut rng = rand::thread_rng();
    let (mut sent, mut lost) = (0u64, 0u64);

    info!(
        ticks = config.ticks,
        senders = vehicles.len() + usize::from(roadside.is_some()),
        loss_probability = config.loss_probability,
        "starting broadcast"
    );

    for tick in 0..config.ticks {
        let now_ms = i64::from(tick) * config.interval_ms;

        let mut outbox = Vec::with_capacity(vehicles.len() + 1);
        for vehicle in &vehicles {
            outbox.push(vehicle.beacon(tick, now_ms)?);
        }
        if let Some(rsu) = roadside.as_mut() {
            if tick % rsu.config.warning_every == 0 {
                outbox.push(rsu.warning(now_ms, &mut rng)?);
            }
        }

        for envelope in outbox {
            sent += 1;
            if !channel.delivers(&mut rng) {
                lost += 1;
                continue;
            }
            let arrival_ms = now_ms + channel.latency_ms(envelope.estimated_wire_len());
            let json = serde_json::to_string(&envelope)?;
            if let Err(e) = receiver.receive_json(&json, arrival_ms) {
                warn!(error = %e, "reception failed");
            }
        }
    }

    report(&receiver, sent, lost);
    Ok(())
}

fn report(receiver: &Receiver, sent: u64, lost: u64) {
    let stats = receiver.stats();
    println!();
    println!("== channel");
    println!(
        "sent={sent} lost={lost} received={} verified={} rejected={} dropped={}",
        stats.received, stats.verified, stats.rejected, stats.dropped
    );

    println!();
    println!("== per algorithm");
    for algorithm in Algorithm::ALL {
        let Some(s) = stats.for_algorithm(algorithm) else {
            continue;
        };
        println!(
            "{:<12} rx={:>5} ok={:>5} sig={:>5}B wire={:>5}B verify={:>8.1}us",
            algorithm.label(),
            s.received,
            s.verified,
            s.mean_signature_len(),
            s.mean_wire_len(),
            s.mean_verify_time().as_secs_f64() * 1e6,
        );
    }

    println!();
    println!("== per peer");
    for peer in receiver.tracker().summary() {
        println!(
            "{:<10} received={:>5} expected={:>5} verified={:>5} pdr={:.3}",
            peer.peer, peer.received, peer.expected, peer.verified, peer.pdr
        );
    }

    println!();
    println!("== pdr by distance");
    for bin in receiver.tracker().by_distance().bins() {
        println!(
            "[{:>7.1}, {:>7.1}) m  {:>5}/{:<5} pdr={:.3}",
            bin.lower_m,
            bin.upper_m,
            bin.delivered,
            bin.total,
            bin.pdr()
        );
    }
}
