//! Simulated broadcast channel: independent losses and airtime latency.

use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct LossyChannel {
    loss_probability: f64,
    base_latency_ms: i64,
    bitrate_bps: u64,
}

impl LossyChannel {
    pub fn new(loss_probability: f64, base_latency_ms: i64, bitrate_bps: u64) -> Self {
        Self {
            loss_probability,
            base_latency_ms,
            bitrate_bps: bitrate_bps.max(1),
        }
    }

    /// Whether a packet survives the channel.
    pub fn delivers(&self, rng: &mut impl Rng) -> bool {
        rng.gen::<f64>() >= self.loss_probability
    }

    /// Propagation plus serialization delay for `wire_len` bytes.
    pub fn latency_ms(&self, wire_len: usize) -> i64 {
        let airtime = (wire_len as u64 * 8 * 1000).div_ceil(self.bitrate_bps);
        self.base_latency_ms + airtime as i64
    }
}
