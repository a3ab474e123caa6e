//! Broadcast payloads: vehicle safety messages and roadside warnings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CryptoError, Result};

/// Fixed-point scale used to carry a roadside unit's planar position in a
/// warning's coarse lat/lon integers.
pub const POSITION_SCALE: f64 = 1e6;

/// Estimated on-air size of a safety message body: one `i32` and four `f64`.
pub const SAFETY_MESSAGE_WIRE_LEN: usize = 4 + 4 * 8;
/// On-air size budget for a warning body.
pub const WARNING_WIRE_LEN: usize = 64;

/// Periodic vehicle safety message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyMessage {
    pub message_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// Radians.
    pub heading: f64,
    pub speed: f64,
}

/// Which lane reference a warning carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", content = "value", rename_all = "snake_case")]
pub enum LaneSelector {
    Lane(i32),
    Approach(i32),
}

impl LaneSelector {
    /// Approach code, or `-1` when a lane is selected.
    pub fn approach_code(&self) -> i32 {
        match self {
            LaneSelector::Approach(v) => *v,
            LaneSelector::Lane(_) => -1,
        }
    }

    /// Lane number, or `-1` when an approach is selected.
    pub fn lane_code(&self) -> i32 {
        match self {
            LaneSelector::Lane(v) => *v,
            LaneSelector::Approach(_) => -1,
        }
    }
}

impl Default for LaneSelector {
    fn default() -> Self {
        LaneSelector::Lane(-1)
    }
}

/// Intersection collision avoidance warning broadcast by a roadside unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Sequence counter; only the low byte survives on the wire.
    pub message_counter: i32,
    pub intersection_id: i32,
    pub lane: LaneSelector,
    pub event_flag: i32,
    pub source_x: f64,
    pub source_y: f64,
    pub coarse_lat: i64,
    pub coarse_lon: i64,
    pub temporary_id: String,
}

impl Warning {
    /// Build a warning from the roadside trigger JSON.
    ///
    /// Missing fields take neutral defaults: counters and ids 0, lane
    /// selector `lane` with value `-1`, empty temporary id.
    pub fn from_trigger_json(json: &str) -> Result<Self> {
        let trigger: WarningTrigger =
            serde_json::from_str(json).map_err(|e| CryptoError::Payload(e.to_string()))?;
        Ok(trigger.into())
    }

    /// Store a planar position in the fixed-point coarse lat/lon fields.
    pub fn stamp_position(&mut self, x: f64, y: f64) {
        self.coarse_lat = (x * POSITION_SCALE).round() as i64;
        self.coarse_lon = (y * POSITION_SCALE).round() as i64;
    }

    /// Planar position recovered from the coarse lat/lon fields.
    pub fn coarse_position(&self) -> (f64, f64) {
        (
            self.coarse_lat as f64 / POSITION_SCALE,
            self.coarse_lon as f64 / POSITION_SCALE,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WarningTrigger {
    #[serde(rename = "msgCnt")]
    msg_cnt: i32,
    id: Option<Value>,
    #[serde(rename = "intersectionID")]
    intersection: IntersectionRef,
    #[serde(rename = "laneNumber")]
    lane_number: LaneNumber,
    #[serde(rename = "eventFlag")]
    event_flag: i32,
    #[serde(rename = "partOne")]
    part_one: PartOne,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IntersectionRef {
    id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LaneNumber {
    choice: String,
    value: i32,
}

impl Default for LaneNumber {
    fn default() -> Self {
        Self {
            choice: "lane".to_string(),
            value: -1,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartOne {
    lat: i64,
    lon: i64,
}

impl From<WarningTrigger> for Warning {
    fn from(t: WarningTrigger) -> Self {
        let lane = if t.lane_number.choice == "approach" {
            LaneSelector::Approach(t.lane_number.value)
        } else {
            LaneSelector::Lane(t.lane_number.value)
        };
        // Non-string ids are ignored.
        let temporary_id = t
            .id
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Warning {
            message_counter: t.msg_cnt,
            intersection_id: t.intersection.id,
            lane,
            event_flag: t.event_flag,
            source_x: 0.0,
            source_y: 0.0,
            coarse_lat: t.part_one.lat,
            coarse_lon: t.part_one.lon,
            temporary_id,
        }
    }
}

/// Either kind of signed broadcast body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    SafetyMessage(SafetyMessage),
    Warning(Warning),
}

impl Payload {
    /// The sender-side sequence number: message id or warning counter.
    pub fn sequence(&self) -> i64 {
        match self {
            Payload::SafetyMessage(m) => i64::from(m.message_id),
            Payload::Warning(w) => i64::from(w.message_counter),
        }
    }

    pub fn estimated_wire_len(&self) -> usize {
        match self {
            Payload::SafetyMessage(_) => SAFETY_MESSAGE_WIRE_LEN,
            Payload::Warning(_) => WARNING_WIRE_LEN,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Payload::SafetyMessage(_) => "safety_message",
            Payload::Warning(_) => "warning",
        }
    }
}

impl From<SafetyMessage> for Payload {
    fn from(m: SafetyMessage) -> Self {
        Payload::SafetyMessage(m)
    }
}

impl From<Warning> for Payload {
    fn from(w: Warning) -> Self {
        Payload::Warning(w)
    }
}
