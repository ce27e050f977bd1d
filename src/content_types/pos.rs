//! Drone position and velocity telemetry (`POS`), 44 byte records.
//!
//! Unlike other records the timestamp is 4 bytes.
//! Only timestamp, velocities and height above ground are well understood.
//! The position is local to the drone, not distance from home point.

use binrw::BinRead;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::insv::FixedRecord;

#[derive(Debug, Clone, Copy, PartialEq, BinRead)]
#[br(little)]
pub struct PosRecord {
    /// Milliseconds.
    pub timestamp: u32,
    pub x_pos: f32,
    pub y_pos: f32,
    pub z_pos: f32,
    /// Undocumented, possibly accelerometer.
    pub unknown: [f32; 3],
    /// Horizontal velocity, m/s.
    pub velocity_h: f32,
    /// Vertical velocity (climb rate), m/s.
    pub velocity_v: f32,
    pub unknown2: f32,
    /// Height above ground level in meters, `-1.0` if not available.
    pub agl: f32,
}

impl FixedRecord for PosRecord {
    const WIDTH: usize = 44;
}

impl PosRecord {
    /// Total speed, m/s.
    pub fn speed(&self) -> f32 {
        self.velocity_h.hypot(self.velocity_v)
    }

    /// Height above ground, if available.
    pub fn agl(&self) -> Option<f32> {
        (self.agl > 0.).then_some(self.agl)
    }
}

/// Undocumented values are left out, `agl` only if available.
impl Serialize for PosRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("xPos", &self.x_pos)?;
        map.serialize_entry("yPos", &self.y_pos)?;
        map.serialize_entry("zPos", &self.z_pos)?;
        map.serialize_entry("velocityH", &self.velocity_h)?;
        map.serialize_entry("velocityV", &self.velocity_v)?;
        map.serialize_entry("speed", &self.speed())?;
        if let Some(agl) = self.agl() {
            map.serialize_entry("agl", &agl)?;
        }
        map.end()
    }
}
