use binrw::BinRead;
use serde::Serialize;

use crate::insv::FixedRecord;

/// Exposure time for a single video frame.
/// Also used for the secondary lens (`EXPOSURE_SECONDARY`).
#[derive(Debug, Clone, Copy, PartialEq, BinRead, Serialize)]
#[br(little)]
#[serde(rename_all = "camelCase")]
pub struct ExposureRecord {
    /// Milliseconds since recording start.
    pub timestamp: i64,
    /// Exposure time in seconds.
    pub shutter_speed: f64,
}

impl FixedRecord for ExposureRecord {
    const WIDTH: usize = 16;
}

impl ExposureRecord {
    /// Shutter speed as the denominator of `1/x` seconds.
    pub fn inverse_shutter_speed(&self) -> Option<f64> {
        (self.shutter_speed > 0.).then(|| 1. / self.shutter_speed)
    }
}
