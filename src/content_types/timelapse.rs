use binrw::BinRead;
use serde::Serialize;

use crate::insv::FixedRecord;

/// Timestamp of a stored timelapse frame.
#[derive(Debug, Clone, Copy, PartialEq, BinRead, Serialize)]
#[br(little)]
pub struct TimelapseRecord {
    /// Milliseconds since recording start.
    pub timestamp: i64,
}

impl FixedRecord for TimelapseRecord {
    const WIDTH: usize = 8;
}
