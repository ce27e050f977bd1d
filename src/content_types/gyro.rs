//! Gyroscope samples (`GYRO`, `GYRO_SECONDARY`).
//!
//! The record width is not fixed. It is the byte length of the `gyro`
//! field in the camera info (`INFO` frame), which holds a sample record.
//! Known widths are 56 bytes (timestamp + 6 `f64`) and 20 bytes
//! (timestamp + 6 `i16`). Any other width is kept as timestamp plus raw bytes.
//! Without the camera info field the width is unknown and the
//! frame is left unparsed.

use binrw::{BinRead, Endian};
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{
    insv::{ByteCursor, FixedRecord},
    InsvError,
};

/// Timestamp, leading every gyro record.
const GYRO_TIMESTAMP_SIZE: usize = 8;

/// Sample with 6 `f64` values.
#[derive(Debug, Clone, Copy, PartialEq, BinRead, Serialize)]
#[br(little)]
pub struct GyroV1Record {
    /// Milliseconds since recording start.
    pub timestamp: i64,
    /// Accelerometer x, y, z, then gyroscope x, y, z.
    pub payload: [f64; 6],
}

impl FixedRecord for GyroV1Record {
    const WIDTH: usize = 56;
}

/// Sample with 6 `i16` values, raw sensor units.
#[derive(Debug, Clone, Copy, PartialEq, BinRead, Serialize)]
#[br(little)]
pub struct GyroV2Record {
    pub timestamp: i64,
    pub payload: [i16; 6],
}

impl FixedRecord for GyroV2Record {
    const WIDTH: usize = 20;
}

/// Sample with an undocumented layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GyroRawRecord {
    pub timestamp: i64,
    pub payload: Vec<u8>,
}

/// Payload serializes as a lower case hex string.
impl Serialize for GyroRawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GyroRawRecord", 2)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("payload", &to_hex(&self.payload))?;
        state.end()
    }
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Gyro record layout, selected by record width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroLayout {
    V1,
    V2,
    /// Timestamp followed by `width - 8` opaque bytes.
    Raw(usize),
}

impl GyroLayout {
    /// Layout for a record width taken from camera info.
    /// A width is never assumed: 0 is a missing field and anything
    /// shorter than a timestamp is invalid.
    pub fn from_width(width: usize) -> Result<Self, InsvError> {
        match width {
            0 => Err(InsvError::MissingGyroSize),
            w if w == GyroV1Record::WIDTH => Ok(Self::V1),
            w if w == GyroV2Record::WIDTH => Ok(Self::V2),
            w if w < GYRO_TIMESTAMP_SIZE => Err(InsvError::InvalidGyroSize(w)),
            w => Ok(Self::Raw(w)),
        }
    }

    /// Record width in bytes.
    pub fn width(&self) -> usize {
        match self {
            Self::V1 => GyroV1Record::WIDTH,
            Self::V2 => GyroV2Record::WIDTH,
            Self::Raw(w) => *w,
        }
    }
}

/// Decoded gyro frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GyroRecords {
    V1(Vec<GyroV1Record>),
    V2(Vec<GyroV2Record>),
    Raw(Vec<GyroRawRecord>),
}

impl GyroRecords {
    /// Decode a gyro payload. Record count is `payload length / layout width`,
    /// a remainder is an error.
    pub fn new(payload: &ByteCursor, layout: GyroLayout) -> Result<Self, InsvError> {
        let width = layout.width();
        if payload.len() % width != 0 {
            return Err(InsvError::FrameSize {
                frame_size: payload.len(),
                record_width: width,
            });
        }
        let positions = (0..payload.len() / width).map(|i| i * width);

        let records = match layout {
            GyroLayout::V1 => Self::V1(
                positions.map(|pos| payload.read_record::<GyroV1Record>(pos))
                    .collect::<Result<_, _>>()?
            ),
            GyroLayout::V2 => Self::V2(
                positions.map(|pos| payload.read_record::<GyroV2Record>(pos))
                    .collect::<Result<_, _>>()?
            ),
            GyroLayout::Raw(_) => Self::Raw(
                positions
                    .map(|pos| {
                        Ok(GyroRawRecord {
                            timestamp: payload.read_i64(pos, Endian::Little)?,
                            payload: payload
                                .read_bytes(pos + GYRO_TIMESTAMP_SIZE, width - GYRO_TIMESTAMP_SIZE)?
                                .to_owned(),
                        })
                    })
                    .collect::<Result<_, InsvError>>()?
            ),
        };

        Ok(records)
    }

    pub fn layout(&self) -> GyroLayout {
        match self {
            Self::V1(_) => GyroLayout::V1,
            Self::V2(_) => GyroLayout::V2,
            Self::Raw(r) => GyroLayout::Raw(
                r.first().map_or(GYRO_TIMESTAMP_SIZE, |r| r.payload.len() + GYRO_TIMESTAMP_SIZE)
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::V1(r) => r.len(),
            Self::V2(r) => r.len(),
            Self::Raw(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record timestamps in logged order.
    pub fn timestamps(&self) -> Vec<i64> {
        match self {
            Self::V1(r) => r.iter().map(|r| r.timestamp).collect(),
            Self::V2(r) => r.iter().map(|r| r.timestamp).collect(),
            Self::Raw(r) => r.iter().map(|r| r.timestamp).collect(),
        }
    }
}

/// Serializes as a list of `{timestamp, payload}` objects.
impl Serialize for GyroRecords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::V1(r) => r.serialize(serializer),
            Self::V2(r) => r.serialize(serializer),
            Self::Raw(r) => r.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1_sample(ts: i64, values: [f64; 6]) -> Vec<u8> {
        let mut b = ts.to_le_bytes().to_vec();
        values.iter().for_each(|v| b.extend(v.to_le_bytes()));
        b
    }

    fn v2_sample(ts: i64, values: [i16; 6]) -> Vec<u8> {
        let mut b = ts.to_le_bytes().to_vec();
        values.iter().for_each(|v| b.extend(v.to_le_bytes()));
        b
    }

    #[test]
    fn layout_from_width() {
        assert_eq!(GyroLayout::from_width(56).unwrap(), GyroLayout::V1);
        assert_eq!(GyroLayout::from_width(20).unwrap(), GyroLayout::V2);
        assert_eq!(GyroLayout::from_width(16).unwrap(), GyroLayout::Raw(16));
        assert_eq!(GyroLayout::from_width(16).unwrap().width(), 16);
        assert!(matches!(GyroLayout::from_width(0), Err(InsvError::MissingGyroSize)));
        assert!(matches!(GyroLayout::from_width(5), Err(InsvError::InvalidGyroSize(5))));
    }

    #[test]
    fn decode_v1() {
        let mut payload = v1_sample(1000, [0.5, -0.25, 9.81, 0.01, 0.02, 0.03]);
        payload.extend(v1_sample(1005, [1., 2., 3., 4., 5., 6.]));
        let cursor = ByteCursor::new(&payload, 0);

        let records = GyroRecords::new(&cursor, GyroLayout::V1).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.timestamps(), vec![1000, 1005]);
        let GyroRecords::V1(ref r) = records else {
            panic!("expected v1 records")
        };
        assert_eq!(r[0].payload[2], 9.81);

        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json[1]["timestamp"], 1005);
        assert_eq!(json[1]["payload"][5], 6.);
    }

    #[test]
    fn decode_v2_is_deterministic() {
        let mut payload = v2_sample(7, [1, -2, 3, -4, 5, -6]);
        payload.extend(v2_sample(9, [0, 0, 0, 0, 0, i16::MIN]));
        let cursor = ByteCursor::new(&payload, 0);

        let first = GyroRecords::new(&cursor, GyroLayout::V2).unwrap();
        let second = GyroRecords::new(&cursor, GyroLayout::V2).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.layout(), GyroLayout::V2);

        let json = serde_json::to_value(&first).unwrap();
        assert_eq!(json[0]["payload"], serde_json::json!([1, -2, 3, -4, 5, -6]));
        assert_eq!(json[1]["payload"][5], -32768);
    }

    #[test]
    fn decode_raw() {
        let mut payload = 42_i64.to_le_bytes().to_vec();
        payload.extend([0xde, 0xad, 0xbe, 0xef, 0, 1, 2, 3]);
        payload.extend(43_i64.to_le_bytes());
        payload.extend([0xff; 8]);
        let cursor = ByteCursor::new(&payload, 0);

        let records = GyroRecords::new(&cursor, GyroLayout::Raw(16)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.layout(), GyroLayout::Raw(16));
        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(json[0]["timestamp"], 42);
        assert_eq!(json[0]["payload"], "deadbeef00010203");
        assert_eq!(json[1]["payload"], "ffffffffffffffff");
    }

    #[test]
    fn remainder_is_error() {
        let payload = vec![0_u8; 30];
        let cursor = ByteCursor::new(&payload, 0);
        assert!(matches!(
            GyroRecords::new(&cursor, GyroLayout::V2),
            Err(InsvError::FrameSize { frame_size: 30, record_width: 20 })
        ));
    }
}
