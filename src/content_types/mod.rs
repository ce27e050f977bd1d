//! Decoders for frame payloads with known layouts.

pub mod camera_info;
pub mod exposure;
pub mod gps;
pub mod gyro;
pub mod pos;
pub mod timelapse;

pub use camera_info::{CameraInfo, InfoDecoder, InfoValue, ProtobufInfoDecoder};
pub use exposure::ExposureRecord;
pub use gps::{Gps, GpsRecord};
pub use gyro::{GyroLayout, GyroRawRecord, GyroRecords, GyroV1Record, GyroV2Record};
pub use pos::PosRecord;
pub use timelapse::TimelapseRecord;

use crate::{
    constants::INSV_INFO_PROTOBUF_VERSION,
    insv::{ByteCursor, FixedRecord, FrameHeader, FrameType},
    InsvError,
};

/// Decoded frame payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    CameraInfo(CameraInfo),
    Gyro(GyroRecords),
    Exposure(Vec<ExposureRecord>),
    Timelapse(Vec<TimelapseRecord>),
    Gps(Vec<GpsRecord>),
    Pos(Vec<PosRecord>),
}

impl Content {
    /// Number of records. Camera info counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::CameraInfo(_) => 1,
            Self::Gyro(g) => g.len(),
            Self::Exposure(r) => r.len(),
            Self::Timelapse(r) => r.len(),
            Self::Gps(r) => r.len(),
            Self::Pos(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a run of fixed-width records.
/// Record count is `payload length / R::WIDTH`, a remainder is an error.
pub fn decode_fixed<R: FixedRecord>(payload: &ByteCursor) -> Result<Vec<R>, InsvError> {
    if payload.len() % R::WIDTH != 0 {
        return Err(InsvError::FrameSize {
            frame_size: payload.len(),
            record_width: R::WIDTH,
        });
    }

    (0..payload.len() / R::WIDTH)
        .map(|i| payload.read_record::<R>(i * R::WIDTH))
        .collect()
}

/// Everything a frame decoder may depend on besides its own payload.
pub struct DecodeContext<'a> {
    /// Resolved gyro layout, `None` if the camera info has no gyro field.
    pub gyro: Option<GyroLayout>,
    pub info_decoder: &'a dyn InfoDecoder,
}

/// Decode camera info. Only version 1 `INFO` frames are protobuf encoded.
pub fn decode_info(
    header: &FrameHeader,
    payload: &ByteCursor,
    info_decoder: &dyn InfoDecoder,
) -> Result<CameraInfo, InsvError> {
    if header.frame_version != INSV_INFO_PROTOBUF_VERSION {
        return Err(InsvError::UnsupportedInfoVersion(header.frame_version));
    }
    info_decoder.decode(payload.read_bytes(0, payload.len())?)
}

/// Decode a payload according to frame type.
/// Returns `Ok(None)` for types without a known layout.
pub fn decode(
    header: &FrameHeader,
    payload: &ByteCursor,
    context: &DecodeContext,
) -> Result<Option<Content>, InsvError> {
    let content = match header.frame_type {
        FrameType::Info => Content::CameraInfo(decode_info(header, payload, context.info_decoder)?),
        FrameType::Gyro | FrameType::GyroSecondary => {
            let layout = context.gyro.ok_or(InsvError::MissingGyroSize)?;
            Content::Gyro(GyroRecords::new(payload, layout)?)
        }
        FrameType::Exposure | FrameType::ExposureSecondary => Content::Exposure(decode_fixed(payload)?),
        FrameType::Timelapse => Content::Timelapse(decode_fixed(payload)?),
        FrameType::Gps => Content::Gps(decode_fixed(payload)?),
        FrameType::Pos => Content::Pos(decode_fixed(payload)?),
        _ => return Ok(None),
    };

    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exposure(ts: i64, t: f64) -> Vec<u8> {
        let mut b = ts.to_le_bytes().to_vec();
        b.extend(t.to_le_bytes());
        b
    }

    #[test]
    fn fixed_width_count() {
        let mut payload = exposure(0, 1. / 120.);
        payload.extend(exposure(33, 1. / 60.));
        payload.extend(exposure(66, 0.125));
        let records: Vec<ExposureRecord> = decode_fixed(&ByteCursor::new(&payload, 0)).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].timestamp, 33);
        assert_eq!(records[2].inverse_shutter_speed(), Some(8.));

        payload.push(0);
        assert!(matches!(
            decode_fixed::<ExposureRecord>(&ByteCursor::new(&payload, 0)),
            Err(InsvError::FrameSize { frame_size: 49, record_width: 16 })
        ));
        assert!(decode_fixed::<ExposureRecord>(&ByteCursor::new(&[], 0)).unwrap().is_empty());
    }

    #[test]
    fn catalog_widths() {
        use crate::insv::Decoder;
        assert_eq!(FrameType::Exposure.decoder(), Decoder::Fixed(ExposureRecord::WIDTH));
        assert_eq!(FrameType::ExposureSecondary.decoder(), Decoder::Fixed(ExposureRecord::WIDTH));
        assert_eq!(FrameType::Timelapse.decoder(), Decoder::Fixed(TimelapseRecord::WIDTH));
        assert_eq!(FrameType::Gps.decoder(), Decoder::Fixed(GpsRecord::WIDTH));
        assert_eq!(FrameType::Pos.decoder(), Decoder::Fixed(PosRecord::WIDTH));
    }

    fn header(code: u8, version: u8, size: usize) -> FrameHeader {
        FrameHeader {
            frame_type: FrameType::from_code(code),
            frame_version: version,
            frame_size: size as u64,
            frame_pos: 0,
        }
    }

    #[test]
    fn dispatch() {
        let decoder = ProtobufInfoDecoder;
        let context = DecodeContext { gyro: None, info_decoder: &decoder };
        let payload = exposure(1, 0.5);
        let cursor = ByteCursor::new(&payload, 0);
        let size = payload.len();

        let content = decode(&header(12, 1, size), &cursor, &context).unwrap();
        assert_eq!(content.map(|c| c.len()), Some(1));
        let content = decode(&header(6, 1, size), &cursor, &context).unwrap();
        assert_eq!(content.map(|c| c.len()), Some(2));
        assert!(decode(&header(2, 1, size), &cursor, &context).unwrap().is_none());
        assert!(decode(&header(99, 1, size), &cursor, &context).unwrap().is_none());
        assert!(matches!(
            decode(&header(3, 1, size), &cursor, &context),
            Err(InsvError::MissingGyroSize)
        ));
        assert!(matches!(
            decode(&header(7, 1, size), &cursor, &context),
            Err(InsvError::FrameSize { record_width: 53, .. })
        ));

        let context = DecodeContext { gyro: Some(GyroLayout::Raw(16)), info_decoder: &decoder };
        let content = decode(&header(15, 1, size), &cursor, &context).unwrap();
        assert_eq!(content.map(|c| c.len()), Some(1));
    }

    #[test]
    fn info_version() {
        let decoder = ProtobufInfoDecoder;
        // field 1, "X3"
        let payload = [0x0a, 0x02, b'X', b'3'];
        let cursor = ByteCursor::new(&payload, 0);

        let info = decode_info(&header(1, 1, 4), &cursor, &decoder).unwrap();
        assert_eq!(info.get("serial_number").and_then(|v| v.as_str()), Some("X3"));
        assert!(matches!(
            decode_info(&header(1, 2, 4), &cursor, &decoder),
            Err(InsvError::UnsupportedInfoVersion(2))
        ));
    }
}
