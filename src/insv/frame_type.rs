//! INSV frame types, i.e. the numeric code identifying each frame in the metadata block.
//! Not all are documented, hence `FrameType::Unknown(u8)`.
//! `FrameType::Raw` is not present in files, it marks
//! bytes in the metadata block not covered by any frame.

use std::fmt::Display;

use serde::{Serialize, Serializer};

/// What can be done with a frame's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    /// Opaque, raw bytes only.
    None,
    /// Frame index, consumed when reading frames.
    Index,
    /// Protobuf encoded camera info.
    CameraInfo,
    /// Record width given by the camera info gyro field.
    Gyro,
    /// Records of fixed byte width.
    Fixed(usize),
}

/// Frame type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameType {
    /// Frame offsets for random access
    Index,
    /// Camera info, protobuf
    Info,
    Thumbnail,
    /// Gyroscope/accelerometer samples
    Gyro,
    /// Exposure time per video frame
    Exposure,
    ThumbnailExt,
    /// Timelapse frame timestamps
    Timelapse,
    /// GPS points
    Gps,
    StarNum,
    ThreeAInTimestamp,
    Anchors,
    ThreeASimulation,
    /// Exposure time, second lens
    ExposureSecondary,
    Magnetic,
    Euler,
    /// Gyroscope, second sensor
    GyroSecondary,
    Speed,
    Tbox,
    Editor,
    Heartrate,
    ForwardDirection,
    Upview,
    ShellRecognitionData,
    /// Drone position and velocity telemetry
    Pos,
    TimelapseQuat,
    /// Not a frame: bytes not covered by any frame.
    Raw,
    /// Undocumented frame type
    Unknown(u8),
}

/// Catalog entry for a frame type.
#[derive(Debug, Clone, Copy)]
pub struct FrameSpec {
    pub frame_type: FrameType,
    pub code: u8,
    pub name: &'static str,
    /// Decoded without being explicitly included.
    pub default_enabled: bool,
    pub decoder: Decoder,
}

const fn entry(frame_type: FrameType, code: u8, name: &'static str, default_enabled: bool, decoder: Decoder) -> FrameSpec {
    FrameSpec { frame_type, code, name, default_enabled, decoder }
}

/// All documented frame types, ordered by code.
pub const FRAME_CATALOG: &[FrameSpec] = &[
    entry(FrameType::Index, 0, "INDEX", true, Decoder::Index),
    entry(FrameType::Info, 1, "INFO", true, Decoder::CameraInfo),
    entry(FrameType::Thumbnail, 2, "THUMBNAIL", false, Decoder::None),
    entry(FrameType::Gyro, 3, "GYRO", true, Decoder::Gyro),
    entry(FrameType::Exposure, 4, "EXPOSURE", true, Decoder::Fixed(16)),
    entry(FrameType::ThumbnailExt, 5, "THUMBNAIL_EXT", false, Decoder::None),
    entry(FrameType::Timelapse, 6, "TIMELAPSE", true, Decoder::Fixed(8)),
    entry(FrameType::Gps, 7, "GPS", true, Decoder::Fixed(53)),
    entry(FrameType::StarNum, 8, "STAR_NUM", false, Decoder::None),
    entry(FrameType::ThreeAInTimestamp, 9, "THREE_A_IN_TIMESTAMP", false, Decoder::None),
    entry(FrameType::Anchors, 10, "ANCHORS", false, Decoder::None),
    entry(FrameType::ThreeASimulation, 11, "THREE_A_SIMULATION", false, Decoder::None),
    entry(FrameType::ExposureSecondary, 12, "EXPOSURE_SECONDARY", false, Decoder::Fixed(16)),
    entry(FrameType::Magnetic, 13, "MAGNETIC", false, Decoder::None),
    entry(FrameType::Euler, 14, "EULER", false, Decoder::None),
    entry(FrameType::GyroSecondary, 15, "GYRO_SECONDARY", false, Decoder::Gyro),
    entry(FrameType::Speed, 16, "SPEED", false, Decoder::None),
    entry(FrameType::Tbox, 17, "TBOX", false, Decoder::None),
    entry(FrameType::Editor, 18, "EDITOR", false, Decoder::None),
    entry(FrameType::Heartrate, 19, "HEARTRATE", false, Decoder::None),
    entry(FrameType::ForwardDirection, 20, "FORWARD_DIRECTION", false, Decoder::None),
    entry(FrameType::Upview, 21, "UPVIEW", false, Decoder::None),
    entry(FrameType::ShellRecognitionData, 22, "SHELL_RECOGNITION_DATA", false, Decoder::None),
    entry(FrameType::Pos, 23, "POS", false, Decoder::Fixed(44)),
    entry(FrameType::TimelapseQuat, 24, "TIMELAPSE_QUAT", false, Decoder::None),
];

/// Types that are parsed only when explicitly included.
pub const OPTIONAL_TYPES: &[FrameType] = &[
    FrameType::Magnetic,
    FrameType::Euler,
    FrameType::GyroSecondary,
    FrameType::Speed,
    FrameType::Heartrate,
    FrameType::ExposureSecondary,
    FrameType::Pos,
];

impl FrameType {
    /// Frame type from numeric code.
    pub fn from_code(code: u8) -> Self {
        FRAME_CATALOG.iter()
            .find(|s| s.code == code)
            .map(|s| s.frame_type)
            .unwrap_or(Self::Unknown(code))
    }

    /// Frame type from name, e.g. `GYRO` or `gyro_secondary`.
    /// Returns `None` for names not in the catalog.
    pub fn from_name(name: &str) -> Option<Self> {
        FRAME_CATALOG.iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .map(|s| s.frame_type)
    }

    /// Catalog entry. `None` for `Raw` and `Unknown`.
    pub fn catalog_entry(&self) -> Option<&'static FrameSpec> {
        FRAME_CATALOG.iter().find(|s| &s.frame_type == self)
    }

    /// Numeric code. `None` for `Raw`, which has no code.
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Raw => None,
            Self::Unknown(code) => Some(*code),
            ft => ft.catalog_entry().map(|s| s.code),
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Raw => Some("RAW"),
            ft => ft.catalog_entry().map(|s| s.name),
        }
    }

    pub fn decoder(&self) -> Decoder {
        self.catalog_entry()
            .map(|s| s.decoder)
            .unwrap_or(Decoder::None)
    }

    pub fn default_enabled(&self) -> bool {
        self.catalog_entry()
            .map(|s| s.default_enabled)
            .unwrap_or(false)
    }

    pub fn is_optional(&self) -> bool {
        OPTIONAL_TYPES.contains(self)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl Display for FrameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "UNKNOWN_{}", self.code().unwrap_or_default()),
        }
    }
}

/// Name for documented types, `UNKNOWN_<code>` otherwise.
impl Serialize for FrameType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
