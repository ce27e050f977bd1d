//! Parse the metadata block Insta360 cameras append to their recordings
//! (`.insv`, `.insp`, `.lrv`). The block is split into frames, and frames
//! with a known layout (camera info, gyro, exposure, GPS, ...)
//! are decoded into records. Frames of unknown type are kept as raw bytes.
//!
//! ```rs
//! use insv_rs::{InsvMetadata, ParseOptions, FrameType};
//! use std::path::Path;
//!
//! fn main() -> Result<(), insv_rs::InsvError> {
//!     let path = Path::new("VID_20240101_120000_00_001.insv");
//!     let options = ParseOptions::new().include(FrameType::Magnetic);
//!     let insv = InsvMetadata::new(&path)?.parse(&options);
//!     insv.write_json(Path::new("VID_20240101_120000_00_001.insv.meta.json"))?;
//!     Ok(())
//! }
//! ```

pub mod insv;
pub mod content_types;
pub mod files;
pub mod constants;
mod errors;
mod geo;

pub use insv::{
    scan_files,
    Frame,
    FrameCount,
    FrameHeader,
    FrameType,
    InsvMetadata,
    Layout,
    MetadataBlockHeader,
    ParseOptions,
    ScanSummary,
    FRAME_CATALOG,
    OPTIONAL_TYPES,
};
pub use content_types::{
    CameraInfo,
    Content,
    Gps,
    GpsRecord,
    GyroLayout,
    GyroRecords,
    InfoDecoder,
    ProtobufInfoDecoder,
};
pub use errors::{ErrorKind, InsvError};
