//! JSON document output.
//!
//! ```json
//! {
//!   "header": {"version": 3, "metaDataSize": 1234, "metaDataPos": 5678},
//!   "frames": [
//!     {
//!       "header": {"frameType": "GYRO", "frameVersion": 1, "frameSize": 32, "framePos": 5700},
//!       "parsed": true,
//!       "records": [...]
//!     }
//!   ]
//! }
//! ```
//!
//! Decoded camera info is output as `extraMetadata` instead of `records`.
//! Unparsed frames have neither.

use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{content_types::Content, InsvError};

use super::{Frame, InsvMetadata};

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::CameraInfo(info) => info.serialize(serializer),
            Self::Gyro(records) => records.serialize(serializer),
            Self::Exposure(records) => records.serialize(serializer),
            Self::Timelapse(records) => records.serialize(serializer),
            Self::Gps(records) => records.serialize(serializer),
            Self::Pos(records) => records.serialize(serializer),
        }
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("header", &self.header)?;
        map.serialize_entry("parsed", &self.parsed())?;
        match &self.content {
            Some(info @ Content::CameraInfo(_)) => map.serialize_entry("extraMetadata", info)?,
            Some(records) => map.serialize_entry("records", records)?,
            None => (),
        }
        map.end()
    }
}

impl Serialize for InsvMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("header", &self.header)?;
        map.serialize_entry("frames", &self.frames)?;
        map.end()
    }
}

impl InsvMetadata {
    /// Pretty printed JSON document.
    pub fn to_json(&self) -> Result<String, InsvError> {
        serde_json::to_string_pretty(self).map_err(|err| err.into())
    }

    /// Write JSON document to `path`.
    /// An existing file is never overwritten.
    pub fn write_json(&self, path: &Path) -> Result<(), InsvError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => InsvError::OutputExists(path.to_owned()),
                _ => InsvError::IOError(err),
            })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        log::info!("Wrote {}", path.display());

        Ok(())
    }
}
