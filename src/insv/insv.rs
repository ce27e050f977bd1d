//! Core INSV struct and methods.
//!
//! Reading and decoding are separate steps:
//! 1. `InsvMetadata::new()` (or `read()` for any `Read + Seek` source)
//!    locates the metadata block and splits it into frames.
//! 2. `parse()` decodes the frames enabled via `ParseOptions`.
//!
//! ```rs
//! use insv_rs::{InsvMetadata, ParseOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), insv_rs::InsvError> {
//!     let path = Path::new("VID_20240101_120000_00_001.insv");
//!     let insv = InsvMetadata::new(&path)?.parse(&ParseOptions::default());
//!     for frame in insv.frames.iter() {
//!         println!("{} parsed: {}", frame.header.frame_type, frame.parsed());
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use crate::{
    content_types::{
        self, CameraInfo, Content, DecodeContext, Gps, GyroLayout, GyroRecords, InfoDecoder,
        ProtobufInfoDecoder,
    },
    InsvError,
};

use super::{Frame, FrameReader, FrameType, Layout, MetadataBlockHeader, ParseOptions, ScanSummary};

/// Frame count and total payload size for a single frame type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCount {
    pub frames: usize,
    pub bytes: u64,
}

/// INSV metadata block, split into frames.
#[derive(Debug, Clone, PartialEq)]
pub struct InsvMetadata {
    pub header: MetadataBlockHeader,
    /// Frames in file order, including `RAW` regions.
    pub frames: Vec<Frame>,
    pub layout: Layout,
    /// Camera info from the first `INFO` frame, set on `parse()`.
    pub camera_info: Option<CameraInfo>,
    /// Path to the source file, if read from disk.
    pub source: Option<PathBuf>,
}

impl InsvMetadata {
    /// Read metadata from an INSV file (`.insv`, `.insp`, `.lrv`).
    /// Frames are not decoded, see `parse()`.
    pub fn new(path: &Path) -> Result<Self, InsvError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut insv = Self::read(&mut reader)
            .map_err(|err| match err {
                InsvError::NoMetadata(None) => InsvError::NoMetadata(Some(path.to_owned())),
                err => err,
            })?;
        insv.source = Some(path.to_owned());

        Ok(insv)
    }

    /// Read metadata from any seekable source.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self, InsvError> {
        let (header, body) = MetadataBlockHeader::locate(reader)?;
        let (frames, layout) = FrameReader::new(&header, &body).frames()?;

        log::debug!("Read {} frames ({layout} layout)", frames.len());

        Ok(Self {
            header,
            frames,
            layout,
            camera_info: None,
            source: None,
        })
    }

    /// Decode frames with the default camera info decoder.
    pub fn parse(self, options: &ParseOptions) -> Self {
        self.parse_with(options, &ProtobufInfoDecoder)
    }

    /// Decode frames enabled via `options`.
    ///
    /// Camera info is resolved first, from the first `INFO` frame
    /// whether enabled or not, since it holds the gyro record width.
    /// Frames that fail to decode are logged and left unparsed.
    pub fn parse_with(mut self, options: &ParseOptions, info_decoder: &dyn InfoDecoder) -> Self {
        let info_index = self.frames.iter()
            .position(|f| f.frame_type() == FrameType::Info);

        self.camera_info = info_index.and_then(|i| {
            let frame = &self.frames[i];
            content_types::decode_info(&frame.header, &frame.cursor(), info_decoder)
                .map_err(|err| log::warn!("INFO frame at {}: {err}", frame.header.frame_pos))
                .ok()
        });

        let context = DecodeContext {
            gyro: self.gyro_layout(),
            info_decoder,
        };

        for (i, frame) in self.frames.iter_mut().enumerate() {
            let frame_type = frame.frame_type();
            if !options.is_enabled(&frame_type) {
                frame.content = None;
                continue;
            }

            let content = match frame_type {
                FrameType::Info if Some(i) == info_index => {
                    self.camera_info.clone().map(Content::CameraInfo)
                }
                ft => match content_types::decode(&frame.header, &frame.cursor(), &context) {
                    Ok(content) => content,
                    Err(err) => {
                        log::warn!(
                            "{ft} frame at {} left unparsed: {err}",
                            frame.header.frame_pos
                        );
                        None
                    }
                },
            };

            frame.content = content;
        }

        log::debug!(
            "Parsed {} of {} frames",
            self.frames.iter().filter(|f| f.parsed()).count(),
            self.frames.len()
        );

        self
    }

    /// Gyro record layout, from the size of the camera info gyro field.
    fn gyro_layout(&self) -> Option<GyroLayout> {
        let Some(info) = self.camera_info.as_ref() else {
            log::debug!("No camera info, gyro frames can not be decoded");
            return None;
        };
        let Some(size) = info.gyro_record_size() else {
            log::debug!("No gyro field in camera info");
            return None;
        };
        GyroLayout::from_width(size)
            .map_err(|err| log::warn!("{err}"))
            .ok()
    }

    /// Header-only summary of an INSV file. No frames are decoded.
    pub fn scan(path: &Path) -> Result<ScanSummary, InsvError> {
        let insv = Self::new(path)?;
        Ok(ScanSummary::from(&insv))
    }

    /// Frames with specified type.
    pub fn find(&self, frame_type: &FrameType) -> Vec<&Frame> {
        self.frames.iter()
            .filter(|f| &f.frame_type() == frame_type)
            .collect()
    }

    /// Frames with specified numeric type code.
    pub fn find_by_code(&self, code: u8) -> Vec<&Frame> {
        self.frames.iter()
            .filter(|f| f.frame_type().code() == Some(code))
            .collect()
    }

    /// Returns `true` if at least one frame has type code `code`.
    pub fn contains_code(&self, code: u8) -> bool {
        self.frames.iter().any(|f| f.frame_type().code() == Some(code))
    }

    pub fn camera_info(&self) -> Option<&CameraInfo> {
        self.camera_info.as_ref()
    }

    /// All decoded GPS records, in file order.
    pub fn gps(&self) -> Gps {
        let points = self.frames.iter()
            .filter_map(|f| match &f.content {
                Some(Content::Gps(records)) => Some(records.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect();
        Gps(points)
    }

    /// Decoded gyro frames (`GYRO` only).
    pub fn gyro(&self) -> Vec<&GyroRecords> {
        self.frames.iter()
            .filter(|f| f.frame_type() == FrameType::Gyro)
            .filter_map(|f| match &f.content {
                Some(Content::Gyro(records)) => Some(records),
                _ => None,
            })
            .collect()
    }

    /// Frame count and payload size per frame type.
    /// `RAW` regions are not counted.
    pub fn frame_counts(&self) -> BTreeMap<FrameType, FrameCount> {
        let mut counts: BTreeMap<FrameType, FrameCount> = BTreeMap::new();
        for frame in self.frames.iter().filter(|f| !f.is_raw()) {
            let count = counts.entry(frame.frame_type()).or_default();
            count.frames += 1;
            count.bytes += frame.header.frame_size;
        }
        counts
    }

    /// Bytes in the frame region not covered by any frame.
    pub fn residual_bytes(&self) -> u64 {
        self.frames.iter()
            .filter(|f| f.is_raw())
            .map(|f| f.header.frame_size)
            .sum()
    }
}
