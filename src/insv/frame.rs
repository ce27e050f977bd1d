//! INSV frame, i.e. a single, self-delimited unit in the metadata block.
//!
//! On disk each frame is its payload followed by a 6 byte header:
//! version (u8), type (u8), payload size (u32, little-endian).
//! Frames are therefore read backwards from the end of the metadata block.

use binrw::{BinRead, Endian};
use serde::Serialize;

use crate::{
    constants::{INSV_FRAME_HEADER_SIZE, INSV_INDEX_ENTRY_SIZE},
    content_types::Content,
    InsvError,
};

use super::{ByteCursor, FrameType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameHeader {
    pub frame_type: FrameType,
    pub frame_version: u8,
    /// Payload size in bytes, excluding the header.
    pub frame_size: u64,
    /// Absolute file offset of payload start.
    pub frame_pos: u64,
}

impl FrameHeader {
    /// Read the header that ends at position `end` in `cursor`.
    /// The payload is located directly before the header.
    pub fn read_backward(cursor: &ByteCursor, end: usize) -> Result<(u8, Self), InsvError> {
        let header_pos = end.checked_sub(INSV_FRAME_HEADER_SIZE)
            .ok_or(InsvError::OutOfBounds {
                pos: 0,
                width: INSV_FRAME_HEADER_SIZE,
                len: end,
            })?;

        let version = cursor.read_u8(header_pos)?;
        let code = cursor.read_u8(header_pos + 1)?;
        let size = cursor.read_u32(header_pos + 2, Endian::Little)? as u64;

        if size > header_pos as u64 {
            return Err(InsvError::FrameOverrun {
                code,
                size,
                available: header_pos as u64,
            });
        }

        let header = Self {
            frame_type: FrameType::from_code(code),
            frame_version: version,
            frame_size: size,
            frame_pos: cursor.absolute(header_pos - size as usize),
        };

        Ok((code, header))
    }

    /// Header for bytes not covered by any frame.
    pub fn raw(frame_pos: u64, frame_size: u64) -> Self {
        Self {
            frame_type: FrameType::Raw,
            frame_version: 0,
            frame_size,
            frame_pos,
        }
    }

    /// Absolute offset of the first byte after payload and header.
    pub fn end_pos(&self) -> u64 {
        match self.frame_type {
            FrameType::Raw => self.frame_pos + self.frame_size,
            _ => self.frame_pos + self.frame_size + INSV_FRAME_HEADER_SIZE as u64,
        }
    }
}

/// Entry in an `INDEX` frame. Unlike the frame header,
/// type precedes version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct IndexEntry {
    pub code: u8,
    pub version: u8,
    pub size: u32,
    /// Payload offset relative to the start of the metadata block.
    pub offset: u32,
}

impl super::FixedRecord for IndexEntry {
    const WIDTH: usize = INSV_INDEX_ENTRY_SIZE;
}

impl IndexEntry {
    /// All zero type, version and size mark an unused slot.
    pub fn is_empty(&self) -> bool {
        self.code == 0 && self.version == 0 && self.size == 0
    }

    /// Absolute payload position.
    pub fn pos(&self, metadata_pos: u64) -> u64 {
        metadata_pos + self.offset as u64
    }

    pub fn header(&self, metadata_pos: u64) -> FrameHeader {
        FrameHeader {
            frame_type: FrameType::from_code(self.code),
            frame_version: self.version,
            frame_size: self.size as u64,
            frame_pos: self.pos(metadata_pos),
        }
    }
}

/// Frame with raw payload and, if decoded, its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: FrameHeader,
    /// Payload bytes, always retained.
    pub raw: Vec<u8>,
    /// Decoded payload. `None` if unknown, not enabled, or undecodable.
    pub content: Option<Content>,
}

impl Frame {
    pub fn new(header: FrameHeader, raw: &[u8]) -> Self {
        Self {
            header,
            raw: raw.to_owned(),
            content: None,
        }
    }

    pub fn frame_type(&self) -> FrameType {
        self.header.frame_type
    }

    pub fn parsed(&self) -> bool {
        self.content.is_some()
    }

    /// Returns `true` for bytes not covered by any frame.
    pub fn is_raw(&self) -> bool {
        self.header.frame_type == FrameType::Raw
    }

    /// Payload as a cursor, with absolute offsets.
    pub fn cursor(&self) -> ByteCursor {
        ByteCursor::new(&self.raw, self.header.frame_pos)
    }

    /// Number of decoded records, `None` if unparsed.
    pub fn record_count(&self) -> Option<usize> {
        self.content.as_ref().map(|c| c.len())
    }
}
