//! Splits the metadata block body into frames.
//!
//! Frame headers trail their payload, so frames are found by walking
//! backwards from the trailer. If an `INDEX` frame is encountered
//! and its entries are consistent, the remaining frames are sliced
//! directly from the index instead.
//!
//! Bytes not covered by any frame are kept as `RAW` pseudo-frames,
//! so that all bytes in the frame region are always accounted for.

use std::fmt::Display;

use crate::{
    constants::{INSV_FRAME_HEADER_SIZE, INSV_INDEX_ENTRY_SIZE},
    InsvError,
};

use super::{ByteCursor, Frame, FrameHeader, FrameType, IndexEntry, MetadataBlockHeader};

/// How frames were located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Frames read one by one via their headers.
    #[default]
    Sequential,
    /// Frames sliced via the entries of an `INDEX` frame.
    Indexed,
}

impl Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Indexed => write!(f, "indexed"),
        }
    }
}

pub struct FrameReader<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> FrameReader<'a> {
    /// Reader over the body returned by `MetadataBlockHeader::locate`.
    pub fn new(header: &MetadataBlockHeader, body: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(body, header.metadata_pos),
        }
    }

    /// Returns all frames in file order.
    ///
    /// A frame header declaring more bytes than what remains
    /// of the frame region is a fatal error. Leftover bytes at
    /// the start of the region are not.
    pub fn frames(&self) -> Result<(Vec<Frame>, Layout), InsvError> {
        // Collected back to front
        let mut frames: Vec<Frame> = Vec::new();
        let mut layout = Layout::Sequential;
        let mut cur = self.cursor.len();

        while cur > 0 {
            if cur < INSV_FRAME_HEADER_SIZE {
                break;
            }

            let (code, header) = FrameHeader::read_backward(&self.cursor, cur)?;
            let start = cur - INSV_FRAME_HEADER_SIZE - header.frame_size as usize;
            let payload = self.cursor.read_bytes(start, header.frame_size as usize)?;

            log::trace!(
                "Frame type {code} ({}), version {}, {} bytes at {}",
                header.frame_type,
                header.frame_version,
                header.frame_size,
                header.frame_pos
            );

            frames.push(Frame::new(header, payload));
            cur = start;

            if header.frame_type == FrameType::Index {
                match self.indexed(&header, payload) {
                    Ok(indexed) => {
                        log::debug!("Using index with {} frames", indexed.len());
                        frames.extend(indexed.into_iter().rev());
                        layout = Layout::Indexed;
                        cur = 0;
                    }
                    Err(err) => log::warn!("{err}, reading frames sequentially"),
                }
            }
        }

        if cur > 0 {
            log::warn!(
                "{cur} bytes at {} not covered by any frame",
                self.cursor.absolute(0)
            );
            let raw = self.cursor.read_bytes(0, cur)?;
            frames.push(Frame::new(FrameHeader::raw(self.cursor.absolute(0), cur as u64), raw));
        }

        frames.reverse();

        Ok((frames, layout))
    }

    /// Decode index entries. Empty slots, entries of type `INDEX`,
    /// with size 0, or at/after the index frame itself are ignored.
    pub fn index_entries(
        payload: &[u8],
        metadata_pos: u64,
        index_pos: u64,
    ) -> Result<Vec<IndexEntry>, InsvError> {
        if payload.len() % INSV_INDEX_ENTRY_SIZE != 0 {
            return Err(InsvError::InvalidIndex(format!(
                "size {} is not a multiple of {INSV_INDEX_ENTRY_SIZE}",
                payload.len()
            )));
        }

        let cursor = ByteCursor::new(payload, 0);
        let entries = (0..payload.len() / INSV_INDEX_ENTRY_SIZE)
            .map(|i| cursor.read_record::<IndexEntry>(i * INSV_INDEX_ENTRY_SIZE))
            .collect::<Result<Vec<_>, InsvError>>()?
            .into_iter()
            .filter(|e| !e.is_empty())
            .filter(|e| e.code != 0 && e.size != 0 && e.pos(metadata_pos) < index_pos)
            .collect();

        Ok(entries)
    }

    /// Slice all frames preceding the index frame via its entries.
    /// Gaps between indexed frames are returned as `RAW` frames.
    fn indexed(&self, index: &FrameHeader, payload: &[u8]) -> Result<Vec<Frame>, InsvError> {
        let start = self.cursor.absolute(0);
        let mut entries = Self::index_entries(payload, start, index.frame_pos)?;
        if entries.is_empty() {
            return Err(InsvError::InvalidIndex("no usable entries".to_owned()));
        }
        entries.sort_by_key(|e| e.offset);

        let mut frames = Vec::new();
        let mut cur = start;

        for entry in entries.iter() {
            let header = entry.header(start);
            let end = header.end_pos();
            if end > index.frame_pos {
                return Err(InsvError::InvalidIndex(format!(
                    "frame type {} at {} with size {} outside frame region",
                    entry.code, header.frame_pos, entry.size
                )));
            }
            if header.frame_pos < cur {
                return Err(InsvError::InvalidIndex(format!(
                    "frame type {} at {} overlaps preceding frame",
                    entry.code, header.frame_pos
                )));
            }

            if header.frame_pos > cur {
                frames.push(self.raw_frame(cur, header.frame_pos)?);
            }

            let pos = self.relative(header.frame_pos)?;
            let payload = self.cursor.read_bytes(pos, entry.size as usize)?;
            self.check_header(&header, pos + entry.size as usize);

            frames.push(Frame::new(header, payload));
            cur = end;
        }

        if cur < index.frame_pos {
            frames.push(self.raw_frame(cur, index.frame_pos)?);
        }

        Ok(frames)
    }

    fn relative(&self, offset: u64) -> Result<usize, InsvError> {
        self.cursor.relative(offset)
            .ok_or_else(|| InsvError::InvalidIndex(format!("offset {offset} outside frame region")))
    }

    /// Bytes between two absolute offsets as a `RAW` frame.
    fn raw_frame(&self, from: u64, to: u64) -> Result<Frame, InsvError> {
        let pos = self.relative(from)?;
        let raw = self.cursor.read_bytes(pos, (to - from) as usize)?;
        log::debug!("{} bytes at {from} not covered by index", to - from);
        Ok(Frame::new(FrameHeader::raw(from, to - from), raw))
    }

    /// The index is trusted, a differing on-disk header is only logged.
    fn check_header(&self, indexed: &FrameHeader, header_pos: usize) {
        match FrameHeader::read_backward(&self.cursor, header_pos + INSV_FRAME_HEADER_SIZE) {
            Ok((_, on_disk)) if on_disk == *indexed => (),
            Ok((code, on_disk)) => log::warn!(
                "Index lists frame type {} with size {} at {}, header says type {code} with size {}",
                indexed.frame_type, indexed.frame_size, indexed.frame_pos, on_disk.frame_size
            ),
            Err(err) => log::warn!(
                "Failed to read header for indexed frame at {}: {err}",
                indexed.frame_pos
            ),
        }
    }
}
