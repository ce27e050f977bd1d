//! INSV metadata block trailer.
//!
//! The last 72 bytes of an INSV file:
//!
//! | Offset | Size | Content                                  |
//! |--------|------|------------------------------------------|
//! | 0      | 32   | Reserved                                 |
//! | 32     | 4    | Metadata block size, trailer included    |
//! | 36     | 4    | Version (3)                              |
//! | 40     | 32   | Signature `8db42d694ccc418790edff439fe026bf` |
//!
//! All values little-endian. The metadata block starts at
//! `file length - metadata size`.

use std::io::{Cursor, Read, Seek, SeekFrom};

use binrw::BinRead;
use serde::Serialize;

use crate::{
    constants::{INSV_SIGNATURE, INSV_SUPPORTED_VERSION, INSV_TRAILER_SIZE},
    InsvError,
};

/// Trailer as stored on disk.
#[derive(Debug, Clone, BinRead)]
#[br(little)]
struct Trailer {
    reserved: [u8; 32],
    metadata_size: u32,
    version: u32,
    signature: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataBlockHeader {
    pub version: u32,
    /// Size of the metadata block, trailer included.
    #[serde(rename = "metaDataSize")]
    pub metadata_size: u64,
    /// Absolute file offset of the metadata block.
    #[serde(rename = "metaDataPos")]
    pub metadata_pos: u64,
    #[serde(skip)]
    pub reserved: [u8; 32],
}

impl MetadataBlockHeader {
    /// Locate the metadata block and read its body,
    /// i.e. everything between metadata start and trailer.
    ///
    /// Reads the trailer at end of file first, then seeks
    /// to the computed metadata position for the body.
    pub fn locate<R: Read + Seek>(reader: &mut R) -> Result<(Self, Vec<u8>), InsvError> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        if file_size < INSV_TRAILER_SIZE as u64 {
            log::debug!("File size {file_size} smaller than trailer");
            return Err(InsvError::NoMetadata(None));
        }

        reader.seek(SeekFrom::End(-(INSV_TRAILER_SIZE as i64)))?;
        let mut buf = vec![0_u8; INSV_TRAILER_SIZE];
        reader.read_exact(&mut buf)?;

        let header = Self::from_trailer(&buf, file_size)?;
        log::debug!(
            "Metadata block version {} at {}, {} bytes",
            header.version,
            header.metadata_pos,
            header.metadata_size
        );

        reader.seek(SeekFrom::Start(header.metadata_pos))?;
        let mut body = vec![0_u8; header.frames_size() as usize];
        reader.read_exact(&mut body)?;

        Ok((header, body))
    }

    /// Validate a raw trailer against the file size.
    pub fn from_trailer(trailer: &[u8], file_size: u64) -> Result<Self, InsvError> {
        if trailer.len() != INSV_TRAILER_SIZE {
            return Err(InsvError::NoMetadata(None));
        }
        let trailer = Trailer::read(&mut Cursor::new(trailer))?;

        if &trailer.signature != INSV_SIGNATURE {
            return Err(InsvError::NoMetadata(None));
        }
        if trailer.version != INSV_SUPPORTED_VERSION {
            return Err(InsvError::UnsupportedVersion(trailer.version));
        }

        let metadata_size = trailer.metadata_size as u64;
        if metadata_size < INSV_TRAILER_SIZE as u64 || metadata_size > file_size {
            return Err(InsvError::MetadataBounds {
                size: metadata_size,
                file_size,
            });
        }

        Ok(Self {
            version: trailer.version,
            metadata_size,
            metadata_pos: file_size - metadata_size,
            reserved: trailer.reserved,
        })
    }

    /// Size of the frame region, i.e. metadata block minus trailer.
    pub fn frames_size(&self) -> u64 {
        self.metadata_size - INSV_TRAILER_SIZE as u64
    }

    /// Absolute offset where the frame region ends and the trailer starts.
    pub fn frames_end(&self) -> u64 {
        self.metadata_pos + self.frames_size()
    }

    /// File size implied by the trailer.
    pub fn file_size(&self) -> u64 {
        self.metadata_pos + self.metadata_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trailer(metadata_size: u32, version: u32) -> Vec<u8> {
        let mut b = vec![0_u8; 32];
        b.extend(metadata_size.to_le_bytes());
        b.extend(version.to_le_bytes());
        b.extend(INSV_SIGNATURE);
        b
    }

    #[test]
    fn trailer_arithmetic() {
        // 100 bytes video, 10 bytes frames, trailer
        let mut file = vec![0xaa_u8; 100];
        file.extend([1_u8; 10]);
        file.extend(trailer(82, 3));
        let len = file.len() as u64;

        let (header, body) = MetadataBlockHeader::locate(&mut Cursor::new(file)).unwrap();
        assert_eq!(header.metadata_pos, 100);
        assert_eq!(header.frames_size(), 10);
        assert_eq!(header.frames_end(), 110);
        assert_eq!(header.metadata_pos + header.metadata_size, len);
        assert_eq!(body, vec![1_u8; 10]);

        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["metaDataSize"], 82);
        assert_eq!(json["metaDataPos"], 100);
        assert!(json.get("reserved").is_none());
    }

    #[test]
    fn invalid_trailers() {
        let mut bad_sig = trailer(72, 3);
        bad_sig[71] = b'x';
        assert!(matches!(
            MetadataBlockHeader::from_trailer(&bad_sig, 72),
            Err(InsvError::NoMetadata(_))
        ));
        assert!(matches!(
            MetadataBlockHeader::from_trailer(&trailer(72, 2), 72),
            Err(InsvError::UnsupportedVersion(2))
        ));
        assert!(matches!(
            MetadataBlockHeader::from_trailer(&trailer(500, 3), 200),
            Err(InsvError::MetadataBounds { size: 500, file_size: 200 })
        ));
        assert!(matches!(
            MetadataBlockHeader::from_trailer(&trailer(10, 3), 200),
            Err(InsvError::MetadataBounds { .. })
        ));
        assert!(matches!(
            MetadataBlockHeader::locate(&mut Cursor::new(vec![0_u8; 40])),
            Err(InsvError::NoMetadata(_))
        ));
    }
}
