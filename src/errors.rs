//! INSV errors.

use std::fmt;
use std::path::PathBuf;

/// Broad error category. Decides whether an error aborts
/// the current file or only the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File unreadable or truncated. Fatal for the file.
    Io,
    /// Trailer or frame headers inconsistent with file bounds.
    /// Fatal for the file.
    Format,
    /// A single frame's payload could not be decoded.
    /// Recovered as an unparsed frame.
    FrameDecode,
    /// Invalid command line input or output target.
    Usage,
}

#[derive(Debug)]
pub enum InsvError {
    /// Read beyond the end of a byte slice.
    OutOfBounds {
        pos: usize,
        width: usize,
        len: usize,
    },
    /// No trailer signature at end of file.
    NoMetadata(Option<PathBuf>),
    /// Trailer version other than 3.
    UnsupportedVersion(u32),
    /// Metadata size in trailer does not fit the file.
    MetadataBounds {
        size: u64,
        file_size: u64,
    },
    /// Frame header declares a payload extending
    /// past the start of the metadata block.
    FrameOverrun {
        code: u8,
        size: u64,
        available: u64,
    },
    /// Frame size is not a multiple of its record width.
    FrameSize {
        frame_size: usize,
        record_width: usize,
    },
    /// Camera info has no gyro field, so the gyro record width is unknown.
    MissingGyroSize,
    /// Gyro record width too small to hold a timestamp.
    InvalidGyroSize(usize),
    /// Camera info payload could not be decoded.
    InfoDecode(String),
    /// `INFO` frame version other than 1 (protobuf).
    UnsupportedInfoVersion(u8),
    /// Timestamp can not be represented as a date time.
    InvalidDateTime(String),
    /// Index frame content is inconsistent.
    InvalidIndex(String),
    /// Error reading binary data.
    BinReadError(binrw::Error),
    /// IO error.
    IOError(std::io::Error),
    /// JSON serialization error.
    JsonError(serde_json::Error),
    /// Refusing to overwrite existing output.
    OutputExists(PathBuf),
    /// No frame with specified type code.
    FrameTypeNotFound(u8),
    /// Not a file with an INSV trailer, or not a file at all.
    InvalidFileType(PathBuf),
}

impl InsvError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IOError(_) => ErrorKind::Io,
            Self::NoMetadata(_)
            | Self::UnsupportedVersion(_)
            | Self::MetadataBounds { .. }
            | Self::FrameOverrun { .. }
            | Self::InvalidIndex(_) => ErrorKind::Format,
            Self::OutOfBounds { .. }
            | Self::FrameSize { .. }
            | Self::MissingGyroSize
            | Self::InvalidGyroSize(_)
            | Self::InfoDecode(_)
            | Self::UnsupportedInfoVersion(_)
            | Self::InvalidDateTime(_)
            | Self::BinReadError(_) => ErrorKind::FrameDecode,
            Self::JsonError(_)
            | Self::OutputExists(_)
            | Self::FrameTypeNotFound(_)
            | Self::InvalidFileType(_) => ErrorKind::Usage,
        }
    }

    /// Returns `true` if the error aborts reading the whole file.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io | ErrorKind::Format)
    }
}

impl std::error::Error for InsvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BinReadError(err) => Some(err),
            Self::IOError(err) => Some(err),
            Self::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for InsvError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos, width, len } => write!(
                f,
                "Read of {width} bytes at position {pos} exceeds buffer of length {len}"
            ),
            Self::NoMetadata(path) => match path {
                Some(p) => write!(f, "No valid INSV metadata found in {}", p.display()),
                None => write!(f, "No valid INSV metadata found"),
            },
            Self::UnsupportedVersion(v) => write!(f, "Unsupported file version {v}"),
            Self::MetadataBounds { size, file_size } => write!(
                f,
                "Metadata size {size} is out of bounds for file of size {file_size}"
            ),
            Self::FrameOverrun { code, size, available } => write!(
                f,
                "Frame with type {code} declares {size} bytes, but only {available} bytes remain in metadata block"
            ),
            Self::FrameSize { frame_size, record_width } => write!(
                f,
                "Frame size {frame_size} is not a multiple of record width {record_width}"
            ),
            Self::MissingGyroSize => write!(f, "No gyro record size in camera info"),
            Self::InvalidGyroSize(size) => write!(f, "Invalid gyro record size {size}"),
            Self::InfoDecode(s) => write!(f, "Failed to decode camera info: {s}"),
            Self::UnsupportedInfoVersion(v) => write!(f, "Unsupported INFO frame version {v}"),
            Self::InvalidDateTime(s) => write!(f, "Invalid date time: {s}"),
            Self::InvalidIndex(s) => write!(f, "Invalid index frame: {s}"),
            Self::BinReadError(err) => write!(f, "{err}"),
            Self::IOError(err) => write!(f, "IO error: {err}"),
            Self::JsonError(err) => write!(f, "JSON error: {err}"),
            Self::OutputExists(path) => write!(f, "File {} already exists", path.display()),
            Self::FrameTypeNotFound(code) => write!(f, "Frame type {code} not found"),
            Self::InvalidFileType(path) => write!(f, "Invalid file type: {}", path.display()),
        }
    }
}

/// Converts std::io::Error to InsvError
impl From<std::io::Error> for InsvError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err)
    }
}

/// Converts binrw::Error to InsvError
impl From<binrw::Error> for InsvError {
    fn from(err: binrw::Error) -> Self {
        Self::BinReadError(err)
    }
}

/// Converts protobuf::Error to InsvError
impl From<protobuf::Error> for InsvError {
    fn from(err: protobuf::Error) -> Self {
        Self::InfoDecode(err.to_string())
    }
}

/// Converts serde_json::Error to InsvError
impl From<serde_json::Error> for InsvError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err)
    }
}
