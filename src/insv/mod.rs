pub mod cursor;
pub mod dump;
pub mod frame;
pub mod frame_type;
pub mod header;
pub mod insv;
pub mod options;
pub mod reader;
pub mod scan;

pub use cursor::{ByteCursor, FixedRecord};
pub use frame::{Frame, FrameHeader, IndexEntry};
pub use frame_type::{Decoder, FrameSpec, FrameType, FRAME_CATALOG, OPTIONAL_TYPES};
pub use header::MetadataBlockHeader;
pub use insv::{FrameCount, InsvMetadata};
pub use options::ParseOptions;
pub use reader::{FrameReader, Layout};
pub use scan::{scan_files, ScanSummary};
