/// Signature closing the INSV trailer, last 32 bytes of the file.
pub const INSV_SIGNATURE: &[u8; 32] = b"8db42d694ccc418790edff439fe026bf";
/// Trailer size: 32 reserved bytes, metadata size (u32),
/// version (u32), signature (32 bytes).
pub const INSV_TRAILER_SIZE: usize = 72;
/// Only trailer version supported so far.
pub const INSV_SUPPORTED_VERSION: u32 = 3;
/// Frame header size: version (u8), type (u8), payload size (u32).
/// The header follows its payload.
pub const INSV_FRAME_HEADER_SIZE: usize = 6;
/// Index entry: type (u8), version (u8), size (u32),
/// payload offset (u32) relative to the metadata block start.
pub const INSV_INDEX_ENTRY_SIZE: usize = 10;
/// Only `INFO` frame version that is protobuf encoded.
pub const INSV_INFO_PROTOBUF_VERSION: u8 = 1;
/// Camera info field holding a gyro sample record.
/// Its byte length is the gyro record width.
pub const INSV_INFO_GYRO_FIELD: u32 = 20;
/// Name of the camera info gyro field.
pub const INSV_INFO_GYRO_KEY: &str = "gyro";
/// File extensions known to carry an INSV trailer.
pub const INSV_EXTENSIONS: &[&str] = &["insv", "insp", "lrv"];
