pub mod error;
pub mod field;
pub mod field_type;
pub mod row;
pub mod value;

// Common type aliases
pub type FieldIndex = usize;
pub type RecordPosition = u64;

// On-disk layout constants
pub const HEADER_SIZE: usize = 512; // File header, always present
pub const FILE_TYPE_TAG_SIZE: usize = 64; // Latin-1 file type tag at the start of the header
pub const LZF_BUFFER_SIZE: usize = 262_144; // Largest decompressed block
pub const BLOCK_LENGTH_SIZE: usize = 4; // Length prefix of every data block
pub const VAR_LENGTH_SIZE: usize = 4; // Variable data length after the fixed record part
