use thiserror::Error;

/// Broad category of a [`YxdbError`].
///
/// Format and metadata errors are fatal to the whole file. Field access and
/// decode errors are local to a single read and leave the reader usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Metadata,
    FieldAccess,
    Decode,
}

#[derive(Error, Debug)]
pub enum YxdbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is not a valid YXDB file - {reason}.")]
    InvalidHeader { reason: String },

    #[error("Reading AMP YXDB files is not supported.")]
    UnsupportedFormat,

    #[error("File is not a valid YXDB file - truncated metadata: expected {expected} bytes, got {actual}")]
    TruncatedMetadata { expected: usize, actual: usize },

    #[error("Record stream ended early: {details}")]
    TruncatedStream { details: String },

    #[error("Record buffer too short: needed {needed} bytes at offset {offset}, buffer holds {len}")]
    TruncatedRecord {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("Corrupted LZF block: {reason}")]
    CorruptedBlock { reason: String },

    #[error("Field is missing required attribute: {attribute}")]
    MissingAttribute { attribute: String },

    #[error("Field {field} is missing required attribute: {attribute}")]
    MissingFieldAttribute { field: String, attribute: String },

    #[error("Field {field} has invalid integer value for attribute: {attribute}")]
    InvalidAttribute { field: String, attribute: String },

    #[error("Unknown field type: {name}")]
    UnknownFieldType { name: String },

    #[error("Invalid metadata XML: {details}")]
    InvalidMetadata { details: String },

    #[error("field {name} does not exist")]
    UnknownField { name: String },

    #[error("index {index} is not a valid index (field count: {count})")]
    FieldIndexOutOfBounds { index: usize, count: usize },

    #[error("index {index} is not a {expected} field")]
    TypeMismatch { index: usize, expected: String },

    #[error("No current record: call next() before reading fields")]
    NoCurrentRecord,

    #[error("bytes are not a valid spatial object")]
    InvalidSpatialObject,

    #[error("Invalid fixed decimal text: '{text}'")]
    InvalidDecimal { text: String },

    #[error("Invalid {expected} text: '{text}'")]
    InvalidTemporal { expected: &'static str, text: String },
}

impl YxdbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            YxdbError::Io(_)
            | YxdbError::InvalidHeader { .. }
            | YxdbError::UnsupportedFormat
            | YxdbError::TruncatedMetadata { .. }
            | YxdbError::TruncatedStream { .. }
            | YxdbError::TruncatedRecord { .. }
            | YxdbError::CorruptedBlock { .. } => ErrorKind::Format,
            YxdbError::MissingAttribute { .. }
            | YxdbError::MissingFieldAttribute { .. }
            | YxdbError::InvalidAttribute { .. }
            | YxdbError::UnknownFieldType { .. }
            | YxdbError::InvalidMetadata { .. } => ErrorKind::Metadata,
            YxdbError::UnknownField { .. }
            | YxdbError::FieldIndexOutOfBounds { .. }
            | YxdbError::TypeMismatch { .. }
            | YxdbError::NoCurrentRecord => ErrorKind::FieldAccess,
            YxdbError::InvalidSpatialObject
            | YxdbError::InvalidDecimal { .. }
            | YxdbError::InvalidTemporal { .. } => ErrorKind::Decode,
        }
    }
}

pub type Result<T> = std::result::Result<T, YxdbError>;
