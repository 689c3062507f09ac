use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{
    codec::decode_latin1,
    storage::{AMP_FILE_TYPE, FILE_ID_OFFSET, META_INFO_SIZE_OFFSET, NUM_RECORDS_OFFSET, YXDB_FILE_TYPE_PREFIX},
    types::{
        FILE_TYPE_TAG_SIZE, HEADER_SIZE,
        error::{Result, YxdbError},
    },
};

/*
 * Header layout (512 bytes, little-endian)
 * ┌──────────────────────────────────────────────────────────┐
 * │ 0    file type tag, 64 bytes Latin-1, NUL/space padded    │
 * │ 64   file id (i64)                                        │
 * │ 72   creation date (i64)                                  │
 * │ 80   metadata length in UTF-16 code units (i32),          │
 * │      including the terminating NUL                        │
 * │ 104  record count (i64)                                   │
 * │ ...  reserved                                             │
 * └──────────────────────────────────────────────────────────┘
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YxdbHeader {
    pub file_type: String,
    pub file_id: i64,
    pub creation_date: i64,
    pub meta_info_size: i32,
    pub num_records: i64,
}

impl YxdbHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(YxdbError::InvalidHeader {
                reason: "invalid header".to_string(),
            });
        }

        let file_type = decode_latin1(&bytes[..FILE_TYPE_TAG_SIZE])
            .trim_matches(|c: char| c <= ' ')
            .to_string();
        if file_type == AMP_FILE_TYPE {
            return Err(YxdbError::UnsupportedFormat);
        }
        if !file_type.starts_with(YXDB_FILE_TYPE_PREFIX) {
            return Err(YxdbError::InvalidHeader {
                reason: "invalid file type".to_string(),
            });
        }

        let mut cursor = Cursor::new(bytes);

        cursor.set_position(FILE_ID_OFFSET);
        let file_id = cursor.read_i64::<LittleEndian>()?;
        let creation_date = cursor.read_i64::<LittleEndian>()?;

        cursor.set_position(META_INFO_SIZE_OFFSET);
        let meta_info_size = cursor.read_i32::<LittleEndian>()?;

        cursor.set_position(NUM_RECORDS_OFFSET);
        let num_records = cursor.read_i64::<LittleEndian>()?;

        if meta_info_size < 1 {
            return Err(YxdbError::InvalidHeader {
                reason: format!("invalid metadata length {}", meta_info_size),
            });
        }
        if num_records < 0 {
            return Err(YxdbError::InvalidHeader {
                reason: format!("invalid record count {}", num_records),
            });
        }

        Ok(Self {
            file_type,
            file_id,
            creation_date,
            meta_info_size,
            num_records,
        })
    }

    /// Bytes of UTF-16LE metadata text, excluding the 2-byte terminator.
    pub fn meta_info_byte_len(&self) -> usize {
        (self.meta_info_size as usize - 1) * 2
    }
}
