//! Pure decoding of record buffers.
//!
//! Nothing here performs I/O or keeps state between calls: every function
//! takes the record buffer and a start offset and returns the decoded value.
//! Reads past the end of the buffer surface as
//! [`YxdbError::TruncatedRecord`] instead of panicking.

pub mod blob;
pub mod extract;
pub mod spatial;

use crate::types::error::{Result, YxdbError};

/// Marker byte value flagging a null fixed-size field.
pub const NULL_MARKER: u8 = 1;

pub(crate) fn slice_at(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(YxdbError::TruncatedRecord {
            offset,
            needed: len,
            len: buf.len(),
        })
}

pub(crate) fn array_at<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let bytes = slice_at(buf, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

pub(crate) fn byte_at(buf: &[u8], offset: usize) -> Result<u8> {
    buf.get(offset).copied().ok_or(YxdbError::TruncatedRecord {
        offset,
        needed: 1,
        len: buf.len(),
    })
}

pub(crate) fn u32_at(buf: &[u8], offset: usize) -> Result<u32> {
    Ok(u32::from_le_bytes(array_at(buf, offset)?))
}

pub(crate) fn is_null_marker(buf: &[u8], offset: usize) -> Result<bool> {
    Ok(byte_at(buf, offset)? == NULL_MARKER)
}

/// ISO-8859-1 maps every byte straight onto the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// UTF-16LE with unpaired surrogates replaced by U+FFFD. A trailing odd byte
/// is ignored.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
