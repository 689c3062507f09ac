use crate::{
    codec::{byte_at, slice_at, u32_at},
    types::error::Result,
};

/*
 * Variable-length field layout
 *
 * The fixed part of the record holds a 4-byte LE descriptor at the field's
 * start offset:
 *
 *   0x00000000                 empty sequence
 *   0x00000001                 null
 *   tiny                       top bit clear and bit 28 or 29 set: the length
 *                              is descriptor >> 28 and the payload is stored
 *                              in the low bytes of the descriptor itself
 *   anything else              block at field start + (descriptor & 0x7fffffff)
 *
 * A block starting with an odd byte is a small block:
 *   [len << 1 | 1][payload ...]
 * otherwise it is a normal block:
 *   [LE u32 len * 2][payload ...]
 */

const EMPTY_DESCRIPTOR: u32 = 0;
const NULL_DESCRIPTOR: u32 = 1;
const HIGH_BIT: u32 = 0x8000_0000;
const TINY_LENGTH_BITS: u32 = 0x3000_0000;
const BLOCK_OFFSET_MASK: u32 = 0x7fff_ffff;

/// How a variable-length value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobEncoding {
    Empty,
    Null,
    Tiny,
    SmallBlock,
    NormalBlock,
}

pub fn is_tiny(descriptor: u32) -> bool {
    descriptor & HIGH_BIT == 0 && descriptor & TINY_LENGTH_BITS != 0
}

/// Classifies the variable-length value stored at `start`.
pub fn encoding_at(buf: &[u8], start: usize) -> Result<BlobEncoding> {
    let descriptor = u32_at(buf, start)?;
    Ok(match descriptor {
        EMPTY_DESCRIPTOR => BlobEncoding::Empty,
        NULL_DESCRIPTOR => BlobEncoding::Null,
        d if is_tiny(d) => BlobEncoding::Tiny,
        d => {
            let block_start = block_start(start, d);
            if byte_at(buf, block_start)? & 1 == 1 {
                BlobEncoding::SmallBlock
            } else {
                BlobEncoding::NormalBlock
            }
        }
    })
}

/// Decodes the variable-length value whose descriptor sits at `start`,
/// borrowing the payload from `buf`. `Ok(None)` is an in-band null.
pub fn decode_blob(buf: &[u8], start: usize) -> Result<Option<&[u8]>> {
    let descriptor = u32_at(buf, start)?;

    if descriptor == EMPTY_DESCRIPTOR {
        return Ok(Some(&[]));
    }
    if descriptor == NULL_DESCRIPTOR {
        return Ok(None);
    }
    if is_tiny(descriptor) {
        let length = (descriptor >> 28) as usize;
        return slice_at(buf, start, length).map(Some);
    }

    let block_start = block_start(start, descriptor);
    let first_byte = byte_at(buf, block_start)?;
    if first_byte & 1 == 1 {
        let length = (first_byte >> 1) as usize;
        slice_at(buf, block_start + 1, length).map(Some)
    } else {
        // The low bit of the length word is the small-block flag, always clear here.
        let length = (u32_at(buf, block_start)? / 2) as usize;
        slice_at(buf, block_start + 4, length).map(Some)
    }
}

fn block_start(start: usize, descriptor: u32) -> usize {
    start + (descriptor & BLOCK_OFFSET_MASK) as usize
}
