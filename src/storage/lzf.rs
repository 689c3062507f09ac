use crate::types::error::{Result, YxdbError};

/*
 * LZF block format
 *
 * A block is a sequence of chunks, each starting with a control byte:
 *   ctrl < 32    literal run: the next ctrl + 1 bytes are copied as is
 *   ctrl >= 32   back reference: length = ctrl >> 5 (7 means "read one more
 *                length byte and add it"), plus 2; distance =
 *                ((ctrl & 0x1f) << 8 | next byte) + 1 back from the output end
 */

const MAX_LITERAL: u8 = 1 << 5;
const EXTENDED_LENGTH: usize = 7;

/// Decompresses `input` into `output`, returning the number of bytes
/// written.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut ip = 0;
    let mut op = 0;

    while ip < input.len() {
        let ctrl = input[ip];
        ip += 1;

        if ctrl < MAX_LITERAL {
            let len = ctrl as usize + 1;
            if ip + len > input.len() {
                return Err(corrupted("literal run past end of input"));
            }
            if op + len > output.len() {
                return Err(corrupted("output buffer too small"));
            }
            output[op..op + len].copy_from_slice(&input[ip..ip + len]);
            ip += len;
            op += len;
            continue;
        }

        let mut len = (ctrl >> 5) as usize;
        if len == EXTENDED_LENGTH {
            len += *input
                .get(ip)
                .ok_or_else(|| corrupted("missing extended length"))? as usize;
            ip += 1;
        }
        len += 2;

        let low = *input
            .get(ip)
            .ok_or_else(|| corrupted("missing back reference offset"))? as usize;
        ip += 1;
        let distance = (((ctrl & 0x1f) as usize) << 8 | low) + 1;

        if distance > op {
            return Err(corrupted("back reference before start of output"));
        }
        if op + len > output.len() {
            return Err(corrupted("output buffer too small"));
        }

        // Source and destination may overlap, so copy byte by byte.
        let mut reference = op - distance;
        for _ in 0..len {
            output[op] = output[reference];
            op += 1;
            reference += 1;
        }
    }

    Ok(op)
}

fn corrupted(reason: &str) -> YxdbError {
    YxdbError::CorruptedBlock {
        reason: reason.to_string(),
    }
}
