use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{trace, warn};

use crate::{
    codec::u32_at,
    storage::lzf,
    types::{
        LZF_BUFFER_SIZE, RecordPosition, VAR_LENGTH_SIZE,
        error::{Result, YxdbError},
    },
};

const UNCOMPRESSED_BLOCK: u32 = 0x8000_0000;
const BLOCK_LENGTH_MASK: u32 = 0x7fff_ffff;

/// Forward-only supplier of record buffers.
pub trait RecordSource {
    /// Loads the next record. Returns `false` once every record was read.
    fn advance(&mut self) -> Result<bool>;

    /// The current record, valid until the next call to `advance`. Empty
    /// before the first successful `advance`.
    fn buffer(&self) -> &[u8];

    /// Releases the underlying stream. Safe to call more than once.
    fn close(&mut self);
}

/*
 * Record stream layout
 *
 * After the metadata, the file is a sequence of blocks:
 *   [LE u32 length][payload]
 * If the high bit of the length is set the payload (length & 0x7fffffff
 * bytes) is stored raw, otherwise it is LZF-compressed.
 *
 * Records are cut from the concatenated block payloads:
 *   [fixed part][LE u32 var length][var data]   when there are var fields
 *   [fixed part]                                otherwise
 * and may straddle block boundaries.
 */

pub struct BlockRecordReader<R: Read> {
    stream: Option<R>,
    fixed_size: usize,
    has_variable_length: bool,
    total_records: RecordPosition,
    records_read: RecordPosition,
    record: Vec<u8>,
    block: Vec<u8>,
    block_len: usize,
    block_pos: usize,
    compressed: Vec<u8>,
    blocks_read: u64,
}

impl<R: Read> BlockRecordReader<R> {
    pub fn new(
        stream: R,
        fixed_size: usize,
        has_variable_length: bool,
        total_records: RecordPosition,
    ) -> Self {
        Self {
            stream: Some(stream),
            fixed_size,
            has_variable_length,
            total_records,
            records_read: 0,
            record: Vec::with_capacity(fixed_size + VAR_LENGTH_SIZE),
            block: Vec::new(),
            block_len: 0,
            block_pos: 0,
            compressed: Vec::new(),
            blocks_read: 0,
        }
    }

    pub fn records_read(&self) -> RecordPosition {
        self.records_read
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    fn load_record(&mut self) -> Result<()> {
        self.record.clear();
        self.read_into_record(self.fixed_size)?;

        if self.has_variable_length {
            self.read_into_record(VAR_LENGTH_SIZE)?;
            let var_len = u32_at(&self.record, self.fixed_size)? as usize;
            self.read_into_record(var_len)?;
        }
        Ok(())
    }

    fn read_into_record(&mut self, mut remaining: usize) -> Result<()> {
        while remaining > 0 {
            if self.block_pos == self.block_len {
                self.load_next_block()?;
                continue;
            }
            let take = remaining.min(self.block_len - self.block_pos);
            self.record
                .extend_from_slice(&self.block[self.block_pos..self.block_pos + take]);
            self.block_pos += take;
            remaining -= take;
        }
        Ok(())
    }

    fn load_next_block(&mut self) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(YxdbError::TruncatedStream {
            details: "stream already closed".to_string(),
        })?;

        let length_word = stream
            .read_u32::<LittleEndian>()
            .map_err(|e| truncated(e, "block length"))?;
        let length = (length_word & BLOCK_LENGTH_MASK) as usize;
        // Neither a raw nor a compressed block may exceed the decompression buffer.
        if length > LZF_BUFFER_SIZE {
            return Err(YxdbError::CorruptedBlock {
                reason: format!(
                    "block length {} exceeds {} bytes",
                    length, LZF_BUFFER_SIZE
                ),
            });
        }

        if length_word & UNCOMPRESSED_BLOCK != 0 {
            self.block.resize(length, 0);
            stream
                .read_exact(&mut self.block)
                .map_err(|e| truncated(e, "uncompressed block"))?;
            self.block_len = length;
        } else {
            self.compressed.resize(length, 0);
            stream
                .read_exact(&mut self.compressed)
                .map_err(|e| truncated(e, "compressed block"))?;
            self.block.resize(LZF_BUFFER_SIZE, 0);
            self.block_len = lzf::decompress(&self.compressed, &mut self.block)?;
        }

        self.block_pos = 0;
        self.blocks_read += 1;
        trace!(
            block = self.blocks_read,
            stored = length,
            decoded = self.block_len,
            compressed = length_word & UNCOMPRESSED_BLOCK == 0,
            "loaded record block"
        );
        Ok(())
    }
}

impl<R: Read> RecordSource for BlockRecordReader<R> {
    fn advance(&mut self) -> Result<bool> {
        if self.records_read >= self.total_records || self.stream.is_none() {
            self.close();
            return Ok(false);
        }

        if let Err(e) = self.load_record() {
            warn!(
                record = self.records_read,
                total = self.total_records,
                error = %e,
                "record stream ended before the declared record count"
            );
            self.close();
            return Err(e);
        }

        self.records_read += 1;
        Ok(true)
    }

    fn buffer(&self) -> &[u8] {
        &self.record
    }

    fn close(&mut self) {
        self.stream = None;
    }
}

fn truncated(error: io::Error, what: &str) -> YxdbError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        YxdbError::TruncatedStream {
            details: format!("unexpected end of file while reading {}", what),
        }
    } else {
        YxdbError::Io(error)
    }
}
