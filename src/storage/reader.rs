use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::{
    codec::decode_utf16le,
    storage::{
        catalog::{FieldCatalog, FieldKey},
        header::YxdbHeader,
        metadata::parse_record_info,
        record_source::{BlockRecordReader, RecordSource},
    },
    types::{
        HEADER_SIZE, RecordPosition,
        error::{Result, YxdbError},
        field::FieldDescriptor,
        value::Value,
    },
};

const META_INFO_TERMINATOR_SIZE: usize = 2;

/// Reads a .yxdb file one record at a time.
///
/// ```no_run
/// use yxdb::storage::reader::YxdbReader;
///
/// let mut reader = YxdbReader::open("data.yxdb")?;
/// while reader.next()? {
///     let id = reader.read_long("Id")?;
///     println!("{:?}", id);
/// }
/// # Ok::<(), yxdb::types::error::YxdbError>(())
/// ```
///
/// Reading past the last record closes the underlying stream. Any error while
/// opening drops the stream before it is returned.
pub struct YxdbReader<R: Read = BufReader<File>> {
    header: YxdbHeader,
    meta_info: String,
    catalog: FieldCatalog,
    records: BlockRecordReader<R>,
    has_record: bool,
}

impl YxdbReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening yxdb file");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read> YxdbReader<R> {
    pub fn from_reader(mut stream: R) -> Result<Self> {
        let header = read_header(&mut stream)?;
        let meta_info = read_meta_info(&mut stream, &header)?;
        let catalog = FieldCatalog::build(parse_record_info(&meta_info)?)?;

        debug!(
            file_type = %header.file_type,
            records = header.num_records,
            fields = catalog.len(),
            fixed_size = catalog.fixed_size(),
            variable_length = catalog.has_variable_length(),
            "loaded yxdb metadata"
        );

        let records = BlockRecordReader::new(
            stream,
            catalog.fixed_size(),
            catalog.has_variable_length(),
            header.num_records as RecordPosition,
        );

        Ok(Self {
            header,
            meta_info,
            catalog,
            records,
            has_record: false,
        })
    }

    pub fn header(&self) -> &YxdbHeader {
        &self.header
    }

    pub fn num_records(&self) -> RecordPosition {
        self.header.num_records as RecordPosition
    }

    /// The raw metadata XML.
    pub fn meta_info_xml(&self) -> &str {
        &self.meta_info
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        self.catalog.fields()
    }

    /// Advances to the next record. Returns `false` at the end of the file.
    pub fn next(&mut self) -> Result<bool> {
        self.has_record = false;
        self.has_record = self.records.advance()?;
        Ok(self.has_record)
    }

    /// Zero-based position of the current record.
    pub fn position(&self) -> Option<RecordPosition> {
        self.has_record.then(|| self.records.records_read() - 1)
    }

    /// The current record's bytes.
    pub fn record_buffer(&self) -> Result<&[u8]> {
        if !self.has_record {
            return Err(YxdbError::NoCurrentRecord);
        }
        Ok(self.records.buffer())
    }

    pub fn close(&mut self) {
        self.has_record = false;
        self.records.close();
    }

    pub fn is_closed(&self) -> bool {
        self.records.is_closed()
    }

    pub fn read<K: FieldKey>(&self, key: K) -> Result<Value> {
        self.catalog.read(key, self.record_buffer()?)
    }

    pub fn read_all(&self) -> Result<Vec<Value>> {
        self.catalog.read_all(self.record_buffer()?)
    }

    pub fn read_bool<K: FieldKey>(&self, key: K) -> Result<Option<bool>> {
        self.catalog.read_bool(key, self.record_buffer()?)
    }

    pub fn read_byte<K: FieldKey>(&self, key: K) -> Result<Option<u8>> {
        self.catalog.read_byte(key, self.record_buffer()?)
    }

    pub fn read_long<K: FieldKey>(&self, key: K) -> Result<Option<i64>> {
        self.catalog.read_long(key, self.record_buffer()?)
    }

    pub fn read_double<K: FieldKey>(&self, key: K) -> Result<Option<f64>> {
        self.catalog.read_double(key, self.record_buffer()?)
    }

    pub fn read_decimal<K: FieldKey>(&self, key: K) -> Result<Option<BigDecimal>> {
        self.catalog.read_decimal(key, self.record_buffer()?)
    }

    pub fn read_string<K: FieldKey>(&self, key: K) -> Result<Option<String>> {
        self.catalog.read_string(key, self.record_buffer()?)
    }

    pub fn read_date<K: FieldKey>(&self, key: K) -> Result<Option<NaiveDate>> {
        self.catalog.read_date(key, self.record_buffer()?)
    }

    pub fn read_time<K: FieldKey>(&self, key: K) -> Result<Option<NaiveTime>> {
        self.catalog.read_time(key, self.record_buffer()?)
    }

    pub fn read_datetime<K: FieldKey>(&self, key: K) -> Result<Option<NaiveDateTime>> {
        self.catalog.read_datetime(key, self.record_buffer()?)
    }

    pub fn read_blob<K: FieldKey>(&self, key: K) -> Result<Option<Vec<u8>>> {
        self.catalog.read_blob(key, self.record_buffer()?)
    }

    pub fn read_spatial<K: FieldKey>(&self, key: K) -> Result<Option<String>> {
        self.catalog.read_spatial(key, self.record_buffer()?)
    }
}

fn read_header<R: Read>(stream: &mut R) -> Result<YxdbHeader> {
    let mut bytes = Vec::with_capacity(HEADER_SIZE);
    stream.take(HEADER_SIZE as u64).read_to_end(&mut bytes)?;
    YxdbHeader::from_bytes(&bytes)
}

fn read_meta_info<R: Read>(stream: &mut R, header: &YxdbHeader) -> Result<String> {
    let expected = header.meta_info_byte_len() + META_INFO_TERMINATOR_SIZE;
    let mut bytes = Vec::new();
    stream.take(expected as u64).read_to_end(&mut bytes)?;
    if bytes.len() < expected {
        return Err(YxdbError::TruncatedMetadata {
            expected,
            actual: bytes.len(),
        });
    }
    bytes.truncate(header.meta_info_byte_len());
    Ok(decode_utf16le(&bytes))
}
