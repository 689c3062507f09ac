use std::io::Cursor;

use chrono::{NaiveDate, NaiveTime};
use yxdb::{
    storage::reader::YxdbReader,
    types::{
        error::{ErrorKind, YxdbError},
        value::Value,
    },
    utils::mock::TempYxdbFile,
};

use crate::common::{
    ALL_TYPES_FIXED_SIZE, FILE_TYPE, RecordBuilder, SINGLE_RECORD_FIXED_SIZE, all_types_fields,
    all_types_null_record, all_types_record, field, header, lzf_literal_block, preamble,
    record_info_xml, single_record_file, yxdb_file, yxdb_file_with_blocks,
};

fn all_types_file() -> Vec<u8> {
    yxdb_file(
        &all_types_fields(),
        &[all_types_record(1), all_types_null_record(), all_types_record(3)],
    )
}

fn int_records(ids: &[i32]) -> Vec<Vec<u8>> {
    ids.iter()
        .map(|&id| {
            let mut builder = RecordBuilder::new(5);
            builder.int32(Some(id));
            builder.fixed_only()
        })
        .collect()
}

#[test]
fn test_open_reads_header_and_catalog() {
    let file = TempYxdbFile::with_prefix("reader_open", &all_types_file()).unwrap();
    let reader = file.open().unwrap();

    assert_eq!(reader.num_records(), 3);
    assert_eq!(reader.header().file_type, FILE_TYPE);
    assert_eq!(reader.fields().len(), 17);
    assert_eq!(reader.catalog().fixed_size(), ALL_TYPES_FIXED_SIZE);
    assert!(reader.catalog().has_variable_length());
    assert_eq!(reader.meta_info_xml(), record_info_xml(&all_types_fields()));
}

#[test]
fn test_reads_every_type() {
    let file = TempYxdbFile::with_prefix("reader_types", &all_types_file()).unwrap();
    let mut reader = file.open().unwrap();

    assert!(reader.next().unwrap());
    assert_eq!(reader.position(), Some(0));
    assert_eq!(reader.read_bool("flag").unwrap(), Some(true));
    assert_eq!(reader.read_byte("tiny").unwrap(), Some(2));
    assert_eq!(reader.read_long("small").unwrap(), Some(-3));
    assert_eq!(reader.read_long("medium").unwrap(), Some(1));
    assert_eq!(reader.read_long("large").unwrap(), Some(5_000_000_000));
    assert_eq!(reader.read_double("ratio").unwrap(), Some(678.9f32 as f64));
    assert_eq!(reader.read_double("amount").unwrap(), Some(12.5));
    assert_eq!(
        reader.read_decimal("price").unwrap().map(|d| d.to_string()),
        Some("123.450000".to_string())
    );
    assert_eq!(reader.read_string("code").unwrap().as_deref(), Some("ABC"));
    assert_eq!(reader.read_string("label").unwrap().as_deref(), Some("XYZ"));
    assert_eq!(reader.read_string("notes").unwrap(), Some("B".repeat(500)));
    assert_eq!(reader.read_string("wide_notes").unwrap(), Some("W".repeat(100)));
    assert_eq!(reader.read_date("day").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 2));
    assert_eq!(reader.read_time("clock").unwrap(), NaiveTime::from_hms_opt(3, 4, 5));
    assert_eq!(
        reader.read_datetime("stamp").unwrap(),
        NaiveDate::from_ymd_opt(2020, 1, 2).and_then(|d| d.and_hms_opt(3, 4, 5))
    );
    assert_eq!(reader.read_blob("payload").unwrap(), Some(vec![0xde, 0xad, 0xbe, 0xef]));
    assert_eq!(
        reader.read_spatial("shape").unwrap().as_deref(),
        Some(r#"{"yxdbType":"Point","coordinates":[1.5,-2.25]}"#)
    );
}

#[test]
fn test_null_record_and_iteration_end() {
    let file = TempYxdbFile::with_prefix("reader_nulls", &all_types_file()).unwrap();
    let mut reader = file.open().unwrap();

    assert!(reader.next().unwrap());
    assert!(reader.next().unwrap());
    let values = reader.read_all().unwrap();
    assert_eq!(values.len(), 17);
    assert!(values.iter().all(Value::is_null));

    assert!(reader.next().unwrap());
    assert_eq!(reader.read_long(3).unwrap(), Some(3));

    assert!(!reader.next().unwrap());
    assert!(reader.is_closed());
    assert!(!reader.next().unwrap());
}

#[test]
fn test_read_before_next() {
    let mut reader = YxdbReader::from_reader(Cursor::new(all_types_file())).unwrap();
    match reader.read_long("medium") {
        Err(e @ YxdbError::NoCurrentRecord) => assert_eq!(e.kind(), ErrorKind::FieldAccess),
        other => panic!("Expected NoCurrentRecord error, got {:?}", other),
    }
    assert_eq!(reader.position(), None);

    assert!(reader.next().unwrap());
    reader.close();
    assert!(matches!(reader.read_all(), Err(YxdbError::NoCurrentRecord)));
}

#[test]
fn test_field_access_errors_leave_reader_usable() {
    let mut reader = YxdbReader::from_reader(Cursor::new(all_types_file())).unwrap();
    assert!(reader.next().unwrap());

    assert!(matches!(
        reader.read_long("nope"),
        Err(YxdbError::UnknownField { .. })
    ));
    assert!(matches!(
        reader.read_bool(17),
        Err(YxdbError::FieldIndexOutOfBounds { index: 17, count: 17 })
    ));
    assert!(matches!(
        reader.read_string("medium"),
        Err(YxdbError::TypeMismatch { index: 3, .. })
    ));

    assert_eq!(reader.read_long("medium").unwrap(), Some(1));
    assert!(reader.next().unwrap());
}

#[test]
fn test_records_spanning_blocks() {
    let records = vec![all_types_record(10), all_types_record(20)];
    let bytes = yxdb_file_with_blocks(&all_types_fields(), &records, 7);
    let mut reader = YxdbReader::from_reader(Cursor::new(bytes)).unwrap();

    let mut ids = Vec::new();
    while reader.next().unwrap() {
        ids.push(reader.read_long("medium").unwrap());
        assert_eq!(reader.read_string("notes").unwrap(), Some("B".repeat(500)));
    }
    assert_eq!(ids, vec![Some(10), Some(20)]);
}

#[test]
fn test_lzf_compressed_block() {
    let fields = vec![field("id", "Int32")];
    let records = int_records(&[5, 6, 7]);
    let mut bytes = preamble(&record_info_xml(&fields), 3);
    bytes.extend_from_slice(&lzf_literal_block(&records.concat()));

    let mut reader = YxdbReader::from_reader(Cursor::new(bytes)).unwrap();
    let mut ids = Vec::new();
    while reader.next().unwrap() {
        ids.push(reader.read_long(0).unwrap());
    }
    assert_eq!(ids, vec![Some(5), Some(6), Some(7)]);
}

#[test]
fn test_fixed_only_records() {
    let fields = vec![field("id", "Int32")];
    let bytes = yxdb_file(&fields, &int_records(&[1, 2, 3, 4]));
    let mut reader = YxdbReader::from_reader(Cursor::new(bytes)).unwrap();

    assert!(!reader.catalog().has_variable_length());
    let mut count = 0;
    while reader.next().unwrap() {
        assert_eq!(reader.record_buffer().unwrap().len(), 5);
        count += 1;
    }
    assert_eq!(count, 4);
}

#[test]
fn test_empty_file() {
    let bytes = yxdb_file(&[field("id", "Int32")], &[]);
    let mut reader = YxdbReader::from_reader(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.num_records(), 0);
    assert!(!reader.next().unwrap());
}

#[test]
fn test_stream_shorter_than_record_count() {
    let fields = vec![field("id", "Int32")];
    let mut bytes = preamble(&record_info_xml(&fields), 3);
    bytes.extend_from_slice(&crate::common::raw_blocks(&int_records(&[1, 2]).concat(), 1024));

    let mut reader = YxdbReader::from_reader(Cursor::new(bytes)).unwrap();
    assert!(reader.next().unwrap());
    assert!(reader.next().unwrap());
    match reader.next() {
        Err(e @ YxdbError::TruncatedStream { .. }) => assert_eq!(e.kind(), ErrorKind::Format),
        other => panic!("Expected TruncatedStream error, got {:?}", other),
    }
    assert!(reader.is_closed());
    assert!(!reader.next().unwrap());
}

#[test]
fn test_truncated_metadata() {
    let mut bytes = header(FILE_TYPE, 1000, 1);
    bytes.extend_from_slice(&[0u8; 40]);
    match YxdbReader::from_reader(Cursor::new(bytes)) {
        Err(YxdbError::TruncatedMetadata { expected, actual }) => {
            assert_eq!(expected, 2000);
            assert_eq!(actual, 40);
        }
        Err(other) => panic!("Expected TruncatedMetadata error, got {:?}", other),
        Ok(_) => panic!("Expected TruncatedMetadata error, got a reader"),
    }
}

#[test]
fn test_short_file_is_not_yxdb() {
    let file = TempYxdbFile::with_prefix("reader_short", &[0u8; 100]).unwrap();
    match file.open() {
        Err(YxdbError::InvalidHeader { reason }) => assert_eq!(reason, "invalid header"),
        Err(other) => panic!("Expected InvalidHeader error, got {:?}", other),
        Ok(_) => panic!("Expected InvalidHeader error, got a reader"),
    }
}

#[test]
fn test_missing_file() {
    match YxdbReader::open("/nonexistent/dir/missing.yxdb") {
        Err(YxdbError::Io(_)) => {}
        Err(other) => panic!("Expected Io error, got {:?}", other),
        Ok(_) => panic!("Expected Io error, got a reader"),
    }
}

#[test]
fn test_invalid_metadata_fails_open() {
    let fields = vec![field("name", "String")];
    let bytes = yxdb_file(&fields, &[]);
    match YxdbReader::from_reader(Cursor::new(bytes)) {
        Err(e) => assert_eq!(e.kind(), ErrorKind::Metadata),
        Ok(_) => panic!("Expected a metadata error"),
    }
}

#[test]
fn test_single_record_file_decodes_every_field() {
    let file = TempYxdbFile::with_prefix("reader_single", &single_record_file()).unwrap();
    let mut reader = file.open().unwrap();

    assert_eq!(reader.num_records(), 1);
    assert_eq!(reader.fields().len(), 16);
    assert_eq!(reader.catalog().fixed_size(), SINGLE_RECORD_FIXED_SIZE);

    assert!(reader.next().unwrap());
    assert_eq!(reader.read_byte("ByteField").unwrap(), Some(1));
    assert_eq!(reader.read_bool("BoolField").unwrap(), Some(true));
    assert_eq!(reader.read_long("Int16Field").unwrap(), Some(16));
    assert_eq!(reader.read_long("Int32Field").unwrap(), Some(32));
    assert_eq!(reader.read_long("Int64Field").unwrap(), Some(64));
    assert_eq!(
        reader.read_decimal("DecimalField").unwrap().map(|d| d.to_string()),
        Some("123.450000".to_string())
    );
    assert_eq!(reader.read_double("FloatField").unwrap(), Some(678.9f32 as f64));
    assert_eq!(reader.read_double("DoubleField").unwrap(), Some(0.12345));
    assert_eq!(reader.read_string("StringField").unwrap().as_deref(), Some("A"));
    assert_eq!(reader.read_string("WStringField").unwrap().as_deref(), Some("AB"));
    assert_eq!(reader.read_string("VStringShortField").unwrap().as_deref(), Some("ABC"));
    assert_eq!(reader.read_string("VStringLongField").unwrap(), Some("B".repeat(500)));
    assert_eq!(reader.read_string("VWStringShortField").unwrap().as_deref(), Some("XZY"));
    assert_eq!(reader.read_string("VWStringLongField").unwrap(), Some("W".repeat(500)));
    assert_eq!(reader.read_date("DateField").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 1));
    assert_eq!(
        reader.read_datetime("DateTimeField").unwrap(),
        NaiveDate::from_ymd_opt(2020, 2, 3).and_then(|d| d.and_hms_opt(4, 5, 6))
    );

    assert!(!reader.next().unwrap());
    assert!(reader.is_closed());
}

#[test]
fn test_oversized_block_length_is_rejected_before_reading() {
    let fields = vec![field("id", "Int32")];
    for length_word in [0xffff_ffffu32, 0x7fff_ffff, 0x8004_0001] {
        let mut bytes = preamble(&record_info_xml(&fields), 1);
        bytes.extend_from_slice(&length_word.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 5]);

        let mut reader = YxdbReader::from_reader(Cursor::new(bytes)).unwrap();
        match reader.next() {
            Err(e @ YxdbError::CorruptedBlock { .. }) => assert_eq!(e.kind(), ErrorKind::Format),
            other => panic!("Expected CorruptedBlock error, got {:?}", other),
        }
        assert!(reader.is_closed());
    }
}

#[test]
fn test_huge_metadata_length_reads_only_what_exists() {
    let mut bytes = header(FILE_TYPE, i32::MAX, 1);
    bytes.extend_from_slice(&[0u8; 16]);
    match YxdbReader::from_reader(Cursor::new(bytes)) {
        Err(YxdbError::TruncatedMetadata { expected, actual }) => {
            assert_eq!(expected, (i32::MAX as usize - 1) * 2 + 2);
            assert_eq!(actual, 16);
        }
        Err(other) => panic!("Expected TruncatedMetadata error, got {:?}", other),
        Ok(_) => panic!("Expected TruncatedMetadata error, got a reader"),
    }
}
