use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use yxdb::{
    codec::extract::*,
    storage::catalog::FieldCatalog,
    types::{error::YxdbError, field::RawField, value::Value},
};

use crate::common::{RecordBuilder, point_geometry};

#[test]
fn test_bool_encodings() {
    let buf = [1u8, 0, 2, 7];
    assert_eq!(extract_bool(&buf, 0).unwrap(), Some(true));
    assert_eq!(extract_bool(&buf, 1).unwrap(), Some(false));
    assert_eq!(extract_bool(&buf, 2).unwrap(), None);
    assert_eq!(extract_bool(&buf, 3).unwrap(), Some(false));
}

#[test]
fn test_integers_and_null_markers() {
    let mut builder = RecordBuilder::new(2 + 3 + 5 + 9 + 9);
    builder
        .byte(Some(200))
        .int16(Some(-3))
        .int32(Some(i32::MIN))
        .int64(Some(5_000_000_000))
        .int64(None);
    let buf = builder.fixed_only();

    assert_eq!(extract_byte(&buf, 0).unwrap(), Some(200));
    assert_eq!(extract_int16(&buf, 2).unwrap(), Some(-3));
    assert_eq!(extract_int32(&buf, 5).unwrap(), Some(i32::MIN as i64));
    assert_eq!(extract_int64(&buf, 10).unwrap(), Some(5_000_000_000));
    assert_eq!(extract_int64(&buf, 19).unwrap(), None);
}

#[test]
fn test_null_marker_wins_over_value_bytes() {
    // value bytes say 42 but the marker says null
    let buf = [42u8, 0, 0, 0, 1];
    assert_eq!(extract_int32(&buf, 0).unwrap(), None);
}

#[test]
fn test_floating_point() {
    let mut builder = RecordBuilder::new(5 + 9 + 5);
    builder.float(Some(678.9)).double(Some(-0.125)).float(None);
    let buf = builder.fixed_only();

    assert_eq!(extract_float(&buf, 0).unwrap(), Some(678.9f32 as f64));
    assert_eq!(extract_double(&buf, 5).unwrap(), Some(-0.125));
    assert_eq!(extract_float(&buf, 14).unwrap(), None);
}

#[test]
fn test_fixed_decimal() {
    let mut builder = RecordBuilder::new(11 + 11 + 11);
    builder
        .fixed_decimal(Some("123.450000"), 10)
        .fixed_decimal(None, 10)
        .fixed_decimal(Some("abc"), 10);
    let buf = builder.fixed_only();

    let value = extract_fixed_decimal(&buf, 0, 10).unwrap().unwrap();
    assert_eq!(value.to_string(), "123.450000");
    assert_eq!(extract_fixed_decimal(&buf, 11, 10).unwrap(), None);
    match extract_fixed_decimal(&buf, 22, 10) {
        Err(YxdbError::InvalidDecimal { text }) => assert_eq!(text, "abc"),
        other => panic!("Expected InvalidDecimal error, got {:?}", other),
    }
}

#[test]
fn test_fixed_strings_stop_at_nul() {
    let mut builder = RecordBuilder::new(9 + 5 + 13 + 9);
    builder
        .string(Some("ABC"), 8)
        .string(Some("WXYZ"), 4)
        .wstring(Some("héllo"), 6)
        .string(None, 8);
    let buf = builder.fixed_only();

    assert_eq!(extract_string(&buf, 0, 8).unwrap().as_deref(), Some("ABC"));
    // fills the whole field, no terminator
    assert_eq!(extract_string(&buf, 9, 4).unwrap().as_deref(), Some("WXYZ"));
    assert_eq!(extract_wstring(&buf, 14, 6).unwrap().as_deref(), Some("héllo"));
    assert_eq!(extract_string(&buf, 27, 8).unwrap(), None);
}

#[test]
fn test_latin1_string_decoding() {
    let buf = [b'c', b'a', b'f', 0xe9, 0];
    assert_eq!(extract_string(&buf, 0, 4).unwrap().as_deref(), Some("café"));
}

#[test]
fn test_variable_strings() {
    let mut builder = RecordBuilder::new(16);
    builder
        .v_string(Some("ABC"))
        .v_wstring(Some("XZY"))
        .v_string(Some(""))
        .v_wstring(None);
    let buf = builder.build();

    assert_eq!(extract_v_string(&buf, 0).unwrap().as_deref(), Some("ABC"));
    assert_eq!(extract_v_wstring(&buf, 4).unwrap().as_deref(), Some("XZY"));
    assert_eq!(extract_v_string(&buf, 8).unwrap().as_deref(), Some(""));
    assert_eq!(extract_v_wstring(&buf, 12).unwrap(), None);
}

#[test]
fn test_temporal_values() {
    let mut builder = RecordBuilder::new(11 + 9 + 20 + 11);
    builder
        .date(Some("2020-01-02"))
        .time(Some("23:59:58"))
        .datetime(Some("2020-01-02 03:04:05"))
        .date(None);
    let buf = builder.fixed_only();

    assert_eq!(
        extract_date(&buf, 0).unwrap(),
        NaiveDate::from_ymd_opt(2020, 1, 2)
    );
    assert_eq!(
        extract_time(&buf, 11).unwrap(),
        NaiveTime::from_hms_opt(23, 59, 58)
    );
    let expected: NaiveDateTime = NaiveDate::from_ymd_opt(2020, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();
    assert_eq!(extract_datetime(&buf, 20).unwrap(), Some(expected));
    assert_eq!(extract_date(&buf, 40).unwrap(), None);
}

#[test]
fn test_unparseable_temporal_is_a_decode_error() {
    let mut builder = RecordBuilder::new(11);
    builder.date(Some("2020-13-45"));
    let buf = builder.fixed_only();

    match extract_date(&buf, 0) {
        Err(YxdbError::InvalidTemporal { expected, text }) => {
            assert_eq!(expected, "date");
            assert_eq!(text, "2020-13-45");
        }
        other => panic!("Expected InvalidTemporal error, got {:?}", other),
    }
}

#[test]
fn test_blob_and_spatial() {
    let geometry = point_geometry(1.5, -2.25);
    let mut builder = RecordBuilder::new(16);
    builder
        .var(Some(&[1u8, 2, 3, 4, 5][..]))
        .var(Some(geometry.as_slice()))
        .var(None)
        .var(Some(&[][..]));
    let buf = builder.build();

    assert_eq!(extract_blob(&buf, 0).unwrap(), Some(vec![1, 2, 3, 4, 5]));
    assert_eq!(
        extract_spatial(&buf, 4).unwrap().as_deref(),
        Some(r#"{"yxdbType":"Point","coordinates":[1.5,-2.25]}"#)
    );
    assert_eq!(extract_spatial(&buf, 8).unwrap(), None);
    assert_eq!(extract_spatial(&buf, 12).unwrap().as_deref(), Some(""));
}

#[test]
fn test_short_buffer_is_truncated_record() {
    let buf = [0u8; 3];
    match extract_int32(&buf, 0) {
        Err(YxdbError::TruncatedRecord { offset, needed, len }) => {
            assert_eq!((offset, needed, len), (4, 1, 3));
        }
        other => panic!("Expected TruncatedRecord error, got {:?}", other),
    }
}

#[test]
fn test_extract_value_dispatches_on_field_type() {
    let catalog = FieldCatalog::build(vec![
        RawField::new("id", "Int16"),
        RawField::new("name", "String").with_size("4"),
        RawField::new("when", "Date"),
    ])
    .unwrap();
    let mut builder = RecordBuilder::new(catalog.fixed_size());
    builder
        .int16(Some(7))
        .string(Some("ab"), 4)
        .date(None);
    let buf = builder.fixed_only();

    let values: Vec<Value> = catalog
        .fields()
        .iter()
        .map(|field| extract_value(field, &buf).unwrap())
        .collect();
    assert_eq!(
        values,
        vec![Value::Long(7), Value::String("ab".to_string()), Value::Null]
    );
}

#[test]
fn test_int16_literal_fixture() {
    let mut buf = [0u8, 0, 10, 0, 0, 0];
    assert_eq!(extract_int16(&buf, 2).unwrap(), Some(10));
    buf[4] = 1;
    assert_eq!(extract_int16(&buf, 2).unwrap(), None);
}
