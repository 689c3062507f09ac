use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    codec::{
        array_at, blob::decode_blob, byte_at, decode_latin1, decode_utf16le, is_null_marker,
        slice_at, spatial::to_geojson,
    },
    types::{
        error::{Result, YxdbError},
        field::FieldDescriptor,
        field_type::FieldType,
        value::Value,
    },
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_TEXT_LEN: usize = 10;
const TIME_TEXT_LEN: usize = 8;
const DATETIME_TEXT_LEN: usize = 19;

/// 1 is true, 2 is null, anything else is false. Bool has no marker byte.
pub fn extract_bool(buf: &[u8], start: usize) -> Result<Option<bool>> {
    Ok(match byte_at(buf, start)? {
        1 => Some(true),
        2 => None,
        _ => Some(false),
    })
}

pub fn extract_byte(buf: &[u8], start: usize) -> Result<Option<u8>> {
    if is_null_marker(buf, start + 1)? {
        return Ok(None);
    }
    byte_at(buf, start).map(Some)
}

pub fn extract_int16(buf: &[u8], start: usize) -> Result<Option<i64>> {
    if is_null_marker(buf, start + 2)? {
        return Ok(None);
    }
    Ok(Some(i16::from_le_bytes(array_at(buf, start)?) as i64))
}

pub fn extract_int32(buf: &[u8], start: usize) -> Result<Option<i64>> {
    if is_null_marker(buf, start + 4)? {
        return Ok(None);
    }
    Ok(Some(i32::from_le_bytes(array_at(buf, start)?) as i64))
}

pub fn extract_int64(buf: &[u8], start: usize) -> Result<Option<i64>> {
    if is_null_marker(buf, start + 8)? {
        return Ok(None);
    }
    Ok(Some(i64::from_le_bytes(array_at(buf, start)?)))
}

pub fn extract_float(buf: &[u8], start: usize) -> Result<Option<f64>> {
    if is_null_marker(buf, start + 4)? {
        return Ok(None);
    }
    Ok(Some(f32::from_le_bytes(array_at(buf, start)?) as f64))
}

pub fn extract_double(buf: &[u8], start: usize) -> Result<Option<f64>> {
    if is_null_marker(buf, start + 8)? {
        return Ok(None);
    }
    Ok(Some(f64::from_le_bytes(array_at(buf, start)?)))
}

pub fn extract_fixed_decimal(buf: &[u8], start: usize, size: usize) -> Result<Option<BigDecimal>> {
    let Some(text) = extract_string(buf, start, size)? else {
        return Ok(None);
    };
    BigDecimal::from_str(&text)
        .map(Some)
        .map_err(|_| YxdbError::InvalidDecimal { text })
}

pub fn extract_string(buf: &[u8], start: usize, size: usize) -> Result<Option<String>> {
    if is_null_marker(buf, start + size)? {
        return Ok(None);
    }
    let text = terminated_text(buf, start, size, 1)?;
    Ok(Some(decode_latin1(text)))
}

pub fn extract_wstring(buf: &[u8], start: usize, size: usize) -> Result<Option<String>> {
    if is_null_marker(buf, start + size * 2)? {
        return Ok(None);
    }
    let text = terminated_text(buf, start, size, 2)?;
    Ok(Some(decode_utf16le(text)))
}

/// Scans at most `size` characters of `char_width` bytes, stopping at the
/// first all-zero character.
fn terminated_text(buf: &[u8], start: usize, size: usize, char_width: usize) -> Result<&[u8]> {
    let field = slice_at(buf, start, size * char_width)?;
    let chars = field
        .chunks_exact(char_width)
        .take_while(|c| c.iter().any(|&b| b != 0))
        .count();
    Ok(&field[..chars * char_width])
}

pub fn extract_v_string(buf: &[u8], start: usize) -> Result<Option<String>> {
    Ok(decode_blob(buf, start)?.map(decode_latin1))
}

pub fn extract_v_wstring(buf: &[u8], start: usize) -> Result<Option<String>> {
    Ok(decode_blob(buf, start)?.map(decode_utf16le))
}

pub fn extract_blob(buf: &[u8], start: usize) -> Result<Option<Vec<u8>>> {
    Ok(decode_blob(buf, start)?.map(<[u8]>::to_vec))
}

/// Spatial payload converted to GeoJSON. A null payload stays null.
pub fn extract_spatial(buf: &[u8], start: usize) -> Result<Option<String>> {
    decode_blob(buf, start)?.map(to_geojson).transpose()
}

pub fn extract_date(buf: &[u8], start: usize) -> Result<Option<NaiveDate>> {
    let Some(text) = temporal_text(buf, start, DATE_TEXT_LEN)? else {
        return Ok(None);
    };
    parse_date(&text).map(Some)
}

pub fn extract_time(buf: &[u8], start: usize) -> Result<Option<NaiveTime>> {
    let Some(text) = temporal_text(buf, start, TIME_TEXT_LEN)? else {
        return Ok(None);
    };
    parse_time(&text).map(Some)
}

pub fn extract_datetime(buf: &[u8], start: usize) -> Result<Option<NaiveDateTime>> {
    let Some(text) = temporal_text(buf, start, DATETIME_TEXT_LEN)? else {
        return Ok(None);
    };
    parse_datetime(&text).map(Some)
}

fn temporal_text(buf: &[u8], start: usize, text_len: usize) -> Result<Option<String>> {
    if is_null_marker(buf, start + text_len)? {
        return Ok(None);
    }
    Ok(Some(decode_latin1(slice_at(buf, start, text_len)?)))
}

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| YxdbError::InvalidTemporal {
        expected: "date",
        text: text.to_string(),
    })
}

pub fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, TIME_FORMAT).map_err(|_| YxdbError::InvalidTemporal {
        expected: "time",
        text: text.to_string(),
    })
}

pub fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map_err(|_| {
        YxdbError::InvalidTemporal {
            expected: "datetime",
            text: text.to_string(),
        }
    })
}

/// Decodes any field into a [`Value`], dispatching on its on-disk type.
/// Spatial fields become GeoJSON strings.
pub fn extract_value(field: &FieldDescriptor, buf: &[u8]) -> Result<Value> {
    let start = field.start_offset;
    let size = field.declared_size();
    let value: Value = match field.field_type {
        FieldType::Bool => extract_bool(buf, start)?.into(),
        FieldType::Byte => extract_byte(buf, start)?.into(),
        FieldType::Int16 => extract_int16(buf, start)?.into(),
        FieldType::Int32 => extract_int32(buf, start)?.into(),
        FieldType::Int64 => extract_int64(buf, start)?.into(),
        FieldType::Float => extract_float(buf, start)?.into(),
        FieldType::Double => extract_double(buf, start)?.into(),
        FieldType::FixedDecimal => extract_fixed_decimal(buf, start, size)?.into(),
        FieldType::String => extract_string(buf, start, size)?.into(),
        FieldType::WString => extract_wstring(buf, start, size)?.into(),
        FieldType::VString => extract_v_string(buf, start)?.into(),
        FieldType::VWString => extract_v_wstring(buf, start)?.into(),
        FieldType::Date => extract_date(buf, start)?.into(),
        FieldType::Time => extract_time(buf, start)?.into(),
        FieldType::DateTime => extract_datetime(buf, start)?.into(),
        FieldType::Blob => extract_blob(buf, start)?.into(),
        FieldType::SpatialObj => extract_spatial(buf, start)?.into(),
    };
    Ok(value)
}
