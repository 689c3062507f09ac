use std::fmt;

use serde::Serialize;

use crate::types::{
    error::{Result, YxdbError},
    value::DataType,
};

/// On-disk field types, exactly as named in the `type` attribute of the
/// `RecordInfo` metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldType {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    FixedDecimal,
    String,
    WString,
    #[serde(rename = "V_String")]
    VString,
    #[serde(rename = "V_WString")]
    VWString,
    Date,
    Time,
    DateTime,
    Blob,
    SpatialObj,
}

pub const BOOL: &str = "Bool";
pub const BYTE: &str = "Byte";
pub const INT16: &str = "Int16";
pub const INT32: &str = "Int32";
pub const INT64: &str = "Int64";
pub const FLOAT: &str = "Float";
pub const DOUBLE: &str = "Double";
pub const FIXED_DECIMAL: &str = "FixedDecimal";
pub const STRING: &str = "String";
pub const WSTRING: &str = "WString";
pub const V_STRING: &str = "V_String";
pub const V_WSTRING: &str = "V_WString";
pub const DATE: &str = "Date";
pub const TIME: &str = "Time";
pub const DATETIME: &str = "DateTime";
pub const BLOB: &str = "Blob";
pub const SPATIAL_OBJ: &str = "SpatialObj";

/// Width of the pointer word stored in the fixed part of a record for every
/// variable-length field.
pub const VAR_POINTER_SIZE: usize = 4;

impl FieldType {
    pub const ALL: [FieldType; 17] = [
        FieldType::Bool,
        FieldType::Byte,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::Float,
        FieldType::Double,
        FieldType::FixedDecimal,
        FieldType::String,
        FieldType::WString,
        FieldType::VString,
        FieldType::VWString,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Blob,
        FieldType::SpatialObj,
    ];

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            BOOL => Ok(FieldType::Bool),
            BYTE => Ok(FieldType::Byte),
            INT16 => Ok(FieldType::Int16),
            INT32 => Ok(FieldType::Int32),
            INT64 => Ok(FieldType::Int64),
            FLOAT => Ok(FieldType::Float),
            DOUBLE => Ok(FieldType::Double),
            FIXED_DECIMAL => Ok(FieldType::FixedDecimal),
            STRING => Ok(FieldType::String),
            WSTRING => Ok(FieldType::WString),
            V_STRING => Ok(FieldType::VString),
            V_WSTRING => Ok(FieldType::VWString),
            DATE => Ok(FieldType::Date),
            TIME => Ok(FieldType::Time),
            DATETIME => Ok(FieldType::DateTime),
            BLOB => Ok(FieldType::Blob),
            SPATIAL_OBJ => Ok(FieldType::SpatialObj),
            _ => Err(YxdbError::UnknownFieldType {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Bool => BOOL,
            FieldType::Byte => BYTE,
            FieldType::Int16 => INT16,
            FieldType::Int32 => INT32,
            FieldType::Int64 => INT64,
            FieldType::Float => FLOAT,
            FieldType::Double => DOUBLE,
            FieldType::FixedDecimal => FIXED_DECIMAL,
            FieldType::String => STRING,
            FieldType::WString => WSTRING,
            FieldType::VString => V_STRING,
            FieldType::VWString => V_WSTRING,
            FieldType::Date => DATE,
            FieldType::Time => TIME,
            FieldType::DateTime => DATETIME,
            FieldType::Blob => BLOB,
            FieldType::SpatialObj => SPATIAL_OBJ,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            FieldType::Bool => DataType::Boolean,
            FieldType::Byte => DataType::Byte,
            FieldType::Int16 | FieldType::Int32 | FieldType::Int64 => DataType::Long,
            FieldType::Float | FieldType::Double => DataType::Double,
            FieldType::FixedDecimal => DataType::Decimal,
            FieldType::String | FieldType::WString | FieldType::VString | FieldType::VWString => {
                DataType::String
            }
            FieldType::Date => DataType::Date,
            FieldType::Time => DataType::Time,
            FieldType::DateTime => DataType::DateTime,
            FieldType::Blob | FieldType::SpatialObj => DataType::Blob,
        }
    }

    /// Bytes occupied in the fixed part of a record. `declared_size` is only
    /// consulted for FixedDecimal, String and WString.
    pub fn on_disk_size(&self, declared_size: usize) -> usize {
        match self {
            FieldType::Bool => 1,
            FieldType::Byte => 2,
            FieldType::Int16 => 3,
            FieldType::Int32 | FieldType::Float => 5,
            FieldType::Int64 | FieldType::Double | FieldType::Time => 9,
            FieldType::Date => 11,
            FieldType::DateTime => 20,
            FieldType::FixedDecimal | FieldType::String => declared_size + 1,
            FieldType::WString => declared_size * 2 + 1,
            FieldType::VString | FieldType::VWString | FieldType::Blob | FieldType::SpatialObj => {
                VAR_POINTER_SIZE
            }
        }
    }

    pub fn requires_size(&self) -> bool {
        matches!(
            self,
            FieldType::FixedDecimal | FieldType::String | FieldType::WString
        )
    }

    pub fn requires_scale(&self) -> bool {
        matches!(self, FieldType::FixedDecimal)
    }

    pub fn is_variable_length(&self) -> bool {
        matches!(
            self,
            FieldType::VString | FieldType::VWString | FieldType::Blob | FieldType::SpatialObj
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
