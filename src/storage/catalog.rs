use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    codec::extract,
    types::{
        FieldIndex,
        error::{Result, YxdbError},
        field::{FieldDescriptor, RawField},
        field_type::FieldType,
        value::{DataType, Value},
    },
};

/// Anything that identifies a field: its index or its name.
pub trait FieldKey {
    fn resolve(&self, catalog: &FieldCatalog) -> Result<FieldIndex>;
}

impl FieldKey for usize {
    fn resolve(&self, catalog: &FieldCatalog) -> Result<FieldIndex> {
        catalog.field(*self).map(|field| field.index)
    }
}

impl FieldKey for &str {
    fn resolve(&self, catalog: &FieldCatalog) -> Result<FieldIndex> {
        catalog.map_name(self)
    }
}

impl FieldKey for &String {
    fn resolve(&self, catalog: &FieldCatalog) -> Result<FieldIndex> {
        catalog.map_name(self)
    }
}

/// The record layout of one file: every field with its byte offset.
///
/// Built once when a file is opened and read-only afterwards. The typed
/// `read_*` accessors decode one field out of a record buffer laid out
/// according to this catalog.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<FieldDescriptor>,
    name_to_index: HashMap<String, FieldIndex>,
    fixed_size: usize,
    has_variable_length: bool,
}

impl FieldCatalog {
    pub fn build(raw_fields: Vec<RawField>) -> Result<Self> {
        let mut catalog = Self {
            fields: Vec::with_capacity(raw_fields.len()),
            name_to_index: HashMap::with_capacity(raw_fields.len()),
            ..Default::default()
        };

        for raw in raw_fields {
            let field = Self::resolve_field(raw, catalog.fields.len(), catalog.fixed_size)?;
            catalog.fixed_size += field.on_disk_size();
            catalog.has_variable_length |= field.is_variable_length();
            // Later duplicates shadow earlier ones.
            catalog.name_to_index.insert(field.name.clone(), field.index);
            catalog.fields.push(field);
        }

        Ok(catalog)
    }

    fn resolve_field(raw: RawField, index: usize, start_offset: usize) -> Result<FieldDescriptor> {
        let (Some(name), Some(type_name)) = (raw.name, raw.field_type) else {
            return Err(YxdbError::MissingAttribute {
                attribute: "name/type".to_string(),
            });
        };
        let field_type = FieldType::from_name(&type_name)?;

        let size = if field_type.requires_size() {
            let size = parse_int_attribute(&name, "size", raw.size.as_deref())?;
            Some(usize::try_from(size).map_err(|_| YxdbError::InvalidAttribute {
                field: name.clone(),
                attribute: "size".to_string(),
            })?)
        } else {
            None
        };
        let scale = if field_type.requires_scale() {
            Some(parse_int_attribute(&name, "scale", raw.scale.as_deref())?)
        } else {
            None
        };

        Ok(FieldDescriptor {
            index,
            name,
            field_type,
            size,
            scale,
            start_offset,
            source: raw.source,
            description: raw.description,
        })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Size in bytes of the fixed part of every record.
    pub fn fixed_size(&self) -> usize {
        self.fixed_size
    }

    pub fn has_variable_length(&self) -> bool {
        self.has_variable_length
    }

    pub fn field(&self, index: FieldIndex) -> Result<&FieldDescriptor> {
        self.fields
            .get(index)
            .ok_or(YxdbError::FieldIndexOutOfBounds {
                index,
                count: self.fields.len(),
            })
    }

    pub fn map_name(&self, name: &str) -> Result<FieldIndex> {
        self.name_to_index
            .get(name)
            .copied()
            .ok_or_else(|| YxdbError::UnknownField {
                name: name.to_string(),
            })
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn typed_field<K: FieldKey>(
        &self,
        key: K,
        expected: DataType,
        expected_name: &str,
    ) -> Result<&FieldDescriptor> {
        let index = key.resolve(self)?;
        let field = self.field(index)?;
        if field.data_type() != expected {
            return Err(YxdbError::TypeMismatch {
                index,
                expected: expected_name.to_string(),
            });
        }
        Ok(field)
    }

    /// Decodes any field, whatever its type.
    pub fn read<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Value> {
        let index = key.resolve(self)?;
        extract::extract_value(self.field(index)?, buf)
    }

    /// Decodes every field of the record in catalog order.
    pub fn read_all(&self, buf: &[u8]) -> Result<Vec<Value>> {
        self.fields
            .iter()
            .map(|field| extract::extract_value(field, buf))
            .collect()
    }

    pub fn read_bool<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<bool>> {
        let field = self.typed_field(key, DataType::Boolean, "boolean")?;
        extract::extract_bool(buf, field.start_offset)
    }

    pub fn read_byte<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<u8>> {
        let field = self.typed_field(key, DataType::Byte, "byte")?;
        extract::extract_byte(buf, field.start_offset)
    }

    pub fn read_long<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<i64>> {
        let field = self.typed_field(key, DataType::Long, "int16 / int32 / int64")?;
        match field.field_type {
            FieldType::Int16 => extract::extract_int16(buf, field.start_offset),
            FieldType::Int32 => extract::extract_int32(buf, field.start_offset),
            _ => extract::extract_int64(buf, field.start_offset),
        }
    }

    pub fn read_double<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<f64>> {
        let field = self.typed_field(key, DataType::Double, "float / double")?;
        match field.field_type {
            FieldType::Float => extract::extract_float(buf, field.start_offset),
            _ => extract::extract_double(buf, field.start_offset),
        }
    }

    pub fn read_decimal<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<BigDecimal>> {
        let field = self.typed_field(key, DataType::Decimal, "fixeddecimal")?;
        extract::extract_fixed_decimal(buf, field.start_offset, field.declared_size())
    }

    pub fn read_string<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<String>> {
        let field = self.typed_field(key, DataType::String, "string / wstring / v_string / v_wstring")?;
        let start = field.start_offset;
        match field.field_type {
            FieldType::String => extract::extract_string(buf, start, field.declared_size()),
            FieldType::WString => extract::extract_wstring(buf, start, field.declared_size()),
            FieldType::VString => extract::extract_v_string(buf, start),
            _ => extract::extract_v_wstring(buf, start),
        }
    }

    pub fn read_date<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<NaiveDate>> {
        let field = self.typed_field(key, DataType::Date, "date")?;
        extract::extract_date(buf, field.start_offset)
    }

    pub fn read_time<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<NaiveTime>> {
        let field = self.typed_field(key, DataType::Time, "time")?;
        extract::extract_time(buf, field.start_offset)
    }

    pub fn read_datetime<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<NaiveDateTime>> {
        let field = self.typed_field(key, DataType::DateTime, "datetime")?;
        extract::extract_datetime(buf, field.start_offset)
    }

    /// Raw bytes of a Blob or SpatialObj field.
    pub fn read_blob<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<Vec<u8>>> {
        let field = self.typed_field(key, DataType::Blob, "blob / spatial")?;
        extract::extract_blob(buf, field.start_offset)
    }

    /// GeoJSON text of a SpatialObj field.
    pub fn read_spatial<K: FieldKey>(&self, key: K, buf: &[u8]) -> Result<Option<String>> {
        let field = self.typed_field(key, DataType::Blob, "spatial")?;
        if field.field_type != FieldType::SpatialObj {
            return Err(YxdbError::TypeMismatch {
                index: field.index,
                expected: "spatial".to_string(),
            });
        }
        extract::extract_spatial(buf, field.start_offset)
    }
}

fn parse_int_attribute(field: &str, attribute: &str, value: Option<&str>) -> Result<i32> {
    let value = value.ok_or_else(|| YxdbError::MissingFieldAttribute {
        field: field.to_string(),
        attribute: attribute.to_string(),
    })?;
    value.trim().parse().map_err(|_| YxdbError::InvalidAttribute {
        field: field.to_string(),
        attribute: attribute.to_string(),
    })
}
