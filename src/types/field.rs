use serde::Serialize;

use crate::types::{field_type::FieldType, value::DataType};

/// Unparsed attributes of one `RecordInfo` child element.
///
/// `size` and `scale` are kept as text so that they are only parsed (and only
/// rejected) for the types that actually need them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawField {
    pub name: Option<String>,
    pub field_type: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub size: Option<String>,
    pub scale: Option<String>,
}

impl RawField {
    pub fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            field_type: Some(field_type.to_string()),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }

    pub fn with_scale(mut self, scale: &str) -> Self {
        self.scale = Some(scale.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// A field of the record layout with its resolved byte offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub index: usize,
    pub name: String,
    pub field_type: FieldType,
    /// Declared size, present only for FixedDecimal, String and WString.
    pub size: Option<usize>,
    /// Declared scale, present only for FixedDecimal.
    pub scale: Option<i32>,
    pub start_offset: usize,
    pub source: Option<String>,
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn data_type(&self) -> DataType {
        self.field_type.data_type()
    }

    pub fn on_disk_size(&self) -> usize {
        self.field_type.on_disk_size(self.declared_size())
    }

    pub fn end_offset(&self) -> usize {
        self.start_offset + self.on_disk_size()
    }

    pub fn declared_size(&self) -> usize {
        self.size.unwrap_or(0)
    }

    pub fn is_variable_length(&self) -> bool {
        self.field_type.is_variable_length()
    }
}
