use serde::Serialize;

use crate::types::{
    RecordPosition,
    error::{Result, YxdbError},
    value::Value,
};

/// Every field of one record, decoded in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub position: RecordPosition,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(position: RecordPosition, values: Vec<Value>) -> Self {
        Self { position, values }
    }

    pub fn get_value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn value(&self, index: usize) -> Result<&Value> {
        self.values
            .get(index)
            .ok_or(YxdbError::FieldIndexOutOfBounds {
                index,
                count: self.values.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}
