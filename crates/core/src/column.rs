//! Per-type homogeneous column storage backing a table's in-memory rows.

use crate::{ColumnType, Value};

/// Ordered sequence of values of one `ColumnType`. String columns own their
/// byte buffers; every other variant is a flat `Vec` of its payload type.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Bool(Vec<bool>),
}

impl Column {
    pub fn new(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int64 => Column::Int64(Vec::new()),
            ColumnType::Float64 => Column::Float64(Vec::new()),
            ColumnType::String => Column::String(Vec::new()),
            ColumnType::Bool => Column::Bool(Vec::new()),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Bool(_) => ColumnType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::String(v) => v.len(),
            Column::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a value. The caller must have already verified the tag
    /// matches this column's type — `Table::append_record` does that check
    /// once, across every column, before any column is mutated (§4.2).
    pub fn append(&mut self, value: Value) {
        match (self, value) {
            (Column::Int64(v), Value::Int64(x)) => v.push(x),
            (Column::Float64(v), Value::Float64(x)) => v.push(x),
            (Column::String(v), Value::String(x)) => v.push(x),
            (Column::Bool(v), Value::Bool(x)) => v.push(x),
            (column, value) => unreachable!(
                "Column::append called with mismatched tag: column={:?}, value={:?}",
                column.column_type(),
                value.column_type()
            ),
        }
    }

    /// Materialize the value at `index`, cloning out of column storage.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Column::Int64(v) => v.get(index).map(|x| Value::Int64(*x)),
            Column::Float64(v) => v.get(index).map(|x| Value::Float64(*x)),
            Column::String(v) => v.get(index).map(|x| Value::String(x.clone())),
            Column::Bool(v) => v.get(index).map(|x| Value::Bool(*x)),
        }
    }
}
