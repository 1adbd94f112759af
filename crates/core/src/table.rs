//! In-memory table: a named schema plus one `Column` per declared column.

use crate::{Column, Error, Result, Schema, Value};

/// A table's complete in-memory state: its name, its immutable schema, one
/// `Column` per schema entry, and a row count that every column's length
/// must equal (§3, the row-length structural invariant).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        let columns = schema
            .columns()
            .iter()
            .map(|c| Column::new(c.column_type))
            .collect();
        Table {
            name: name.into(),
            schema,
            columns,
            row_count: 0,
        }
    }

    /// Reconstruct a table directly from already-materialized columns, used
    /// by snapshot load and WAL replay where rows are decoded in bulk
    /// rather than one `append_record` at a time.
    pub fn from_parts(name: impl Into<String>, schema: Schema, columns: Vec<Column>) -> Self {
        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        Table {
            name: name.into(),
            schema,
            columns,
            row_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Validate and append one row. Every value's tag is checked against
    /// the schema before any column is mutated, so a rejected row never
    /// leaves columns at unequal lengths (§4.2: all-or-nothing append).
    pub fn append_record(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.schema.column_count() {
            return Err(Error::ColumnCountMismatch {
                expected: self.schema.column_count(),
                actual: values.len(),
            });
        }
        for (i, value) in values.iter().enumerate() {
            let expected = self.schema.column_type(i)?;
            if value.column_type() != expected {
                return Err(Error::TypeMismatch {
                    column: self.schema.column_name(i)?.to_string(),
                    expected,
                    actual: value.column_type(),
                });
            }
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.append(value);
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn get_value(&self, row: usize, column: usize) -> Result<Value> {
        if row >= self.row_count {
            return Err(Error::RowIndexOutOfBounds {
                index: row,
                len: self.row_count,
            });
        }
        let col = self
            .columns
            .get(column)
            .ok_or(Error::ColumnIndexOutOfBounds {
                index: column,
                len: self.columns.len(),
            })?;
        Ok(col
            .get(row)
            .expect("row_count invariant guarantees this index exists"))
    }

    /// Materialize a full row. Each value is a fresh copy out of column
    /// storage; callers hold no reference back into the table (§4.2).
    pub fn get_row(&self, row: usize) -> Result<Vec<Value>> {
        if row >= self.row_count {
            return Err(Error::RowIndexOutOfBounds {
                index: row,
                len: self.row_count,
            });
        }
        Ok(self
            .columns
            .iter()
            .map(|c| c.get(row).expect("row_count invariant guarantees this index exists"))
            .collect())
    }

    /// Every column's length equals `row_count` (§3, §8 row-length law).
    pub fn check_row_length_invariant(&self) -> bool {
        self.columns.iter().all(|c| c.len() == self.row_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnDef, ColumnType};

    fn users_table() -> Table {
        let schema = Schema::new(vec![
            ColumnDef::new("id", ColumnType::Int64),
            ColumnDef::new("name", ColumnType::String),
        ]);
        Table::new("users", schema)
    }

    #[test]
    fn append_and_scan_in_order() {
        let mut t = users_table();
        t.append_record(vec![Value::Int64(1), Value::String("Alice".into())])
            .unwrap();
        t.append_record(vec![Value::Int64(2), Value::String("Bob".into())])
            .unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(
            t.get_row(0).unwrap(),
            vec![Value::Int64(1), Value::String("Alice".into())]
        );
        assert_eq!(
            t.get_row(1).unwrap(),
            vec![Value::Int64(2), Value::String("Bob".into())]
        );
        assert!(t.check_row_length_invariant());
    }

    #[test]
    fn column_count_mismatch_mutates_nothing() {
        let mut t = users_table();
        let before = t.clone();
        let err = t.append_record(vec![Value::Int64(1)]).unwrap_err();
        assert!(matches!(err, Error::ColumnCountMismatch { .. }));
        assert_eq!(t, before);
    }

    #[test]
    fn type_mismatch_mutates_nothing() {
        let mut t = users_table();
        let before = t.clone();
        let err = t
            .append_record(vec![Value::String("nope".into()), Value::String("x".into())])
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(t, before);
    }

    #[test]
    fn row_index_out_of_bounds() {
        let t = users_table();
        assert!(matches!(
            t.get_row(0),
            Err(Error::RowIndexOutOfBounds { index: 0, len: 0 })
        ));
    }
}
