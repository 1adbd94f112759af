//! Error types shared across the Coleman engine's core data model.
//!
//! Each crate in the workspace defines its own error enum and wraps the
//! ones below it with `#[from]`, following the shape of the teacher's
//! `in-mem-core::error` module.

use crate::ColumnType;
use thiserror::Error;

/// Result type alias for `coleman-core` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the schema, value, column, and table types.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A schema lookup used an index past the end of the column list.
    #[error("column index {index} out of bounds for schema with {len} columns")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    /// A predicate or aggregate target named a column the schema doesn't have.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// `append_record` was called with the wrong number of values.
    #[error("expected {expected} values, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// A value's tag didn't match its column's declared type.
    #[error("value for column '{column}' has type {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    /// A predicate was built without a value payload.
    #[error("predicate is missing its value payload")]
    InvalidPredicate,

    /// SUM was requested over a non-numeric column.
    #[error("aggregate function not valid for column type {0}")]
    InvalidColumnType(ColumnType),

    /// A row lookup used an index past `row_count`.
    #[error("row index {index} out of bounds for table with {len} rows")]
    RowIndexOutOfBounds { index: usize, len: usize },

    /// `Schema::from_string` saw an unrecognized type token.
    #[error("unrecognized column type token: {0}")]
    InvalidColumnTypeToken(String),
}
