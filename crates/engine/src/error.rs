//! Error types for the table manager: the coordination layer on top of
//! `coleman-core`'s data model and `coleman-durability`'s WAL/snapshot I/O.

use thiserror::Error;

/// Result type alias for `coleman-engine` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while creating, mutating, or querying tables.
#[derive(Debug, Error)]
pub enum Error {
    /// Propagated verbatim from the schema/value/table layer.
    #[error(transparent)]
    Core(#[from] coleman_core::Error),

    /// Propagated verbatim from the WAL/snapshot layer.
    #[error(transparent)]
    Durability(#[from] coleman_durability::Error),

    /// `create_table` named a table that already exists.
    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    /// A query or mutation named a table that doesn't exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// During WAL replay, a `CreateTable` entry named a table that a prior
    /// entry in the same log already created. The WAL is the only writer
    /// of these entries, so this means the log itself is inconsistent.
    #[error("WAL replay: duplicate CreateTable for table '{0}'")]
    ReplayDuplicateCreateTable(String),

    /// During WAL replay, an `AddRecord` entry named a table no prior
    /// `CreateTable` entry in the same log established.
    #[error("WAL replay: AddRecord for unknown table '{0}'")]
    ReplayMissingTable(String),
}
