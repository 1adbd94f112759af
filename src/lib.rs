//! Coleman: an embeddable, single-node, in-memory columnar table engine
//! with durable write-ahead logging and periodic snapshots.
//!
//! This crate re-exports the public surface of the workspace's internal
//! crates (`coleman-core`'s data model, `coleman-durability`'s on-disk
//! formats, `coleman-engine`'s coordinator) as one facade, the way an
//! embedder depending on just `coleman` expects to reach everything
//! through a single path.
//!
//! ```no_run
//! use coleman::{ColumnDef, ColumnType, ManagerConfig, Schema, TableManager, Value};
//!
//! let manager = TableManager::open(ManagerConfig::new()).unwrap();
//! manager
//!     .create_table(
//!         "users",
//!         Schema::new(vec![
//!             ColumnDef::new("id", ColumnType::Int64),
//!             ColumnDef::new("name", ColumnType::String),
//!         ]),
//!     )
//!     .unwrap();
//! manager
//!     .add_record("users", vec![Value::Int64(1), Value::String("Alice".into())])
//!     .unwrap();
//! ```

pub use coleman_core::{Column, ColumnDef, ColumnType, Operator, Predicate, Schema, Table, Value};
pub use coleman_durability::{Wal, WalEntry, WAL_HEADER_SIZE, WAL_MAGIC, WAL_VERSION};
pub use coleman_engine::{AggregateFunction, ManagerConfig, ManagerStats, TableManager};

/// Errors an embedder can see from any operation exposed by this facade.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] coleman_core::Error),
    #[error(transparent)]
    Durability(#[from] coleman_durability::Error),
    #[error(transparent)]
    Engine(#[from] coleman_engine::Error),
}

/// Result type alias for this facade's re-exported errors.
pub type Result<T> = std::result::Result<T, Error>;
