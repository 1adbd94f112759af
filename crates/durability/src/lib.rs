//! `coleman-durability` — the on-disk WAL and snapshot formats that make
//! `coleman-engine`'s in-memory state survive a crash.
//!
//! The WAL (§4.5) is the append-before-mutate durability point; the
//! snapshot store (§4.6) is the periodic checkpoint that lets the WAL be
//! truncated. Byte layouts here are binding (§6): implementations that
//! must interoperate on disk cannot deviate from them.

mod encoding;
mod error;
mod snapshot;
mod wal;
mod wal_entry;

pub use error::{Error, Result};
pub use snapshot::SnapshotStore;
pub use wal::{Wal, WAL_HEADER_SIZE, WAL_MAGIC, WAL_VERSION};
pub use wal_entry::WalEntry;

pub mod codec {
    //! Re-exported for callers (e.g. a future RPC adapter, or tests) that
    //! need to hand-construct or inspect wire-compatible bytes directly.
    pub use crate::encoding::*;
}
