//! Error types for the WAL and snapshot on-disk formats.

use thiserror::Error;

/// Result type alias for `coleman-durability` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing the WAL or snapshot files.
#[derive(Debug, Error)]
pub enum Error {
    /// Surfaced verbatim from the filesystem (§7).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAL header magic doesn't match the compiled constant.
    #[error("invalid WAL magic")]
    InvalidWalMagic,

    /// WAL header version doesn't match the compiled constant.
    #[error("invalid WAL version: {0}")]
    InvalidWalVersion(u32),

    /// A WAL record's CRC32 didn't match its payload.
    #[error("WAL corruption detected at sequence {seq}: CRC mismatch")]
    WalCorruption { seq: u64 },

    /// An unrecognized WAL entry tag byte.
    #[error("invalid WAL entry type tag: {0:#x}")]
    InvalidEntryType(u8),

    /// An unrecognized `ColumnType` disk tag, seen while decoding a schema.
    #[error("invalid column type tag: {0}")]
    InvalidColumnTypeTag(u8),

    /// An unrecognized value payload tag, seen while decoding a value.
    #[error("invalid value type tag: {0}")]
    InvalidValueTypeTag(u8),

    /// Snapshot header magic doesn't match the compiled constant.
    #[error("invalid snapshot magic")]
    InvalidSnapshotMagic,

    /// Snapshot header version doesn't match the compiled constant.
    #[error("invalid snapshot version: {0}")]
    InvalidSnapshotVersion(u32),

    /// A decoded string was not valid UTF-8.
    #[error("invalid UTF-8 in decoded string: {0}")]
    InvalidUtf8(String),
}
