//! Builder-style configuration for `TableManager::open`.

use std::path::PathBuf;

/// Tunables for a `TableManager` instance: where its WAL and snapshots
/// live on disk, and the thresholds that trigger a checkpoint.
///
/// `host`/`port` are carried here only so an external adapter embedding
/// Coleman behind a network listener has one place to read them from;
/// the manager itself never opens a socket (§1: embeddable, in-process).
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub wal_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub snapshot_record_threshold: u64,
    pub snapshot_wal_size_threshold: u64,
    pub host: String,
    pub port: u16,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            wal_path: PathBuf::from("data/coleman.wal"),
            snapshot_dir: PathBuf::from("data/snapshots"),
            snapshot_record_threshold: 10_000,
            snapshot_wal_size_threshold: 10 * 1024 * 1024,
            host: "127.0.0.1".to_string(),
            port: 4287,
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small thresholds so checkpoint behavior is exercised without
    /// needing thousands of records in a test.
    pub fn for_testing() -> Self {
        ManagerConfig {
            snapshot_record_threshold: 8,
            snapshot_wal_size_threshold: 4096,
            ..Self::default()
        }
    }

    pub fn with_wal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.wal_path = path.into();
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_snapshot_record_threshold(mut self, threshold: u64) -> Self {
        self.snapshot_record_threshold = threshold;
        self
    }

    pub fn with_snapshot_wal_size_threshold(mut self, threshold: u64) -> Self {
        self.snapshot_wal_size_threshold = threshold;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
