//! `TableManager`: the single entry point that ties the in-memory table
//! map to the WAL and snapshot store under one coarse lock (§5).
//!
//! Reads (scan/filter/aggregate/table_count/table_names) take the shared
//! side of an `RwLock`; writes (create_table/drop_table/add_record) take
//! the exclusive side. Every mutation is WAL-logged before it is applied
//! to the in-memory map, so a crash between the two always resumes from a
//! state the WAL can still replay forward to (§4.5, §5).

use crate::aggregator::{self, AggregateFunction};
use crate::config::ManagerConfig;
use crate::evaluator::filter_table;
use crate::{Error, Result};
use coleman_core::{Predicate, Schema, Table, Value};
use coleman_durability::{SnapshotStore, Wal, WalEntry};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Point-in-time counters, exposed for observability. Mirrors the shape of
/// the teacher's coordinator stats: plain data, no behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerStats {
    pub tables_created: u64,
    pub records_appended: u64,
    pub snapshots_taken: u64,
    pub wal_truncations: u64,
}

#[derive(Default)]
struct Counters {
    tables_created: AtomicU64,
    records_appended: AtomicU64,
    snapshots_taken: AtomicU64,
    wal_truncations: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> ManagerStats {
        ManagerStats {
            tables_created: self.tables_created.load(Ordering::Relaxed),
            records_appended: self.records_appended.load(Ordering::Relaxed),
            snapshots_taken: self.snapshots_taken.load(Ordering::Relaxed),
            wal_truncations: self.wal_truncations.load(Ordering::Relaxed),
        }
    }
}

/// The coordinator: owns the table map, the WAL, and the snapshot store.
pub struct TableManager {
    tables: RwLock<HashMap<String, Table>>,
    wal: Wal,
    snapshot_store: SnapshotStore,
    config: ManagerConfig,
    records_since_snapshot: AtomicU64,
    counters: Counters,
}

impl TableManager {
    /// Open (or create) the manager's on-disk state: load the most recent
    /// snapshot, if any, then replay the WAL tail on top of it (§4.7
    /// recovery order — snapshot first, WAL second, since the WAL is only
    /// ever truncated once a snapshot has durably captured everything
    /// before it).
    pub fn open(config: ManagerConfig) -> Result<Self> {
        let snapshot_store = SnapshotStore::new(&config.snapshot_dir);
        let mut tables: HashMap<String, Table> = HashMap::new();

        let loaded_any = snapshot_store.load(|table| {
            tables.insert(table.name().to_string(), table);
            Ok(())
        })?;
        debug!(loaded_any, "Loaded snapshot during open");

        let wal = Wal::open(&config.wal_path)?;
        wal.replay(|_seq, entry| -> Result<()> {
            match entry {
                WalEntry::CreateTable { table_name, schema } => {
                    if tables.contains_key(&table_name) {
                        return Err(Error::ReplayDuplicateCreateTable(table_name));
                    }
                    tables.insert(table_name.clone(), Table::new(table_name, schema));
                }
                WalEntry::AddRecord { table_name, values } => {
                    let table = tables
                        .get_mut(&table_name)
                        .ok_or_else(|| Error::ReplayMissingTable(table_name.clone()))?;
                    // A `TypeMismatch`/`ColumnCountMismatch` here means the
                    // original run rejected this same record in memory
                    // after already having logged it (§9): replay
                    // reproduces the identical rejection and moves on
                    // rather than treating it as fatal to recovery.
                    if let Err(e) = table.append_record(values) {
                        debug!(table = %table_name, error = %e, "Replay reproduced a rejected append");
                    }
                }
            }
            Ok(())
        })?;

        info!(tables = tables.len(), "Recovered table manager state");

        Ok(TableManager {
            tables: RwLock::new(tables),
            wal,
            snapshot_store,
            config,
            records_since_snapshot: AtomicU64::new(0),
            counters: Counters::default(),
        })
    }

    pub fn create_table(&self, name: impl Into<String>, schema: Schema) -> Result<()> {
        let name = name.into();
        let mut tables = self.tables.write();
        if tables.contains_key(&name) {
            return Err(Error::TableAlreadyExists(name));
        }

        self.wal.append(&WalEntry::CreateTable {
            table_name: name.clone(),
            schema: schema.clone(),
        })?;
        tables.insert(name.clone(), Table::new(name.clone(), schema));
        self.counters.tables_created.fetch_add(1, Ordering::Relaxed);
        debug!(table = %name, "Created table");

        self.note_mutation(&mut tables)
    }

    /// Dropping a table is not WAL-logged: on recovery, the WAL would
    /// simply replay the original `CreateTable` and any `AddRecord`
    /// entries for a table that's since been dropped, reviving it. A
    /// drop only takes effect once the next snapshot captures its
    /// absence and the WAL is truncated past the entries that created it.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.remove(name).is_none() {
            return Err(Error::TableNotFound(name.to_string()));
        }
        debug!(table = name, "Dropped table");
        Ok(())
    }

    pub fn add_record(&self, name: &str, values: Vec<Value>) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.contains_key(name) {
            return Err(Error::TableNotFound(name.to_string()));
        }

        self.wal.append(&WalEntry::AddRecord {
            table_name: name.to_string(),
            values: values.clone(),
        })?;

        let table = tables.get_mut(name).expect("checked above");
        table.append_record(values)?;
        self.counters.records_appended.fetch_add(1, Ordering::Relaxed);

        self.note_mutation(&mut tables)
    }

    pub fn scan(&self, name: &str) -> Result<Vec<Vec<Value>>> {
        let tables = self.tables.read();
        let table = tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        (0..table.row_count())
            .map(|row| table.get_row(row).map_err(Error::from))
            .collect()
    }

    pub fn filter(&self, name: &str, predicates: &[Predicate]) -> Result<Vec<Vec<Value>>> {
        let tables = self.tables.read();
        let table = tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        filter_table(table, predicates)?
            .into_iter()
            .map(|row| table.get_row(row).map_err(Error::from))
            .collect()
    }

    pub fn aggregate(
        &self,
        name: &str,
        column_name: &str,
        function: AggregateFunction,
        predicates: &[Predicate],
    ) -> Result<Value> {
        let tables = self.tables.read();
        let table = tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        aggregator::aggregate(table, column_name, function, predicates)
    }

    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    pub fn stats(&self) -> ManagerStats {
        self.counters.snapshot()
    }

    /// Explicit teardown. Every mutation is already durable by the time
    /// `add_record`/`create_table` return, so this only needs to drop the
    /// WAL's open file handle; it exists so embedders have a clear point
    /// to release the manager rather than relying on `Drop` ordering.
    pub fn close(self) -> Result<()> {
        Ok(())
    }

    fn note_mutation(&self, tables: &mut HashMap<String, Table>) -> Result<()> {
        let since = self.records_since_snapshot.fetch_add(1, Ordering::Relaxed) + 1;
        let wal_size = self.wal.size()?;

        if since >= self.config.snapshot_record_threshold
            || wal_size >= self.config.snapshot_wal_size_threshold
        {
            self.snapshot_store.save(tables.values())?;
            self.wal.truncate()?;
            self.records_since_snapshot.store(0, Ordering::Relaxed);
            self.counters.snapshots_taken.fetch_add(1, Ordering::Relaxed);
            self.counters.wal_truncations.fetch_add(1, Ordering::Relaxed);
            info!(since, wal_size, "Checkpointed: snapshot taken and WAL truncated");
        }
        Ok(())
    }
}
