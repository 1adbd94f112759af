//! Snapshot store: a full dump of every table to a single file, committed
//! with a temp-file-then-rename so readers never observe a torn write
//! (§4.6).
//!
//! ```text
//! header: magic[12] | version: u32
//! body:   table_count: u32 | table* (name | schema | row_count: u64 | rows)
//! ```

use crate::encoding::{
    read_schema, read_string, read_value, write_schema, write_string, write_value,
};
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use coleman_core::{Column, Table};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 12-byte header magic: `"COLEMAN_SNAP"`.
pub const SNAPSHOT_MAGIC: &[u8; 12] = b"COLEMAN_SNAP";
pub const SNAPSHOT_VERSION: u32 = 1;

const SNAPSHOT_FILE_NAME: &str = "snapshot.dat";
const SNAPSHOT_TEMP_NAME: &str = "snapshot.tmp";

/// Reads and writes the engine's single snapshot file.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        SnapshotStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn final_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE_NAME)
    }

    pub fn temp_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_TEMP_NAME)
    }

    /// Stat-based probe: does a committed snapshot exist?
    pub fn exists(&self) -> bool {
        self.final_path().is_file()
    }

    /// Write every table to `snapshot.tmp`, flush it, then atomically
    /// rename it over `snapshot.dat`. This replaces any prior snapshot in
    /// one step; a reader opening the final path always sees either the
    /// previous snapshot or the new one, never a torn one.
    pub fn save<'a>(&self, tables: impl IntoIterator<Item = &'a Table>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let temp_path = self.temp_path();
        let tables: Vec<&Table> = tables.into_iter().collect();

        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(SNAPSHOT_MAGIC)?;
            writer.write_u32::<LittleEndian>(SNAPSHOT_VERSION)?;
            writer.write_u32::<LittleEndian>(tables.len() as u32)?;
            for table in &tables {
                write_string(&mut writer, table.name())?;
                write_schema(&mut writer, table.schema())?;
                writer.write_u64::<LittleEndian>(table.row_count() as u64)?;
                for row in 0..table.row_count() {
                    for column in table.columns() {
                        let value = column
                            .get(row)
                            .expect("row_count invariant guarantees this index exists");
                        write_value(&mut writer, &value)?;
                    }
                }
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        std::fs::rename(&temp_path, self.final_path())?;
        info!(dir = %self.dir.display(), tables = tables.len(), "Saved snapshot");
        Ok(())
    }

    /// If `snapshot.dat` is absent, return `Ok(false)` (no snapshot to
    /// load). Otherwise verify the header, decode every table, and hand
    /// each fully-materialized `Table` to `visit_table`.
    pub fn load(&self, mut visit_table: impl FnMut(Table) -> Result<()>) -> Result<bool> {
        let path = self.final_path();
        if !path.is_file() {
            debug!(dir = %self.dir.display(), "No snapshot to load");
            return Ok(false);
        }

        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 12];
        reader.read_exact(&mut magic)?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(Error::InvalidSnapshotMagic);
        }
        let version = reader.read_u32::<LittleEndian>()?;
        if version != SNAPSHOT_VERSION {
            return Err(Error::InvalidSnapshotVersion(version));
        }

        let table_count = reader.read_u32::<LittleEndian>()?;
        for _ in 0..table_count {
            let name = read_string(&mut reader)?;
            let schema = read_schema(&mut reader)?;
            let row_count = reader.read_u64::<LittleEndian>()? as usize;

            let mut columns: Vec<Column> = schema
                .columns()
                .iter()
                .map(|c| Column::new(c.column_type))
                .collect();
            for _ in 0..row_count {
                for column in columns.iter_mut() {
                    let value = read_value(&mut reader)?;
                    column.append(value);
                }
            }

            visit_table(Table::from_parts(name, schema, columns))?;
        }

        info!(dir = %self.dir.display(), tables = table_count, "Loaded snapshot");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coleman_core::{ColumnDef, ColumnType, Schema, Value};
    use tempfile::tempdir;

    fn users_table() -> Table {
        let schema = Schema::new(vec![
            ColumnDef::new("id", ColumnType::Int64),
            ColumnDef::new("name", ColumnType::String),
            ColumnDef::new("score", ColumnType::Float64),
        ]);
        let mut table = Table::new("users", schema);
        table
            .append_record(vec![
                Value::Int64(1),
                Value::String("Alice".into()),
                Value::Float64(95.5),
            ])
            .unwrap();
        table
            .append_record(vec![
                Value::Int64(2),
                Value::String("Bob".into()),
                Value::Float64(87.3),
            ])
            .unwrap();
        table
    }

    #[test]
    fn missing_snapshot_loads_cleanly() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(!store.exists());
        let mut seen = Vec::new();
        let loaded = store.load(|t| {
            seen.push(t);
            Ok(())
        }).unwrap();
        assert!(!loaded);
        assert!(seen.is_empty());
    }

    #[test]
    fn save_then_load_round_trips_structurally() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let table = users_table();
        store.save([&table]).unwrap();
        assert!(store.exists());

        let mut loaded_tables = Vec::new();
        let loaded = store
            .load(|t| {
                loaded_tables.push(t);
                Ok(())
            })
            .unwrap();
        assert!(loaded);
        assert_eq!(loaded_tables.len(), 1);
        assert_eq!(loaded_tables[0], table);
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save([&users_table()]).unwrap();
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn save_overwrites_prior_snapshot() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let first = users_table();
        store.save([&first]).unwrap();

        let mut second = users_table();
        second
            .append_record(vec![
                Value::Int64(3),
                Value::String("Charlie".into()),
                Value::Float64(92.1),
            ])
            .unwrap();
        store.save([&second]).unwrap();

        let mut loaded = Vec::new();
        store.load(|t| {
            loaded.push(t);
            Ok(())
        }).unwrap();
        assert_eq!(loaded[0].row_count(), 3);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SNAPSHOT_FILE_NAME), b"not a snapshot file at all!!").unwrap();
        let store = SnapshotStore::new(dir.path());
        let result = store.load(|_| Ok(()));
        assert!(matches!(result, Err(Error::InvalidSnapshotMagic)));
    }
}
