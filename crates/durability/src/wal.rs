//! Write-ahead log: an append-only file of logical mutations with
//! monotonic sequence numbers and per-record CRC32 integrity checks
//! (§4.5).
//!
//! ```text
//! header: magic[12] | version: u32
//! record: seq: u64 | data_len: u32 | data[data_len] | crc32: u32
//! ```
//!
//! The durability contract (§4.5, §5): a successful `append` means the
//! record is on durable storage. Callers must append to the WAL *before*
//! mutating in-memory state.

use crate::wal_entry::WalEntry;
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// 12-byte header magic: `"COLEMAN_WAL"` plus a trailing NUL.
pub const WAL_MAGIC: &[u8; 12] = b"COLEMAN_WAL\0";
pub const WAL_VERSION: u32 = 1;
pub const WAL_HEADER_SIZE: u64 = 16;

struct WalFile {
    file: File,
}

/// Append-only WAL file.
///
/// `append` and `truncate` are serialized through an internal mutex, so
/// records stay totally ordered even if more than one writer reached this
/// layer — today the `TableManager`'s outer exclusive lock already
/// guarantees that, but the WAL doesn't depend on it (§5).
pub struct Wal {
    path: PathBuf,
    inner: Mutex<WalFile>,
    next_seq: AtomicU64,
}

impl Wal {
    /// Open the WAL at `path`. Creates the file and writes the header if
    /// it doesn't exist; otherwise verifies the header and scans the log
    /// to recover the highest committed sequence number.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let existed = path.exists();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        let next_seq = if existed && file.metadata()?.len() > 0 {
            Self::verify_header(&mut file)?;
            let highest = Self::scan_highest_seq(&path)?;
            debug!(path = %path.display(), highest, "Opened existing WAL");
            highest + 1
        } else {
            Self::write_header(&mut file)?;
            info!(path = %path.display(), "Created new WAL");
            1
        };

        Ok(Wal {
            path,
            inner: Mutex::new(WalFile { file }),
            next_seq: AtomicU64::new(next_seq),
        })
    }

    fn write_header(file: &mut File) -> Result<()> {
        file.seek(SeekFrom::Start(0))?;
        file.write_all(WAL_MAGIC)?;
        file.write_u32::<LittleEndian>(WAL_VERSION)?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }

    fn verify_header(file: &mut File) -> Result<()> {
        file.seek(SeekFrom::Start(0))?;
        let mut magic = [0u8; 12];
        file.read_exact(&mut magic)?;
        if &magic != WAL_MAGIC {
            return Err(Error::InvalidWalMagic);
        }
        let version = file.read_u32::<LittleEndian>()?;
        if version != WAL_VERSION {
            return Err(Error::InvalidWalVersion(version));
        }
        Ok(())
    }

    fn scan_highest_seq(path: &Path) -> Result<u64> {
        let mut highest = 0u64;
        Self::replay_file(path, |seq, _entry| {
            highest = seq;
            Ok(())
        })?;
        Ok(highest)
    }

    /// Append one entry. Returns the assigned sequence number once the
    /// record is flushed to durable storage.
    pub fn append(&self, entry: &WalEntry) -> Result<u64> {
        let data = entry.encode()?;
        let mut hasher = Hasher::new();
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut guard = self.inner.lock();
        let seq = self.next_seq.load(Ordering::SeqCst);

        guard.file.seek(SeekFrom::End(0))?;
        guard.file.write_u64::<LittleEndian>(seq)?;
        guard.file.write_u32::<LittleEndian>(data.len() as u32)?;
        guard.file.write_all(&data)?;
        guard.file.write_u32::<LittleEndian>(checksum)?;
        guard.file.flush()?;
        guard.file.sync_all()?;

        self.next_seq.store(seq + 1, Ordering::SeqCst);
        debug!(seq, len = data.len(), "Appended WAL record");
        Ok(seq)
    }

    /// Replay every record currently in the log, in sequence order,
    /// calling `visit` with each fully-decoded entry. A premature
    /// end-of-file (an incompletely flushed last record) stops replay
    /// cleanly rather than failing — it's the tail of the log.
    ///
    /// Generic over the visitor's error type so a caller one layer up
    /// (e.g. the table manager's recovery sequence) can fail replay with
    /// its own fatal-recovery error variants while WAL-internal errors
    /// (I/O, CRC mismatch) still convert in via `From`.
    pub fn replay<E: From<Error>>(
        &self,
        visit: impl FnMut(u64, WalEntry) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        Self::replay_file(&self.path, visit)
    }

    fn replay_file<E: From<Error>>(
        path: &Path,
        mut visit: impl FnMut(u64, WalEntry) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        let file = File::open(path).map_err(Error::from)?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(WAL_HEADER_SIZE)).map_err(Error::from)?;

        loop {
            let seq = match reader.read_u64::<LittleEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(Error::from(e).into()),
            };
            let data_len = match reader.read_u32::<LittleEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(Error::from(e).into()),
            };
            let mut data = vec![0u8; data_len as usize];
            if reader.read_exact(&mut data).is_err() {
                warn!(seq, "WAL tail truncated mid-record, stopping replay");
                break;
            }
            let stored_crc = match reader.read_u32::<LittleEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    warn!(seq, "WAL tail missing trailing CRC, stopping replay");
                    break;
                }
                Err(e) => return Err(Error::from(e).into()),
            };

            let mut hasher = Hasher::new();
            hasher.update(&data);
            if hasher.finalize() != stored_crc {
                return Err(Error::WalCorruption { seq }.into());
            }

            let entry = WalEntry::decode(&data).map_err(E::from)?;
            visit(seq, entry)?;
        }
        Ok(())
    }

    /// Reset the file to just its header and the sequence counter back to
    /// the start. Called after a successful snapshot: the WAL becomes the
    /// authoritative tail on top of that snapshot (§4.7).
    pub fn truncate(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        guard.file.set_len(WAL_HEADER_SIZE)?;
        guard.file.flush()?;
        guard.file.sync_all()?;
        self.next_seq.store(1, Ordering::SeqCst);
        info!(path = %self.path.display(), "Truncated WAL to header");
        Ok(())
    }

    /// Current size of the WAL file in bytes.
    pub fn size(&self) -> Result<u64> {
        let guard = self.inner.lock();
        Ok(guard.file.metadata()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coleman_core::{ColumnDef, ColumnType, Schema, Value};
    use tempfile::tempdir;

    fn create_table_entry() -> WalEntry {
        WalEntry::CreateTable {
            table_name: "users".to_string(),
            schema: Schema::new(vec![
                ColumnDef::new("id", ColumnType::Int64),
                ColumnDef::new("name", ColumnType::String),
            ]),
        }
    }

    #[test]
    fn fresh_wal_has_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coleman.wal");
        let wal = Wal::open(&path).unwrap();
        assert_eq!(wal.size().unwrap(), WAL_HEADER_SIZE);
    }

    #[test]
    fn append_assigns_contiguous_sequence_numbers() {
        let dir = tempdir().unwrap();
        let wal = Wal::open(dir.path().join("coleman.wal")).unwrap();
        let seq1 = wal.append(&create_table_entry()).unwrap();
        let seq2 = wal
            .append(&WalEntry::AddRecord {
                table_name: "users".to_string(),
                values: vec![Value::Int64(1), Value::String("Alice".into())],
            })
            .unwrap();
        assert_eq!(seq1, 1);
        assert_eq!(seq2, 2);
    }

    #[test]
    fn replay_reproduces_appended_entries_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coleman.wal");
        let wal = Wal::open(&path).unwrap();
        let create = create_table_entry();
        let add = WalEntry::AddRecord {
            table_name: "users".to_string(),
            values: vec![Value::Int64(1), Value::String("Alice".into())],
        };
        wal.append(&create).unwrap();
        wal.append(&add).unwrap();

        let mut replayed = Vec::new();
        wal.replay(|seq, entry| {
            replayed.push((seq, entry));
            Ok(())
        })
        .unwrap();
        assert_eq!(replayed, vec![(1, create), (2, add)]);
    }

    #[test]
    fn reopen_recovers_highest_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coleman.wal");
        {
            let wal = Wal::open(&path).unwrap();
            wal.append(&create_table_entry()).unwrap();
        }
        let wal = Wal::open(&path).unwrap();
        let seq = wal
            .append(&WalEntry::AddRecord {
                table_name: "users".to_string(),
                values: vec![Value::Int64(1), Value::String("Alice".into())],
            })
            .unwrap();
        assert_eq!(seq, 2);
    }

    #[test]
    fn truncate_resets_to_header_and_sequence_restarts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coleman.wal");
        let wal = Wal::open(&path).unwrap();
        wal.append(&create_table_entry()).unwrap();
        wal.truncate().unwrap();
        assert_eq!(wal.size().unwrap(), WAL_HEADER_SIZE);
        let seq = wal.append(&create_table_entry()).unwrap();
        assert_eq!(seq, 1);
    }

    #[test]
    fn corrupted_record_is_detected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coleman.wal");
        {
            let wal = Wal::open(&path).unwrap();
            wal.append(&create_table_entry()).unwrap();
        }

        // Flip a byte inside the record's payload region, after the header
        // and the seq+len prefix. `Wal::open` scans the log to recover the
        // highest sequence number, so corruption surfaces there.
        let mut bytes = std::fs::read(&path).unwrap();
        let corrupt_at = WAL_HEADER_SIZE as usize + 8 + 4 + 2;
        bytes[corrupt_at] ^= 0xFF;
        std::fs::write(&path, bytes).unwrap();

        let result = Wal::open(&path);
        assert!(matches!(result, Err(Error::WalCorruption { .. })));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coleman.wal");
        std::fs::write(&path, b"NOT_A_COLEMAN_WAL_HEADER_AT_ALL").unwrap();
        assert!(matches!(Wal::open(&path), Err(Error::InvalidWalMagic)));
    }
}
