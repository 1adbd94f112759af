//! Crash recovery and checkpoint scenarios (§8, scenarios 7–8).

use coleman::{ColumnDef, ColumnType, ManagerConfig, Schema, TableManager, Value};
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> ManagerConfig {
    ManagerConfig::for_testing()
        .with_wal_path(dir.join("coleman.wal"))
        .with_snapshot_dir(dir.join("snapshots"))
}

#[test]
fn crash_recovery_without_snapshot_replays_wal() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    {
        let manager = TableManager::open(config.clone()).unwrap();
        manager
            .create_table(
                "users",
                Schema::new(vec![
                    ColumnDef::new("id", ColumnType::Int64),
                    ColumnDef::new("name", ColumnType::String),
                ]),
            )
            .unwrap();
        manager
            .add_record("users", vec![Value::Int64(1), Value::String("Alice".into())])
            .unwrap();
        manager
            .add_record("users", vec![Value::Int64(2), Value::String("Bob".into())])
            .unwrap();
        // `manager` is dropped here without any explicit close/snapshot,
        // simulating a crash: the WAL is the only durable record.
    }

    let manager = TableManager::open(config).unwrap();
    let rows = manager.scan("users").unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::Int64(1), Value::String("Alice".into())],
            vec![Value::Int64(2), Value::String("Bob".into())],
        ]
    );
}

#[test]
fn snapshot_and_truncate_at_threshold() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let threshold = config.snapshot_record_threshold;
    let snapshot_path = config.snapshot_dir.join("snapshot.dat");

    {
        let manager = TableManager::open(config.clone()).unwrap();
        manager
            .create_table(
                "events",
                Schema::new(vec![ColumnDef::new("id", ColumnType::Int64)]),
            )
            .unwrap();
        for i in 0..threshold as i64 {
            manager.add_record("events", vec![Value::Int64(i)]).unwrap();
        }
        assert!(snapshot_path.exists());
        // WAL was truncated back to header-only after the checkpoint.
        let wal_bytes = std::fs::metadata(&config.wal_path).unwrap().len();
        assert_eq!(wal_bytes, coleman::WAL_HEADER_SIZE);
    }

    let manager = TableManager::open(config).unwrap();
    assert_eq!(manager.scan("events").unwrap().len(), threshold as usize);
}

#[test]
fn wal_append_before_mutate_means_recovery_reproduces_a_rejected_append_too() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    {
        let manager = TableManager::open(config.clone()).unwrap();
        manager
            .create_table(
                "t",
                Schema::new(vec![ColumnDef::new("id", ColumnType::Int64)]),
            )
            .unwrap();
        // This append is WAL-logged before the in-memory mutation is
        // attempted, so it fails both here and identically on replay.
        let err = manager.add_record("t", vec![Value::String("wrong type".into())]);
        assert!(err.is_err());
    }

    let manager = TableManager::open(config).unwrap();
    assert_eq!(manager.scan("t").unwrap().len(), 0);
}
