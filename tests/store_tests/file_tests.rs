//! FileBackedStore Tests
//!
//! Tests verify:
//! - The counter file holds the decimal value after each increment
//! - Reopening restores the persisted value
//! - Missing or corrupt files fall back to zero
//! - Write failures are swallowed and the counter still advances
//! - Concurrent increments hand out every value exactly once

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use pingpong::config::FileWriteMode;
use pingpong::{CounterStore, FileBackedStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("count.txt");
    (temp_dir, path)
}

fn read_file(path: &PathBuf) -> String {
    fs::read_to_string(path).unwrap()
}

// =============================================================================
// Startup Tests
// =============================================================================

#[test]
fn test_missing_file_starts_at_zero() {
    let (_temp, path) = setup_temp_file();

    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    assert_eq!(store.current().unwrap(), 0);
    // Nothing is written until the first increment
    assert!(!path.exists());
}

#[test]
fn test_existing_file_is_restored() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "41").unwrap();

    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    assert_eq!(store.current().unwrap(), 41);
    assert_eq!(store.increment().unwrap(), 41);
}

#[test]
fn test_surrounding_whitespace_is_tolerated() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "  12\n").unwrap();

    let store = FileBackedStore::open(&path, FileWriteMode::Overwrite);

    assert_eq!(store.current().unwrap(), 12);
}

#[test]
fn test_corrupt_file_starts_at_zero() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "not a number").unwrap();

    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    assert_eq!(store.current().unwrap(), 0);
}

#[test]
fn test_negative_value_is_treated_as_corrupt() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "-3").unwrap();

    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    assert_eq!(store.current().unwrap(), 0);
}

#[test]
fn test_deleted_file_before_reopen_starts_at_zero() {
    let (_temp, path) = setup_temp_file();
    {
        let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);
        store.increment().unwrap();
        store.increment().unwrap();
    }
    fs::remove_file(&path).unwrap();

    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    assert_eq!(store.current().unwrap(), 0);
}

#[test]
fn test_directory_in_place_of_file_starts_at_zero() {
    let (temp, _) = setup_temp_file();
    let path = temp.path().join("is_a_dir");
    fs::create_dir(&path).unwrap();

    let store = FileBackedStore::open(&path, FileWriteMode::Overwrite);

    assert_eq!(store.current().unwrap(), 0);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_increment_writes_decimal_value() {
    let (_temp, path) = setup_temp_file();
    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    assert_eq!(store.increment().unwrap(), 0);
    assert_eq!(read_file(&path), "1");

    assert_eq!(store.increment().unwrap(), 1);
    assert_eq!(read_file(&path), "2");
}

#[test]
fn test_overwrite_mode_replaces_contents() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "9").unwrap();
    let store = FileBackedStore::open(&path, FileWriteMode::Overwrite);

    for _ in 0..3 {
        store.increment().unwrap();
    }

    // Full overwrite, no appended history
    assert_eq!(read_file(&path), "12");
}

#[test]
fn test_atomic_rename_leaves_no_temp_file() {
    let (temp, path) = setup_temp_file();
    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    store.increment().unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["count.txt".to_string()]);
}

#[test]
fn test_reopen_restores_after_k_increments() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "7").unwrap();

    {
        let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);
        for _ in 0..25 {
            store.increment().unwrap();
        }
    }

    let reopened = FileBackedStore::open(&path, FileWriteMode::AtomicRename);
    assert_eq!(reopened.current().unwrap(), 32);
    assert_eq!(reopened.increment().unwrap(), 32);
}

#[test]
fn test_current_reads_memory_not_file() {
    let (_temp, path) = setup_temp_file();
    let store = FileBackedStore::open(&path, FileWriteMode::Overwrite);
    store.increment().unwrap();

    fs::write(&path, "999").unwrap();

    assert_eq!(store.current().unwrap(), 1);
}

// =============================================================================
// Failure Policy Tests
// =============================================================================

#[test]
fn test_write_failure_is_logged_and_counter_advances() {
    let (temp, _) = setup_temp_file();
    let path = temp.path().join("missing_dir").join("count.txt");

    for mode in [FileWriteMode::Overwrite, FileWriteMode::AtomicRename] {
        let store = FileBackedStore::open(&path, mode);

        assert_eq!(store.increment().unwrap(), 0);
        assert_eq!(store.increment().unwrap(), 1);
        assert_eq!(store.current().unwrap(), 2);
        assert_eq!(store.persist_failures(), 2);
        assert!(!path.exists());
    }
}

#[test]
fn test_successful_writes_record_no_failures() {
    let (_temp, path) = setup_temp_file();
    let store = FileBackedStore::open(&path, FileWriteMode::AtomicRename);

    store.increment().unwrap();

    assert_eq!(store.persist_failures(), 0);
    assert_eq!(store.path(), path.as_path());
    assert_eq!(store.write_mode(), FileWriteMode::AtomicRename);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_increments_are_unique_and_persisted() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "10").unwrap();
    let store = Arc::new(FileBackedStore::open(&path, FileWriteMode::AtomicRename));

    let threads = 4;
    let per_thread = 50;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|_| store.increment().unwrap())
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for value in handle.join().unwrap() {
            assert!(seen.insert(value), "value {} handed out twice", value);
        }
    }

    let total = (threads * per_thread) as u64;
    assert_eq!(seen, (10..10 + total).collect::<HashSet<u64>>());
    // The write lock spans the file write, so the last write is the highest
    assert_eq!(read_file(&path), (10 + total).to_string());
}
