//! File-backed integration tests for `ParcelStore`
//!
//! Each test uses its own temporary database. Several tests open more than
//! one connection to the same file to exercise the guarded writes the way
//! independent callers would.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::thread;
use std::time::Duration;

use parcel_store::{Parcel, ParcelError, ParcelStatus, ParcelStore, db};
use pretty_assertions::assert_eq;
use rand::Rng;
use rusqlite::Connection;
use tempfile::TempDir;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn open(path: &Path) -> Connection {
    db::open_at_path(path, Duration::from_secs(5)).expect("open db")
}

fn test_parcel() -> Parcel {
    Parcel::registered(1001, "test_new")
}

fn temp_db() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("tracker.db");
    (dir, path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Single connection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn add_get_delete() {
    let (_dir, path) = temp_db();
    let conn = open(&path);
    let store = ParcelStore::new(&conn);
    let mut parcel = test_parcel();

    let number = store.add(&parcel).expect("add");
    parcel.number = number;
    assert_eq!(store.get(number).expect("get"), parcel);

    store.delete(number).expect("delete");
    let err = store.get(number).expect_err("deleted");
    assert!(matches!(err, ParcelError::NotFound { .. }));
}

#[test]
fn set_address() {
    let (_dir, path) = temp_db();
    let conn = open(&path);
    let store = ParcelStore::new(&conn);

    let number = store.add(&test_parcel()).expect("add");
    store.set_address(number, "new test address").expect("set address");

    assert_eq!(store.get(number).expect("get").address, "new test address");
}

#[test]
fn set_status() {
    let (_dir, path) = temp_db();
    let conn = open(&path);
    let store = ParcelStore::new(&conn);

    let number = store.add(&test_parcel()).expect("add");
    store.set_status(number, &ParcelStatus::Sent).expect("set status");

    assert_eq!(store.get(number).expect("get").status, ParcelStatus::Sent);
}

#[test]
fn get_by_client() {
    let (_dir, path) = temp_db();
    let conn = open(&path);
    let store = ParcelStore::new(&conn);

    let client = rand::rng().random_range(0..10_000_000);
    let mut expected: HashMap<i64, Parcel> = HashMap::new();
    for _ in 0..3 {
        let mut parcel = test_parcel();
        parcel.client = client;
        parcel.number = store.add(&parcel).expect("add");
        expected.insert(parcel.number, parcel);
    }
    store.add(&test_parcel()).expect("add unrelated");

    let stored = store.get_by_client(client).expect("get by client");
    assert_eq!(stored.len(), expected.len());
    for parcel in stored {
        assert_eq!(expected.get(&parcel.number), Some(&parcel));
    }
}

#[test]
fn deleted_number_is_not_reused() {
    let (_dir, path) = temp_db();
    let conn = open(&path);
    let store = ParcelStore::new(&conn);

    let first = store.add(&test_parcel()).expect("add");
    store.delete(first).expect("delete");
    let second = store.add(&test_parcel()).expect("add");

    assert!(second > first);
    assert!(store.get(first).expect_err("gone").is_not_found());
}

#[test]
fn records_survive_reopen() {
    let (_dir, path) = temp_db();
    let mut parcel = test_parcel();
    {
        let conn = open(&path);
        parcel.number = ParcelStore::new(&conn).add(&parcel).expect("add");
    }

    let conn = open(&path);
    assert_eq!(ParcelStore::new(&conn).get(parcel.number).expect("get"), parcel);
}

// ─────────────────────────────────────────────────────────────────────────────
// Independent connections
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn guard_sees_status_written_by_other_connection() {
    let (_dir, path) = temp_db();
    let writer = open(&path);
    let courier = open(&path);

    let number = ParcelStore::new(&writer).add(&test_parcel()).expect("add");
    ParcelStore::new(&courier)
        .set_status(number, &ParcelStatus::Sent)
        .expect("send");

    let store = ParcelStore::new(&writer);
    store.set_address(number, "changed too late").expect("no-op");
    store.delete(number).expect("no-op");

    let stored = store.get(number).expect("still present");
    assert_eq!(stored.address, "test_new");
    assert_eq!(stored.status, ParcelStatus::Sent);
}

#[test]
fn concurrent_adds_get_distinct_numbers() {
    let (_dir, path) = temp_db();
    // Create the schema once before the writers race.
    drop(open(&path));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open(&path);
                let store = ParcelStore::new(&conn);
                (0..25)
                    .map(|_| {
                        store
                            .add(&Parcel::registered(worker, "concurrent"))
                            .expect("add")
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut numbers = HashSet::new();
    for handle in handles {
        for number in handle.join().expect("worker") {
            assert!(numbers.insert(number), "number {number} assigned twice");
        }
    }
    assert_eq!(numbers.len(), 100);
}

#[test]
fn racing_delete_and_send_leave_each_parcel_sent_or_deleted() {
    let (_dir, path) = temp_db();
    let conn = open(&path);
    let store = ParcelStore::new(&conn);
    let numbers: Vec<i64> = (0..50)
        .map(|_| store.add(&test_parcel()).expect("add"))
        .collect();

    let sender = {
        let path = path.clone();
        let numbers = numbers.clone();
        thread::spawn(move || {
            let conn = open(&path);
            let store = ParcelStore::new(&conn);
            for number in numbers {
                store.set_status(number, &ParcelStatus::Sent).expect("send");
            }
        })
    };
    let deleter = {
        let numbers = numbers.clone();
        thread::spawn(move || {
            let conn = open(&path);
            let store = ParcelStore::new(&conn);
            for number in numbers.into_iter().rev() {
                store.delete(number).expect("delete");
            }
        })
    };
    sender.join().expect("sender");
    deleter.join().expect("deleter");

    // Every parcel was either deleted while registered or survived as sent.
    for number in numbers {
        match store.get(number) {
            Ok(parcel) => assert_eq!(parcel.status, ParcelStatus::Sent),
            Err(err) => assert!(err.is_not_found()),
        }
    }
}
