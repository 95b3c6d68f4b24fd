// Measurement store tests: file database and write-through map

mod common;

use common::measurement;
use hostmon::store::{Database, FileDatabase, MeasurementMap, PersistentMap};

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = FileDatabase::new(dir.path().join("absent.bin"));
    assert!(db.load().unwrap().is_empty());
    assert_eq!(db.name(), "absent");
}

#[test]
fn save_then_load_restores_map() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = FileDatabase::new(dir.path().join("nested/dir/measurements.bin"));
    let map: MeasurementMap = [1, 2, 3].into_iter().map(|t| (t, measurement(t))).collect();
    db.save(&map).unwrap();
    assert_eq!(db.load().unwrap(), map);
}

#[test]
fn unknown_version_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("measurements.bin");
    std::fs::write(&path, [99u8, 0, 0]).unwrap();
    let err = FileDatabase::new(&path).load().unwrap_err();
    assert!(err.to_string().contains("unsupported store version 99"));
}

#[test]
fn empty_file_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("measurements.bin");
    std::fs::write(&path, b"").unwrap();
    assert!(FileDatabase::new(&path).load().is_err());
}

#[test]
fn persistent_map_writes_through_every_mutation() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("measurements.bin");

    let mut map = PersistentMap::open(FileDatabase::new(&path)).unwrap();
    assert!(map.is_empty());
    map.insert(measurement(10));
    map.insert(measurement(20));
    map.remove(10);

    let reopened = PersistentMap::open(FileDatabase::new(&path)).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(20), Some(&measurement(20)));
    assert!(reopened.get(10).is_none());
}

#[test]
fn prune_keeps_newest_entries() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("measurements.bin");
    let mut map = PersistentMap::open(FileDatabase::new(&path)).unwrap();
    for t in [5, 1, 4, 2, 3] {
        map.insert(measurement(t));
    }

    assert_eq!(map.prune_to(10), 0);
    assert_eq!(map.prune_to(2), 3);
    let kept: Vec<u64> = map.iter().map(|m| m.timestamp).collect();
    assert_eq!(kept, vec![4, 5]);
    assert_eq!(map.latest().map(|m| m.timestamp), Some(5));

    let reopened = PersistentMap::open(FileDatabase::new(&path)).unwrap();
    assert_eq!(reopened.len(), 2);
}

#[test]
fn clear_empties_the_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("measurements.bin");
    let mut map = PersistentMap::open(FileDatabase::new(&path)).unwrap();
    map.insert(measurement(1));
    map.clear();
    assert!(PersistentMap::open(FileDatabase::new(&path)).unwrap().is_empty());
}
