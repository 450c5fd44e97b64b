//! Write-through persistence and concurrent mutation.

mod common;

use std::fs;
use std::sync::Arc;
use std::thread;

use energy_tracker::devices::DeviceDraft;
use energy_tracker::registry::{Registry, RegistryError};
use energy_tracker::store::{DeviceStore, JsonFileStore};

use common::{file_store, fridge, laptop, memory_registry};

#[test]
fn every_mutation_is_on_disk_before_returning() {
    let (_dir, store) = file_store();
    let registry = Registry::open(store.clone()).expect("open");

    registry.add(laptop()).expect("add");
    assert_eq!(store.load_all().expect("load").len(), 1);

    registry.add(fridge().energy_source("Grid")).expect("add");
    assert_eq!(store.load_all().expect("load"), registry.snapshot());

    registry.remove("Laptop").expect("remove");
    assert_eq!(store.load_all().expect("load"), registry.snapshot());

    registry.clear().expect("clear");
    assert!(store.load_all().expect("load").is_empty());
}

#[test]
fn reopen_restores_registry() {
    let (_dir, store) = file_store();
    {
        let registry = Registry::open(store.clone()).expect("open");
        registry.add(laptop().usage_time("6")).expect("add");
        registry.add(fridge()).expect("add");
    }
    let reopened = Registry::open(store).expect("reopen");
    assert_eq!(reopened.len(), 2);
    assert_eq!(
        reopened.find("Laptop").and_then(|d| d.usage_time),
        Some(6.0)
    );
}

#[test]
fn corrupt_file_refuses_to_open() {
    let (_dir, store) = file_store();
    fs::write(store.path(), "{ not json").expect("write");
    assert!(matches!(
        Registry::open(store),
        Err(RegistryError::PersistenceFailure(_))
    ));
}

#[test]
fn failed_write_keeps_memory_and_disk_in_step() {
    let (dir, store) = file_store();
    let registry = Registry::open(store.clone()).expect("open");
    registry.add(laptop()).expect("add");

    // Replacing the temp file path with a directory makes the next save fail.
    let blocker = dir.path().join("devices.json.tmp");
    fs::create_dir(&blocker).expect("create blocker");

    assert!(matches!(
        registry.add(fridge()),
        Err(RegistryError::PersistenceFailure(_))
    ));
    assert_eq!(registry.len(), 1);
    assert_eq!(store.load_all().expect("load"), registry.snapshot());

    fs::remove_dir(&blocker).expect("remove blocker");
    registry.add(fridge()).expect("add after recovery");
    assert_eq!(store.load_all().expect("load").len(), 2);
}

#[test]
fn concurrent_adds_are_serialized() {
    let (_dir, store) = file_store();
    let registry = Arc::new(Registry::open(store.clone()).expect("open"));

    thread::scope(|scope| {
        for worker in 0..8 {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                for i in 0..10 {
                    let draft = DeviceDraft::new(format!("w{worker}-d{i}"), 1.0, "Lab");
                    registry.add(draft).expect("add");
                }
            });
        }
    });

    assert_eq!(registry.len(), 80);
    assert_eq!(store.load_all().expect("load"), registry.snapshot());
}

#[test]
fn concurrent_duplicate_adds_admit_exactly_one() {
    let (registry, store) = memory_registry();
    let registry = Arc::new(registry);

    let accepted: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || registry.add(laptop()).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| usize::from(h.join().expect("thread should not panic")))
            .sum()
    });

    assert_eq!(accepted, 1);
    assert_eq!(registry.len(), 1);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn readers_see_committed_snapshots_during_writes() {
    let (registry, _) = memory_registry();
    let registry = Arc::new(registry);

    thread::scope(|scope| {
        let writer = Arc::clone(&registry);
        scope.spawn(move || {
            for i in 0..200 {
                writer
                    .add(DeviceDraft::new(format!("d{i:03}"), 1.0, "Lab"))
                    .expect("add");
            }
        });
        for _ in 0..4 {
            let reader = Arc::clone(&registry);
            scope.spawn(move || {
                let mut last = 0;
                for _ in 0..200 {
                    let seen = reader.snapshot().len();
                    assert!(seen >= last, "snapshot went backwards");
                    last = seen;
                }
            });
        }
    });

    assert_eq!(registry.len(), 200);
}

#[test]
fn json_store_describes_its_path() {
    let store = JsonFileStore::new("/tmp/energy/devices.json");
    assert!(store.describe().contains("/tmp/energy/devices.json"));
}
