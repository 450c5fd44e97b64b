//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use energy_tracker::devices::DeviceDraft;
use energy_tracker::registry::Registry;
use energy_tracker::store::{JsonFileStore, MemoryStore};
use tempfile::TempDir;

/// Laptop, 100 kWh, Office.
pub fn laptop() -> DeviceDraft {
    DeviceDraft::new("Laptop", 100.0, "Office")
}

/// Fridge, 150 kWh, Kitchen.
pub fn fridge() -> DeviceDraft {
    DeviceDraft::new("Fridge", 150.0, "Kitchen")
}

/// Empty registry over a memory store the test can inspect.
pub fn memory_registry() -> (Registry, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Registry::new(Arc::clone(&store)), store)
}

/// JSON file store inside a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn file_store() -> (TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = JsonFileStore::new(dir.path().join("devices.json"));
    (dir, store)
}

/// Registry with the Laptop and Fridge devices added.
pub fn two_device_registry() -> Registry {
    let (registry, _) = memory_registry();
    registry.add(laptop()).expect("add laptop");
    registry.add(fridge()).expect("add fridge");
    registry
}
