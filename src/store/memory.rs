//! In-process store, used for tests and throwaway sessions.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{DeviceStore, StoreError};
use crate::devices::Device;

/// Keeps the "persisted" set in memory.
///
/// [`MemoryStore::fail_saves`] makes every subsequent save fail, which lets
/// callers observe how the registry behaves when persistence breaks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    devices: Mutex<Vec<Device>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `devices`.
    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self {
            devices: Mutex::new(devices),
            ..Self::default()
        }
    }

    /// Toggles save-failure injection.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the currently persisted set.
    pub fn persisted(&self) -> Vec<Device> {
        self.devices.lock().clone()
    }
}

impl DeviceStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Device>, StoreError> {
        Ok(self.persisted())
    }

    fn save_all(&self, devices: &[Device]) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store rejecting writes".into()));
        }
        *self.devices.lock() = devices.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
