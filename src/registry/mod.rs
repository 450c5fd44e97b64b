//! Device registry: the authoritative, persisted set of devices.
//!
//! Mutations (`add`, `replace`, `remove`, `clear`) run one at a time under a
//! writer lock that spans the whole read-modify-persist step. The new set is
//! published only after the store accepts it, so a failed save leaves the
//! in-memory set equal to the last persisted one. Readers take a cheap
//! clone of the committed set and never wait on a store write.

mod error;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::devices::{Device, DeviceDraft};
use crate::store::DeviceStore;

pub use error::RegistryError;

type DeviceSet = BTreeMap<String, Device>;

/// Owned registry instance; create one per store (there is no global).
pub struct Registry {
    store: Box<dyn DeviceStore>,
    committed: RwLock<Arc<DeviceSet>>,
    writer: Mutex<()>,
}

impl Registry {
    /// Creates an empty registry without reading the store.
    ///
    /// The store is first written on the next mutation.
    pub fn new(store: impl DeviceStore + 'static) -> Self {
        Self::with_devices(Box::new(store), DeviceSet::new())
    }

    /// Hydrates a registry from everything the store holds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the store cannot be read,
    /// `InvalidField` for a record that breaks the device invariants and
    /// `DuplicateName` if two stored records share a name.
    pub fn open(store: impl DeviceStore + 'static) -> Result<Self, RegistryError> {
        let store: Box<dyn DeviceStore> = Box::new(store);
        let mut devices = DeviceSet::new();
        for device in store.load_all()? {
            device.validate()?;
            if devices.contains_key(&device.name) {
                return Err(RegistryError::DuplicateName(device.name));
            }
            devices.insert(device.name.clone(), device);
        }
        info!(
            store = %store.describe(),
            devices = devices.len(),
            "device registry loaded"
        );
        Ok(Self::with_devices(store, devices))
    }

    fn with_devices(store: Box<dyn DeviceStore>, devices: DeviceSet) -> Self {
        Self {
            store,
            committed: RwLock::new(Arc::new(devices)),
            writer: Mutex::new(()),
        }
    }

    /// Validates and inserts a new device.
    ///
    /// # Errors
    ///
    /// `InvalidField` for a bad draft, `DuplicateName` if the name is taken,
    /// `PersistenceFailure` if the store rejects the write.
    pub fn add(&self, draft: DeviceDraft) -> Result<Device, RegistryError> {
        let device = draft.validate()?;
        let _guard = self.writer.lock();
        let current = self.current();
        if current.contains_key(&device.name) {
            return Err(RegistryError::DuplicateName(device.name));
        }

        let mut next = DeviceSet::clone(&current);
        next.insert(device.name.clone(), device.clone());
        self.commit(next, "add")?;
        info!(
            name = %device.name,
            consumption_kwh = device.consumption,
            "device added"
        );
        Ok(device)
    }

    /// Replaces an existing device record in full.
    ///
    /// # Errors
    ///
    /// `InvalidField` for a bad draft, `NotFound` if no device has the
    /// draft's name, `PersistenceFailure` if the store rejects the write.
    pub fn replace(&self, draft: DeviceDraft) -> Result<Device, RegistryError> {
        let device = draft.validate()?;
        let _guard = self.writer.lock();
        let current = self.current();
        if !current.contains_key(&device.name) {
            return Err(RegistryError::NotFound(device.name));
        }

        let mut next = DeviceSet::clone(&current);
        next.insert(device.name.clone(), device.clone());
        self.commit(next, "replace")?;
        info!(name = %device.name, "device replaced");
        Ok(device)
    }

    /// Removes the device called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` if there is no such device, `PersistenceFailure` if the
    /// store rejects the write.
    pub fn remove(&self, name: &str) -> Result<(), RegistryError> {
        let _guard = self.writer.lock();
        let current = self.current();
        if !current.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }

        let mut next = DeviceSet::clone(&current);
        next.remove(name);
        self.commit(next, "remove")?;
        info!(name, "device removed");
        Ok(())
    }

    /// Removes every device. Clearing an empty registry still writes the store.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the store rejects the write.
    pub fn clear(&self) -> Result<(), RegistryError> {
        let _guard = self.writer.lock();
        let removed = self.current().len();
        self.commit(DeviceSet::new(), "clear")?;
        info!(removed, "device registry cleared");
        Ok(())
    }

    /// Devices whose location contains `location_filter` (case-insensitive),
    /// ordered by name. `None` or an empty filter yields every device.
    pub fn list(&self, location_filter: Option<&str>) -> Vec<Device> {
        let filter = location_filter.unwrap_or("");
        let devices: Vec<Device> = self
            .current()
            .values()
            .filter(|d| d.matches_location(filter))
            .cloned()
            .collect();
        debug!(filter, matched = devices.len(), "listed devices");
        devices
    }

    /// Every device, ordered by name.
    pub fn snapshot(&self) -> Vec<Device> {
        self.current().values().cloned().collect()
    }

    /// Looks up a device by exact name.
    pub fn find(&self, name: &str) -> Option<Device> {
        self.current().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    fn current(&self) -> Arc<DeviceSet> {
        self.committed.read().clone()
    }

    /// Persists `next` and publishes it. Caller must hold `writer`.
    fn commit(&self, next: DeviceSet, op: &'static str) -> Result<(), RegistryError> {
        let devices: Vec<Device> = next.values().cloned().collect();
        if let Err(e) = self.store.save_all(&devices) {
            warn!(
                op,
                store = %self.store.describe(),
                error = %e,
                "persist failed, change discarded"
            );
            return Err(e.into());
        }
        *self.committed.write() = Arc::new(next);
        Ok(())
    }
}
