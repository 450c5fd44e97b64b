//! Persistence collaborators for the device registry.
//!
//! The registry only needs two operations from a store: hydrate the full
//! device set and replace it atomically. Implementations decide the medium.

mod json;
mod memory;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::devices::Device;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Backing storage for a [`crate::registry::Registry`].
///
/// `save_all` must be all-or-nothing: after an error the previously saved
/// set is still what `load_all` returns.
pub trait DeviceStore: Send + Sync {
    /// Loads every persisted device.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the medium cannot be read or holds invalid data.
    fn load_all(&self) -> Result<Vec<Device>, StoreError>;

    /// Replaces the persisted set with `devices`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write could not be committed.
    fn save_all(&self, devices: &[Device]) -> Result<(), StoreError>;

    /// Short human-readable description used in log output.
    fn describe(&self) -> String;
}

impl<S: DeviceStore + ?Sized> DeviceStore for Box<S> {
    fn load_all(&self) -> Result<Vec<Device>, StoreError> {
        (**self).load_all()
    }

    fn save_all(&self, devices: &[Device]) -> Result<(), StoreError> {
        (**self).save_all(devices)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: DeviceStore + ?Sized> DeviceStore for Arc<S> {
    fn load_all(&self) -> Result<Vec<Device>, StoreError> {
        (**self).load_all()
    }

    fn save_all(&self, devices: &[Device]) -> Result<(), StoreError> {
        (**self).save_all(devices)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Failure reported by a [`DeviceStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode devices: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("corrupt device store {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
