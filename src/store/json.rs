//! JSON file store.
//!
//! The file holds one object keyed by device name, the same shape the
//! browser dashboard keeps in local storage:
//!
//! ```json
//! { "Fridge": { "consumption": 150.0, "location": "Kitchen", "energySource": "Grid" } }
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DeviceStore, StoreError};
use crate::devices::{Device, DeviceDraft, NumericInput};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    consumption: NumericInput,
    #[serde(default)]
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    energy_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage_time: Option<NumericInput>,
}

/// Device store backed by a single JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("devices"), OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_temp(&self, temp: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = File::create(temp)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl DeviceStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Device>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: BTreeMap<String, Record> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        records
            .into_iter()
            .map(|(name, record)| {
                let draft = DeviceDraft {
                    name,
                    consumption: record.consumption,
                    location: record.location,
                    energy_source: record.energy_source,
                    usage_time: record.usage_time,
                };
                draft.validate().map_err(|e| StoreError::Corrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    fn save_all(&self, devices: &[Device]) -> Result<(), StoreError> {
        let records: BTreeMap<&str, Record> = devices
            .iter()
            .map(|d| {
                (
                    d.name.as_str(),
                    Record {
                        consumption: NumericInput::Number(d.consumption),
                        location: d.location.clone(),
                        energy_source: d.energy_source.clone(),
                        usage_time: d.usage_time.map(NumericInput::Number),
                    },
                )
            })
            .collect();
        let bytes = serde_json::to_vec_pretty(&records)?;

        let temp = self.temp_path();
        if let Err(e) = self.write_temp(&temp, &bytes) {
            let _ = fs::remove_file(&temp);
            return Err(self.io_error(e));
        }
        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            self.io_error(e)
        })
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}
