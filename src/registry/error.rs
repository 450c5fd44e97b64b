use thiserror::Error;

use crate::devices::FieldError;
use crate::store::StoreError;

/// Failure of a registry operation.
///
/// None of these are retried inside the registry; the caller decides.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidField(#[from] FieldError),

    #[error("device \"{0}\" already exists")]
    DuplicateName(String),

    #[error("device \"{0}\" not found")]
    NotFound(String),

    #[error("failed to persist devices: {0}")]
    PersistenceFailure(#[from] StoreError),
}

impl RegistryError {
    /// Stable machine-readable kind, used by the CLI and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidField(_) => "invalid_field",
            Self::DuplicateName(_) => "duplicate_name",
            Self::NotFound(_) => "not_found",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }
}
