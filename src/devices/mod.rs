//! Device records and input validation.

pub mod types;

pub use types::{Device, DeviceDraft, FieldError, NumericInput};
