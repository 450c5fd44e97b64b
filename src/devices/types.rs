//! Device records and the unvalidated drafts submitted to the registry.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named energy-consuming device.
///
/// Identity is the `name` (case-sensitive). Values reaching the registry
/// through [`DeviceDraft::validate`] always satisfy [`Device::validate`];
/// the fields stay public so callers can build snapshots by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Unique, non-empty identifier.
    pub name: String,
    /// Consumption in kWh (finite, >= 0).
    pub consumption: f64,
    /// Free-text location, matched case-insensitively by [`Device::matches_location`].
    pub location: String,
    /// Energy source label such as `"Grid"` or `"Solar"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_source: Option<String>,
    /// Usage time in hours (finite, >= 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_time: Option<f64>,
}

impl Device {
    /// Creates a device with only the mandatory fields set.
    pub fn new(name: impl Into<String>, consumption: f64, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consumption,
            location: location.into(),
            energy_source: None,
            usage_time: None,
        }
    }

    /// Sets the energy source label.
    pub fn with_energy_source(mut self, source: impl Into<String>) -> Self {
        self.energy_source = Some(source.into());
        self
    }

    /// Sets the usage time in hours.
    pub fn with_usage_time(mut self, hours: f64) -> Self {
        self.usage_time = Some(hours);
        self
    }

    /// Returns true if `location` contains `filter`, ignoring case.
    ///
    /// An empty filter matches every device.
    pub fn matches_location(&self, filter: &str) -> bool {
        filter.is_empty()
            || self
                .location
                .to_lowercase()
                .contains(&filter.to_lowercase())
    }

    /// Checks the record invariants: non-empty name, finite non-negative numbers.
    ///
    /// # Errors
    ///
    /// Returns the first violated field.
    pub fn validate(&self) -> Result<(), FieldError> {
        check_name(&self.name)?;
        check_quantity("consumption", self.consumption)?;
        if let Some(hours) = self.usage_time {
            check_quantity("usageTime", hours)?;
        }
        Ok(())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:>10.2} kWh  {:<16} {:<12} {:>8}",
            self.name,
            self.consumption,
            self.location,
            self.energy_source.as_deref().unwrap_or("-"),
            self.usage_time
                .map_or_else(|| "-".to_string(), |h| format!("{h:.2} h")),
        )
    }
}

/// A numeric field as submitted by a caller: either a number or its text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Unvalidated candidate for [`crate::registry::Registry::add`].
///
/// Blank optional fields (`""`) count as absent. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDraft {
    pub name: String,
    pub consumption: NumericInput,
    pub location: String,
    #[serde(default)]
    pub energy_source: Option<String>,
    #[serde(default)]
    pub usage_time: Option<NumericInput>,
}

impl DeviceDraft {
    /// Creates a draft with the mandatory fields.
    pub fn new(
        name: impl Into<String>,
        consumption: impl Into<NumericInput>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            consumption: consumption.into(),
            location: location.into(),
            energy_source: None,
            usage_time: None,
        }
    }

    pub fn energy_source(mut self, source: impl Into<String>) -> Self {
        self.energy_source = Some(source.into());
        self
    }

    pub fn usage_time(mut self, hours: impl Into<NumericInput>) -> Self {
        self.usage_time = Some(hours.into());
        self
    }

    /// Parses and checks every field, producing the record to store.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] naming the first invalid field. Malformed
    /// numbers are rejected rather than coerced to zero.
    pub fn validate(self) -> Result<Device, FieldError> {
        check_name(&self.name)?;
        let consumption = parse_quantity("consumption", &self.consumption)?;
        let usage_time = match self.usage_time {
            Some(ref input) if !input.is_blank() => Some(parse_quantity("usageTime", input)?),
            _ => None,
        };
        let energy_source = self
            .energy_source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Device {
            name: self.name,
            consumption,
            location: self.location,
            energy_source,
            usage_time,
        })
    }
}

/// A device attribute that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct FieldError {
    /// Field name as it appears in the JSON representation.
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

fn check_name(name: &str) -> Result<(), FieldError> {
    if name.trim().is_empty() {
        return Err(FieldError::new("name", "must not be empty"));
    }
    Ok(())
}

fn check_quantity(field: &'static str, value: f64) -> Result<(), FieldError> {
    if !value.is_finite() {
        return Err(FieldError::new(field, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(FieldError::new(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

fn parse_quantity(field: &'static str, input: &NumericInput) -> Result<f64, FieldError> {
    let value = match input {
        NumericInput::Number(v) => *v,
        NumericInput::Text(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(FieldError::new(field, "is required"));
            }
            raw.parse::<f64>()
                .map_err(|_| FieldError::new(field, format!("\"{raw}\" is not a number")))?
        }
    };
    check_quantity(field, value)?;
    // Normalise -0.0 so it never renders as "-0.00".
    Ok(value + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_draft_validates() {
        let device = DeviceDraft::new("Laptop", "100", "Office").validate();
        assert_eq!(device, Ok(Device::new("Laptop", 100.0, "Office")));
    }

    #[test]
    fn full_draft_keeps_optional_fields() {
        let device = DeviceDraft::new("Heater", 2.5, "Garage")
            .energy_source("Solar")
            .usage_time("3.5")
            .validate()
            .expect("draft should validate");
        assert_eq!(device.energy_source.as_deref(), Some("Solar"));
        assert_eq!(device.usage_time, Some(3.5));
    }

    #[test]
    fn blank_optional_fields_are_absent() {
        let device = DeviceDraft::new("Lamp", "1", "Hall")
            .energy_source("  ")
            .usage_time("")
            .validate()
            .expect("draft should validate");
        assert_eq!(device.energy_source, None);
        assert_eq!(device.usage_time, None);
    }

    #[test]
    fn empty_name_rejected() {
        let err = DeviceDraft::new("   ", "1", "Hall").validate().unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn malformed_consumption_rejected_not_zeroed() {
        for raw in ["", "abc", "12kWh", "NaN", "inf", "-1"] {
            let err = DeviceDraft::new("Lamp", raw, "Hall").validate().unwrap_err();
            assert_eq!(err.field, "consumption", "input {raw:?}");
        }
    }

    #[test]
    fn negative_number_rejected() {
        let err = DeviceDraft::new("Lamp", -0.5, "Hall").validate().unwrap_err();
        assert!(err.reason.contains("non-negative"));
    }

    #[test]
    fn malformed_usage_time_rejected() {
        let err = DeviceDraft::new("Lamp", 1.0, "Hall")
            .usage_time("soon")
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "usageTime");
    }

    #[test]
    fn negative_zero_normalised() {
        let device = DeviceDraft::new("Lamp", "-0", "Hall")
            .validate()
            .expect("-0 is zero");
        assert!(device.consumption.is_sign_positive());
    }

    #[test]
    fn location_match_is_case_insensitive_substring() {
        let fridge = Device::new("Fridge", 150.0, "Kitchen");
        assert!(fridge.matches_location("kit"));
        assert!(fridge.matches_location("KITCHEN"));
        assert!(fridge.matches_location(""));
        assert!(!fridge.matches_location("office"));
    }

    #[test]
    fn draft_deserializes_numbers_and_text() {
        let json = r#"{"name":"TV","consumption":"42.5","location":"Lounge","usageTime":4}"#;
        let draft: DeviceDraft = serde_json::from_str(json).expect("draft JSON should parse");
        let device = draft.validate().expect("draft should validate");
        assert_eq!(device.consumption, 42.5);
        assert_eq!(device.usage_time, Some(4.0));
    }

    #[test]
    fn draft_ignores_unknown_keys() {
        let json = r#"{"id":3,"name":"TV","consumption":1,"location":"Lounge"}"#;
        let draft: DeviceDraft = serde_json::from_str(json).expect("extra keys are ignored");
        assert_eq!(draft, DeviceDraft::new("TV", 1.0, "Lounge"));
    }

    #[test]
    fn device_json_uses_camel_case() {
        let device = Device::new("TV", 1.0, "Lounge")
            .with_energy_source("Grid")
            .with_usage_time(2.0);
        let json = serde_json::to_value(&device).expect("device should serialize");
        assert_eq!(json["energySource"], "Grid");
        assert_eq!(json["usageTime"], 2.0);
    }
}
