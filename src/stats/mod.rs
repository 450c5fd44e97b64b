//! Statistics derived from a device snapshot.
//!
//! Everything here is a pure function of the slice it is given: no state is
//! kept between calls, so results always match the snapshot passed in.
//! Figures keep full `f64` precision; use [`format_kwh`] (or the `Display`
//! impls) to round at the presentation boundary.
//!
//! Inputs are expected to satisfy the device invariants. A snapshot that
//! bypassed validation (negative or NaN consumption) still produces a
//! result, with the bad values propagated through the sums.

pub mod leaderboard;
pub mod report;

use std::collections::BTreeMap;

use crate::devices::Device;

pub use leaderboard::{LeaderboardEntry, leaderboard, ranked};
pub use report::UsageStats;

/// Fixed amortisation window for the daily average (not calendar-aware).
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Unit cost per kWh used for the monthly cost estimate.
pub const DEFAULT_RATE_PER_KWH: f64 = 0.12;

/// Bucket label for devices without an energy source.
pub const UNSPECIFIED_SOURCE: &str = "Unspecified";

/// Sum of `consumption` over all devices (kWh).
pub fn total_consumption(devices: &[Device]) -> f64 {
    devices.iter().map(|d| d.consumption).sum()
}

/// Total consumption spread over [`DAYS_PER_MONTH`] days (kWh/day).
pub fn daily_average(devices: &[Device]) -> f64 {
    total_consumption(devices) / DAYS_PER_MONTH
}

/// Total consumption priced at [`DEFAULT_RATE_PER_KWH`].
pub fn monthly_cost(devices: &[Device]) -> f64 {
    monthly_cost_at(devices, DEFAULT_RATE_PER_KWH)
}

/// Total consumption priced at `rate_per_kwh`.
pub fn monthly_cost_at(devices: &[Device], rate_per_kwh: f64) -> f64 {
    total_consumption(devices) * rate_per_kwh
}

/// Sum of `usage_time` over devices that define it (hours).
pub fn total_usage_time(devices: &[Device]) -> f64 {
    devices.iter().filter_map(|d| d.usage_time).sum()
}

/// Consumption summed per energy source label, ordered by label.
///
/// Devices without a source land in [`UNSPECIFIED_SOURCE`], so the buckets
/// always add up to [`total_consumption`].
pub fn consumption_by_energy_source(devices: &[Device]) -> BTreeMap<String, f64> {
    let mut buckets = BTreeMap::new();
    for d in devices {
        let label = d.energy_source.as_deref().unwrap_or(UNSPECIFIED_SOURCE);
        *buckets.entry(label.to_string()).or_insert(0.0) += d.consumption;
    }
    buckets
}

/// Formats an energy or cost figure with exactly two decimals.
pub fn format_kwh(value: f64) -> String {
    format!("{value:.2}")
}
