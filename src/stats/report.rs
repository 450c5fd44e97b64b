//! Aggregate usage report for a snapshot.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::{
    consumption_by_energy_source, daily_average, leaderboard, monthly_cost_at,
    total_consumption, total_usage_time,
};
use crate::devices::Device;
use crate::stats::LeaderboardEntry;

/// Every statistic the dashboard shows, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStats {
    pub device_count: usize,
    /// Total consumption (kWh).
    pub total_consumption_kwh: f64,
    /// Total over a 30-day window (kWh/day).
    pub daily_average_kwh: f64,
    /// Projected monthly cost in currency units.
    pub monthly_cost: f64,
    /// Rate the cost was computed with.
    pub rate_per_kwh: f64,
    /// Sum of defined usage times (hours).
    pub total_usage_hours: f64,
    /// Consumption per energy source label (kWh).
    pub by_energy_source: BTreeMap<String, f64>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl UsageStats {
    /// Computes all statistics from `devices`.
    ///
    /// An empty snapshot yields zeros everywhere.
    pub fn from_devices(devices: &[Device], rate_per_kwh: f64) -> Self {
        Self {
            device_count: devices.len(),
            total_consumption_kwh: total_consumption(devices),
            daily_average_kwh: daily_average(devices),
            monthly_cost: monthly_cost_at(devices, rate_per_kwh),
            rate_per_kwh,
            total_usage_hours: total_usage_time(devices),
            by_energy_source: consumption_by_energy_source(devices),
            leaderboard: leaderboard(devices),
        }
    }
}

impl fmt::Display for UsageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Usage Statistics ---")?;
        writeln!(f, "Devices:            {}", self.device_count)?;
        writeln!(
            f,
            "Total consumption:  {:.2} kWh",
            self.total_consumption_kwh
        )?;
        writeln!(f, "Daily average:      {:.2} kWh", self.daily_average_kwh)?;
        writeln!(
            f,
            "Monthly cost:       {:.2} (at {} per kWh)",
            self.monthly_cost, self.rate_per_kwh
        )?;
        write!(f, "Total usage time:   {:.2} h", self.total_usage_hours)?;
        if !self.by_energy_source.is_empty() {
            write!(f, "\nBy energy source:")?;
            for (source, kwh) in &self.by_energy_source {
                write!(f, "\n  {source}: {kwh:.2} kWh")?;
            }
        }
        Ok(())
    }
}
