//! Consumption ranking.

use std::fmt;

use serde::Serialize;

use crate::devices::Device;

/// One ranked device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub name: String,
    pub location: String,
    /// Consumption in kWh, unrounded.
    pub consumption: f64,
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {:.2} kWh",
            self.name, self.location, self.consumption
        )
    }
}

/// Devices in leaderboard order: descending consumption, ties by name.
///
/// The order depends only on the snapshot contents, so repeated calls on
/// the same snapshot agree. Non-finite values are ordered with
/// [`f64::total_cmp`] instead of panicking.
pub fn ranked(devices: &[Device]) -> Vec<&Device> {
    let mut ranked: Vec<&Device> = devices.iter().collect();
    ranked.sort_by(|a, b| {
        b.consumption
            .total_cmp(&a.consumption)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Ranks devices by descending consumption, ties broken by name.
pub fn leaderboard(devices: &[Device]) -> Vec<LeaderboardEntry> {
    ranked(devices)
        .into_iter()
        .enumerate()
        .map(|(i, d)| LeaderboardEntry {
            rank: i + 1,
            name: d.name.clone(),
            location: d.location.clone(),
            consumption: d.consumption,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(devices: &[Device]) -> Vec<String> {
        leaderboard(devices).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn highest_consumer_first() {
        let devices = vec![
            Device::new("Laptop", 100.0, "Office"),
            Device::new("Fridge", 150.0, "Kitchen"),
        ];
        assert_eq!(
            lines(&devices),
            vec!["Fridge (Kitchen): 150.00 kWh", "Laptop (Office): 100.00 kWh"]
        );
    }

    #[test]
    fn ties_ordered_by_name_regardless_of_input_order() {
        let a = vec![
            Device::new("Kettle", 2.0, "Kitchen"),
            Device::new("Heater", 2.0, "Garage"),
            Device::new("Lamp", 1.0, "Hall"),
        ];
        let mut b = a.clone();
        b.reverse();
        let names: Vec<String> = leaderboard(&a).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Heater", "Kettle", "Lamp"]);
        assert_eq!(leaderboard(&a), leaderboard(&b));
    }

    #[test]
    fn ranks_are_one_based() {
        let devices = vec![Device::new("Solo", 1.0, "Den")];
        assert_eq!(leaderboard(&devices)[0].rank, 1);
        assert!(leaderboard(&[]).is_empty());
    }

    #[test]
    fn nan_does_not_panic() {
        let devices = vec![
            Device::new("A", 1.0, "X"),
            Device::new("B", f64::NAN, "X"),
            Device::new("C", -3.0, "X"),
        ];
        assert_eq!(leaderboard(&devices).len(), 3);
    }
}
