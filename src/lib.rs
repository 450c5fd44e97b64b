//! Household and office energy device tracker.
//!
//! A [`registry::Registry`] owns the persisted device set; the [`stats`]
//! functions derive totals, cost estimates and the consumption leaderboard
//! from any snapshot of it.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod devices;
pub mod io;
pub mod registry;
pub mod stats;
pub mod store;
