/// CSV export of device snapshots.
pub mod export;
