//! CSV export of the device set.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::devices::Device;
use crate::stats::ranked;

/// Column header for the device CSV export.
const HEADER: &str = "rank,name,location,energy_source,consumption_kwh,usage_time_h";

/// Exports devices to a CSV file at the given path, in leaderboard order.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(devices: &[Device], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(devices, buf)
}

/// Writes devices as CSV to any writer.
///
/// Rows follow the leaderboard (descending consumption, ties by name), so
/// identical snapshots always produce identical output. Numbers carry two
/// decimals; missing optional fields are empty cells.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(devices: &[Device], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(','))?;

    for (i, device) in ranked(devices).into_iter().enumerate() {
        wtr.write_record(&[
            (i + 1).to_string(),
            device.name.clone(),
            device.location.clone(),
            device.energy_source.clone().unwrap_or_default(),
            format!("{:.2}", device.consumption),
            device
                .usage_time
                .map(|h| format!("{h:.2}"))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<Device> {
        vec![
            Device::new("Laptop", 100.0, "Office").with_usage_time(8.0),
            Device::new("Fridge", 150.0, "Kitchen").with_energy_source("Grid"),
            Device::new("Lamp, desk", 0.5, "Office"),
        ]
    }

    fn render(devices: &[Device]) -> String {
        let mut buf = Vec::new();
        write_csv(devices, &mut buf).expect("csv write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn header_and_rows_in_leaderboard_order() {
        let output = render(&devices());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,Fridge,Kitchen,Grid,150.00,");
        assert_eq!(lines[2], "2,Laptop,Office,,100.00,8.00");
    }

    #[test]
    fn commas_in_names_are_quoted() {
        let output = render(&devices());
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let names: Vec<String> = rdr
            .records()
            .filter_map(Result::ok)
            .map(|r| r[1].to_string())
            .collect();
        assert_eq!(names, vec!["Fridge", "Laptop", "Lamp, desk"]);
    }

    #[test]
    fn repeated_names_keep_their_own_fields() {
        let devices = vec![
            Device::new("Heater", 10.0, "Garage").with_energy_source("Solar"),
            Device::new("Heater", 20.0, "Attic").with_usage_time(2.0),
        ];
        let output = render(&devices);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "1,Heater,Attic,,20.00,2.00");
        assert_eq!(lines[2], "2,Heater,Garage,Solar,10.00,");
    }

    #[test]
    fn empty_snapshot_writes_header_only() {
        assert_eq!(render(&[]).lines().count(), 1);
    }

    #[test]
    fn export_to_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("devices.csv");
        export_csv(&devices(), &path).expect("export");
        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, render(&devices()));
    }
}
