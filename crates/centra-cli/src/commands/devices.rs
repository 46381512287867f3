//! Local device listing.

use anyhow::Result;
use centra_engine::{DeviceProvider, LocalDevices};

use crate::OutputFormat;
use crate::output::{self, Format};

/// Run the devices command.
pub fn run(format: OutputFormat, quiet: bool) -> Result<()> {
    let devices = LocalDevices::detect();

    let items = vec![
        ("Devices", devices.capacity().to_string()),
        ("Available", devices.available().to_string()),
        ("Kind", "host threads".to_string()),
        (
            "Peer Access",
            if devices.peer_access() { "supported" } else { "unavailable" }.to_string(),
        ),
    ];
    let fmt: Format = format.into();
    output::print_key_value_table(&items, fmt, quiet)
}
