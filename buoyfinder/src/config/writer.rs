//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;
use crate::feed::SpeedUnit;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let speed_unit = match config.display.speed_unit {
        SpeedUnit::KilometersPerHour => "kmh",
        SpeedUnit::Knots => "knots",
    };

    format!(
        r#"[feed]
; SPOT shared feed ID from your SPOT account's shared page
; (Share > Create Shared Page > feed key, letters and digits only)
feed_id = {}
; Base URL of the SPOT public feed API
; Only change this for testing against a mock server
base_url = {}
; Seconds between feed fetches (default: 300)
; The SPOT API rate-limits polling; values below 300 are clamped up
refresh_interval = {}
; Timeout in seconds for feed HTTP requests (default: 10)
timeout = {}

[location]
; Minimum seconds between device position updates (default: 3)
update_interval = {}

[display]
; IANA timezone for date/time display (default: Africa/Accra)
timezone = {}
; Fixed reference point shown alongside asset distances
; Defaults to Tema Harbour on the Ghanaian coast
reference_name = {}
reference_latitude = {}
reference_longitude = {}
; Speed over ground unit: kmh or knots (default: kmh)
speed_unit = {}

[logging]
; Log file path (default: ~/.buoyfinder/buoyfinder.log)
file = {}
"#,
        config.feed.feed_id,
        config.feed.base_url,
        config.feed.refresh_interval,
        config.feed.timeout,
        config.location.update_interval,
        config.display.timezone.name(),
        config.display.reference_name,
        config.display.reference_latitude,
        config.display.reference_longitude,
        speed_unit,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
