//! INI parsing logic for converting loaded INI data into a `ConfigFile`.
//!
//! Parsing starts from `ConfigFile::default()` and overlays only the keys
//! present in the file, so a partial config keeps defaults for the rest.

use ini::Ini;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

use super::defaults::clamp_refresh_interval;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::feed::SpeedUnit;

/// Get the SPOT feed ID pattern.
///
/// Feed IDs are opaque alphanumeric keys issued by the SPOT share page
/// (e.g. `0onlLopfoM4bG5jXvnRoFuIpynadDqF6M`). They are embedded directly
/// in the request path, so anything else is rejected here rather than at
/// fetch time.
fn feed_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap())
}

/// Parse an INI structure into a ConfigFile, validating values.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [feed] section
    if let Some(section) = ini.section(Some("feed")) {
        if let Some(v) = section.get("feed_id") {
            let v = v.trim();
            if !v.is_empty() {
                if !feed_id_pattern().is_match(v) {
                    return Err(ConfigFileError::InvalidValue {
                        section: "feed".to_string(),
                        key: "feed_id".to_string(),
                        value: v.to_string(),
                        reason: "must contain only letters and digits".to_string(),
                    });
                }
                config.feed.feed_id = v.to_string();
            }
        }
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                config.feed.base_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Some(v) = section.get("refresh_interval") {
            let parsed: u64 = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "feed".to_string(),
                key: "refresh_interval".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer (seconds)".to_string(),
            })?;
            // Clamp to the SPOT API floor
            config.feed.refresh_interval = clamp_refresh_interval(parsed);
        }
        if let Some(v) = section.get("timeout") {
            config.feed.timeout = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "feed".to_string(),
                key: "timeout".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer (seconds)".to_string(),
            })?;
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("update_interval") {
            config.location.update_interval =
                v.parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "location".to_string(),
                    key: "update_interval".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer (seconds)".to_string(),
                })?;
        }
    }

    // [display] section
    if let Some(section) = ini.section(Some("display")) {
        if let Some(v) = section.get("timezone") {
            config.display.timezone =
                v.trim()
                    .parse()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "display".to_string(),
                        key: "timezone".to_string(),
                        value: v.to_string(),
                        reason: "must be an IANA timezone name (e.g. Africa/Accra)".to_string(),
                    })?;
        }
        if let Some(v) = section.get("reference_name") {
            let v = v.trim();
            if !v.is_empty() {
                config.display.reference_name = v.to_string();
            }
        }
        if let Some(v) = section.get("reference_latitude") {
            let parsed: f64 = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "display".to_string(),
                key: "reference_latitude".to_string(),
                value: v.to_string(),
                reason: "must be a number".to_string(),
            })?;
            if !(-90.0..=90.0).contains(&parsed) {
                return Err(ConfigFileError::InvalidValue {
                    section: "display".to_string(),
                    key: "reference_latitude".to_string(),
                    value: v.to_string(),
                    reason: "must be between -90 and 90 degrees".to_string(),
                });
            }
            config.display.reference_latitude = parsed;
        }
        if let Some(v) = section.get("reference_longitude") {
            let parsed: f64 = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "display".to_string(),
                key: "reference_longitude".to_string(),
                value: v.to_string(),
                reason: "must be a number".to_string(),
            })?;
            if !(-180.0..=180.0).contains(&parsed) {
                return Err(ConfigFileError::InvalidValue {
                    section: "display".to_string(),
                    key: "reference_longitude".to_string(),
                    value: v.to_string(),
                    reason: "must be between -180 and 180 degrees".to_string(),
                });
            }
            config.display.reference_longitude = parsed;
        }
        if let Some(v) = section.get("speed_unit") {
            let v = v.trim().to_lowercase();
            match v.as_str() {
                "kmh" | "km/h" => {
                    config.display.speed_unit = SpeedUnit::KilometersPerHour;
                }
                "knots" | "kn" => {
                    config.display.speed_unit = SpeedUnit::Knots;
                }
                _ => {
                    return Err(ConfigFileError::InvalidValue {
                        section: "display".to_string(),
                        key: "speed_unit".to_string(),
                        value: v.to_string(),
                        reason: "must be 'kmh' or 'knots'".to_string(),
                    });
                }
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
