//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use chrono_tz::Tz;
use std::path::PathBuf;

use crate::feed::SpeedUnit;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Feed settings
    pub feed: FeedSettings,
    /// Location receiver settings
    pub location: LocationSettings,
    /// Display settings for snapshot formatting
    pub display: DisplaySettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Satellite feed configuration.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// SPOT shared feed ID (the public feed key, letters and digits only).
    /// Empty until the user configures their feed.
    pub feed_id: String,
    /// Base URL of the SPOT public feed API.
    pub base_url: String,
    /// Seconds between feed fetches.
    /// Values below the 5-minute API floor are clamped.
    pub refresh_interval: u64,
    /// Timeout in seconds for feed HTTP requests.
    pub timeout: u64,
}

/// Device location receiver configuration.
#[derive(Debug, Clone)]
pub struct LocationSettings {
    /// Minimum seconds between device position updates.
    pub update_interval: u64,
}

/// Display configuration for snapshot formatting.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    /// IANA timezone for date/time display.
    pub timezone: Tz,
    /// Name of the fixed reference point shown alongside asset distances.
    pub reference_name: String,
    /// Reference point latitude in decimal degrees.
    pub reference_latitude: f64,
    /// Reference point longitude in decimal degrees.
    pub reference_longitude: f64,
    /// Unit used when formatting speed over ground.
    pub speed_unit: SpeedUnit,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
