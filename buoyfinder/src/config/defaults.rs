//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants, the refresh-interval clamp,
//! and the `ConfigFile::default()` implementation.

use super::settings::*;
use crate::feed::client::DEFAULT_BASE_URL;
use crate::navigator::composer::{
    DEFAULT_DISPLAY_TIMEZONE, DEFAULT_REFERENCE_LAT, DEFAULT_REFERENCE_LON, DEFAULT_REFERENCE_NAME,
};

// =============================================================================
// Feed defaults
// =============================================================================

/// Minimum seconds between feed fetches.
/// The SPOT public feed rate-limits aggressive polling, so the refresh
/// interval never drops below five minutes.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 300;

/// Default seconds between feed fetches (the 5-minute floor).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Default timeout in seconds for feed HTTP requests.
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Location defaults
// =============================================================================

/// Default minimum seconds between device position updates.
pub const DEFAULT_LOCATION_UPDATE_INTERVAL_SECS: u64 = 3;

/// Clamps the feed refresh interval to the API floor and logs a warning
/// if clamped.
pub(super) fn clamp_refresh_interval(value: u64) -> u64 {
    if value < MIN_REFRESH_INTERVAL_SECS {
        tracing::warn!(
            requested = value,
            min = MIN_REFRESH_INTERVAL_SECS,
            "refresh_interval below minimum, clamping to {} (SPOT feed rate limit)",
            MIN_REFRESH_INTERVAL_SECS
        );
        MIN_REFRESH_INTERVAL_SECS
    } else {
        value
    }
}

// =============================================================================
// ConfigFile::default()
// =============================================================================

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            feed: FeedSettings {
                feed_id: String::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
                refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
                timeout: DEFAULT_FEED_TIMEOUT_SECS,
            },
            location: LocationSettings {
                update_interval: DEFAULT_LOCATION_UPDATE_INTERVAL_SECS,
            },
            display: DisplaySettings {
                timezone: DEFAULT_DISPLAY_TIMEZONE,
                reference_name: DEFAULT_REFERENCE_NAME.to_string(),
                reference_latitude: DEFAULT_REFERENCE_LAT,
                reference_longitude: DEFAULT_REFERENCE_LON,
                speed_unit: crate::feed::SpeedUnit::KilometersPerHour,
            },
            logging: LoggingSettings {
                file: config_dir.join("buoyfinder.log"),
            },
        }
    }
}
