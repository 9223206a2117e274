//! User configuration persisted at `~/.buoyfinder/config.ini`.
//!
//! Split by concern: pure settings structs in [`settings`], defaults and
//! the refresh clamp in [`defaults`], INI parsing in [`parser`],
//! commented serialization in [`writer`], and file I/O plus errors in
//! [`file`]. A missing file loads as `ConfigFile::default()`; a partial
//! file overlays only the keys it names.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_LOCATION_UPDATE_INTERVAL_SECS,
    DEFAULT_REFRESH_INTERVAL_SECS, MIN_REFRESH_INTERVAL_SECS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, DisplaySettings, FeedSettings, LocationSettings, LoggingSettings,
};
