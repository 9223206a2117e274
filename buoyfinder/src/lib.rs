//! BuoyFinder - Maritime asset tracking over the SPOT satellite feed
//!
//! This library derives live navigation state for GPS-tagged maritime
//! assets (buoys, small vessels) from their SPOT satellite position feed:
//! per-asset freshness, speed over ground, distances and bearings from the
//! observer and a fixed harbor, and compass headings corrected for
//! magnetic declination.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides the assembled
//! backend:
//!
//! ```ignore
//! use buoyfinder::config::ConfigFile;
//! use buoyfinder::service::{NavigationService, NavigationServiceConfig};
//!
//! let config = NavigationServiceConfig::from_config_file(&ConfigFile::load()?);
//! let service = NavigationService::start(config)?;
//!
//! // Watch composed snapshots
//! let mut updates = service.subscribe();
//! while let Ok(update) = updates.recv().await {
//!     println!("{}", update.snapshot.position_display);
//! }
//! ```
//!
//! The layers underneath are usable on their own: [`feed`] fetches and
//! reduces the report history, [`navigator`] composes snapshots from pure
//! inputs, and [`markers`] renders the latest positions as GeoJSON.

pub mod config;
pub mod feed;
pub mod freshness;
pub mod geo;
pub mod heading;
pub mod logging;
pub mod markers;
pub mod navigator;
pub mod sensors;
pub mod service;

/// Version of the BuoyFinder library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
