//! Satellite feed ingestion and reduction.
//!
//! Everything between the SPOT public feed API and the navigation state:
//! wire DTOs and the [`PositionReport`] domain type (`model`), the
//! paginating HTTP client behind the [`FeedClient`] trait (`client`),
//! and the pure derivations over report history (`reducer`).
//!
//! The fetch boundary converts raw messages into immutable reports
//! exactly once; downstream code never sees wire types.

pub mod client;
pub mod model;
pub mod reducer;

pub use client::{fetch_all_reports, FeedClient, FeedPage, SpotFeedClient};
pub use model::{parse_feed_timestamp, short_display_name, PositionReport, FEED_TIMESTAMP_FORMAT};
pub use reducer::{
    distinct_asset_names, estimate_speed_over_ground, latest_report_per_asset, merge_reports,
    recent_history, SpeedEstimate, SpeedUnit,
};

use thiserror::Error;

/// Errors that can occur while fetching or decoding the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport-level failure (connection, timeout, HTTP status).
    #[error("Feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid feed JSON.
    #[error("Failed to decode feed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API reported an error, e.g. `E-0195` for an empty feed.
    #[error("Feed API error {code}: {text}")]
    Api {
        code: String,
        text: String,
        description: String,
    },

    /// The response carried neither messages nor an error.
    #[error("Feed response contained no message page")]
    MissingPage,
}
