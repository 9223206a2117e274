//! Navigation snapshot and feed lifecycle status.
//!
//! The snapshot is the composer's single immutable output: every derived
//! field the presentation layer needs, each with a defined fallback so
//! assembly never fails. [`FeedStatus`] tags the feed fetch lifecycle
//! independently of snapshot staleness.

use std::fmt;

use crate::feed::reducer::SpeedEstimate;
use crate::freshness::FreshnessTier;
use crate::geo::GeoPoint;

/// Display fallback when no asset is selected.
pub const SELECT_ASSET: &str = "Select Asset";

/// Display fallback when the selected asset has no usable position.
pub const POSITION_UNAVAILABLE: &str = "Position not available";

pub use crate::feed::model::{DATE_UNAVAILABLE, TIME_UNAVAILABLE};

/// Display fallback while speed-over-ground is undefined.
pub const SPEED_CALCULATING: &str = "Calculating...";

/// Display fallback when no compass azimuth was ever received.
pub const NO_MAGNETOMETER: &str = "No Magnetometer";

/// Feed fetch lifecycle, independent of snapshot contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// A fetch is in flight and no result has arrived yet.
    Loading,
    /// The last fetch completed successfully.
    Success,
    /// The last fetch failed; the snapshot keeps serving prior data.
    Error(String),
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedStatus::Loading => write!(f, "loading"),
            FeedStatus::Success => write!(f, "ok"),
            FeedStatus::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Immutable derived navigation state.
///
/// Recomputed in full on every input change and replaced atomically;
/// consumers never see a partially updated snapshot. Optional fields are
/// `None` when underived, with the paired `*_display` string already
/// holding the fallback text.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSnapshot {
    /// All known asset names, lexicographically sorted.
    pub asset_names: Vec<String>,
    /// Resolved selection (full messenger name).
    pub selected_asset: Option<String>,
    /// Short display name of the selection, or [`SELECT_ASSET`].
    pub display_name: String,
    /// Selected asset's last reported position.
    pub asset_position: Option<GeoPoint>,
    /// Formatted asset position, or [`POSITION_UNAVAILABLE`].
    pub position_display: String,
    /// Formatted report date in the display timezone.
    pub date_display: String,
    /// Formatted report time in the display timezone.
    pub time_display: String,
    /// Whole minutes since the asset's last report.
    pub age_minutes: Option<i64>,
    /// Freshness tier of the last report.
    pub freshness: FreshnessTier,
    /// Estimated speed-over-ground of the asset.
    pub speed: Option<SpeedEstimate>,
    /// Formatted speed, or [`SPEED_CALCULATING`].
    pub speed_display: String,
    /// Name of the fixed reference point.
    pub reference_name: String,
    /// Distance from the reference point to the asset in km.
    pub reference_distance_km: Option<f64>,
    /// Bearing from the reference point to the asset in degrees true.
    pub reference_bearing_degrees: Option<f64>,
    /// Distance from the device to the asset in km.
    pub device_distance_km: Option<f64>,
    /// Bearing from the device to the asset in degrees true.
    pub device_bearing_degrees: Option<f64>,
    /// Device course-over-ground in degrees, gated on movement.
    pub course_over_ground: Option<f64>,
    /// Device heading in degrees true (raw azimuth when position unknown).
    pub heading_degrees: Option<f64>,
    /// Compass label for the heading, or [`NO_MAGNETOMETER`].
    pub heading_label: String,
}

impl Default for NavigationSnapshot {
    fn default() -> Self {
        Self {
            asset_names: Vec::new(),
            selected_asset: None,
            display_name: SELECT_ASSET.to_string(),
            asset_position: None,
            position_display: POSITION_UNAVAILABLE.to_string(),
            date_display: DATE_UNAVAILABLE.to_string(),
            time_display: TIME_UNAVAILABLE.to_string(),
            age_minutes: None,
            freshness: FreshnessTier::Stale,
            speed: None,
            speed_display: SPEED_CALCULATING.to_string(),
            reference_name: String::new(),
            reference_distance_km: None,
            reference_bearing_degrees: None,
            device_distance_km: None,
            device_bearing_degrees: None,
            course_over_ground: None,
            heading_degrees: None,
            heading_label: NO_MAGNETOMETER.to_string(),
        }
    }
}

/// One broadcast unit: the feed lifecycle tag plus the current snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationUpdate {
    /// Feed fetch lifecycle.
    pub status: FeedStatus,
    /// Current derived state.
    pub snapshot: NavigationSnapshot,
}
