//! GeoJSON marker features.
//!
//! Builds one Point feature per known asset from its latest report, with
//! the display properties a map layer needs for popups and styling. The
//! feature `color` property is the asset's own freshness color, so each
//! marker reflects how recently that asset reported.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::feed::model::PositionReport;
use crate::feed::reducer;
use crate::freshness;

/// GeoJSON Point geometry with `[longitude, latitude]` coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    kind: &'static str,
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point",
            coordinates: [longitude, latitude],
        }
    }
}

/// Display properties attached to a marker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerProperties {
    /// Short asset display name.
    pub name: String,
    /// Formatted report date.
    pub date: String,
    /// Formatted report time.
    pub time: String,
    /// Formatted report position.
    pub position: String,
    /// Freshness color as a hex literal.
    pub color: String,
    /// Whole minutes since the report; `null` when unknown.
    pub age_minutes: Option<i64>,
}

/// One GeoJSON Feature.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerFeature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub geometry: PointGeometry,
    pub properties: MarkerProperties,
}

/// A GeoJSON FeatureCollection of asset markers.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<MarkerFeature>,
}

/// Build the marker collection from the latest report of every asset.
///
/// Features are sorted by asset name for stable output. Reports with
/// out-of-range coordinates cannot be placed and are skipped.
pub fn latest_markers(reports: &[PositionReport], tz: Tz, now: DateTime<Utc>) -> FeatureCollection {
    let mut latest: Vec<&PositionReport> = reducer::latest_report_per_asset(reports)
        .into_values()
        .collect();
    latest.sort_by(|a, b| a.messenger_name.cmp(&b.messenger_name));

    let features = latest
        .into_iter()
        .filter_map(|report| marker_for(report, tz, now))
        .collect();

    FeatureCollection {
        kind: "FeatureCollection",
        features,
    }
}

fn marker_for(report: &PositionReport, tz: Tz, now: DateTime<Utc>) -> Option<MarkerFeature> {
    let position = match report.position() {
        Some(p) => p,
        None => {
            tracing::debug!(
                asset = %report.messenger_name,
                latitude = report.latitude,
                longitude = report.longitude,
                "Skipping marker with out-of-range coordinates"
            );
            return None;
        }
    };

    let age_minutes = report.age_minutes(now);
    let tier = freshness::classify(age_minutes);

    Some(MarkerFeature {
        kind: "Feature",
        geometry: PointGeometry::new(position.longitude, position.latitude),
        properties: MarkerProperties {
            name: report.display_name().to_string(),
            date: report.formatted_date(tz),
            time: report.formatted_time(tz),
            position: position.to_string(),
            color: tier.color().to_string(),
            age_minutes,
        },
    })
}
