//! Feed reduction.
//!
//! Pure derivations over the arrival-ordered report history: the distinct
//! asset set, the latest report per asset, newest-first per-asset history,
//! and short-term speed-over-ground from an asset's two most recent
//! reports. All functions here are total; absent or unusable data yields
//! `None`, never an error.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::feed::model::PositionReport;
use crate::geo;

/// Presentation unit for a speed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    /// Kilometers per hour.
    KilometersPerHour,
    /// Nautical knots.
    Knots,
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::KilometersPerHour => write!(f, "km/h"),
            SpeedUnit::Knots => write!(f, "kn"),
        }
    }
}

/// An estimated speed-over-ground.
///
/// The raw value is km/h; presentation converts on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEstimate {
    /// Speed in km/h.
    pub kmh: f64,
}

impl SpeedEstimate {
    /// The speed in the requested unit.
    pub fn value_in(&self, unit: SpeedUnit) -> f64 {
        match unit {
            SpeedUnit::KilometersPerHour => self.kmh,
            SpeedUnit::Knots => geo::kmh_to_knots(self.kmh),
        }
    }

    /// Display string in the requested unit, e.g. `3.2 km/h`.
    pub fn format(&self, unit: SpeedUnit) -> String {
        format!("{:.1} {}", self.value_in(unit), unit)
    }
}

/// All distinct non-empty asset names in the history, lexicographically
/// sorted for stable presentation order.
pub fn distinct_asset_names(reports: &[PositionReport]) -> Vec<String> {
    let mut names: Vec<String> = reports
        .iter()
        .map(|r| r.messenger_name.clone())
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// The latest report for each asset, keyed by full messenger name.
///
/// "Latest" is the maximum parsed timestamp; a report with an unknown
/// timestamp never beats one with a known timestamp. When an asset has
/// no known timestamps at all, its first-encountered report wins.
pub fn latest_report_per_asset(reports: &[PositionReport]) -> HashMap<String, &PositionReport> {
    let mut latest: HashMap<String, &PositionReport> = HashMap::new();
    for report in reports {
        if report.messenger_name.is_empty() {
            continue;
        }
        match latest.get(report.messenger_name.as_str()) {
            // Strictly-greater keeps the first arrival on timestamp ties,
            // and None (unknown) never exceeds Some
            Some(current) if report.timestamp <= current.timestamp => {}
            _ => {
                latest.insert(report.messenger_name.clone(), report);
            }
        }
    }
    latest
}

/// One asset's reports, newest first.
///
/// Unknown timestamps sort as infinitely old (last); ties keep arrival
/// order.
pub fn recent_history<'a>(
    reports: &'a [PositionReport],
    asset_name: &str,
) -> Vec<&'a PositionReport> {
    let mut history: Vec<&PositionReport> = reports
        .iter()
        .filter(|r| r.messenger_name == asset_name)
        .collect();
    // Stable sort keeps arrival order for equal timestamps
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    history
}

/// Estimate speed-over-ground from an asset's two newest reports.
///
/// Returns `None` when either timestamp is unknown, when elapsed time is
/// zero or negative (clock skew, duplicate timestamps), or when either
/// report has out-of-range coordinates. The caller renders `None` as
/// "insufficient data", never zero.
pub fn estimate_speed_over_ground(
    latest: &PositionReport,
    previous: &PositionReport,
) -> Option<SpeedEstimate> {
    let latest_ts = latest.timestamp?;
    let previous_ts = previous.timestamp?;

    let elapsed_ms = (latest_ts - previous_ts).num_milliseconds();
    if elapsed_ms <= 0 {
        return None;
    }

    let from = previous.position()?;
    let to = latest.position()?;

    let distance_km = geo::meters_to_km(geo::distance_meters(&from, &to));
    let elapsed_hours = elapsed_ms as f64 / 3_600_000.0;

    Some(SpeedEstimate {
        kmh: distance_km / elapsed_hours,
    })
}

/// Merge a fetched batch into the report history, deduplicating by
/// `(asset name, timestamp)` with the first arrival winning.
///
/// Reports with unknown timestamps are always kept; their identity
/// cannot be established, so dropping them would lose data. Returns the
/// number of reports actually added.
pub fn merge_reports(history: &mut Vec<PositionReport>, incoming: Vec<PositionReport>) -> usize {
    let mut seen: HashSet<(String, DateTime<Utc>)> = history
        .iter()
        .filter_map(|r| r.timestamp.map(|t| (r.messenger_name.clone(), t)))
        .collect();

    let mut added = 0;
    for report in incoming {
        match report.timestamp {
            Some(t) => {
                let key = (report.messenger_name.clone(), t);
                if seen.insert(key) {
                    history.push(report);
                    added += 1;
                }
            }
            None => {
                history.push(report);
                added += 1;
            }
        }
    }
    added
}
