//! Navigation snapshot composition.
//!
//! [`compose`] is a pure function from the four input slots (report
//! history, selection, device state, raw heading inside the device
//! state) plus a fixed [`ComposerContext`] and an explicit `now` to one
//! [`NavigationSnapshot`]. Identical inputs yield identical snapshots,
//! and composition is total: missing inputs produce fallback fields,
//! never errors.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::feed::model::{short_display_name, PositionReport};
use crate::feed::reducer::{self, SpeedUnit};
use crate::freshness;
use crate::geo::{self, GeoPoint};
use crate::heading::{corrected_heading, CompassPoint, DeclinationModel, WmmDeclination};
use crate::navigator::device::DeviceState;
use crate::navigator::snapshot::{
    NavigationSnapshot, DATE_UNAVAILABLE, NO_MAGNETOMETER, POSITION_UNAVAILABLE, SELECT_ASSET,
    SPEED_CALCULATING, TIME_UNAVAILABLE,
};

/// Default reference point name.
pub const DEFAULT_REFERENCE_NAME: &str = "Tema Harbour";

/// Default reference point latitude.
pub const DEFAULT_REFERENCE_LAT: f64 = 5.63438;

/// Default reference point longitude.
pub const DEFAULT_REFERENCE_LON: f64 = 0.01674;

/// Default display timezone for report dates and times.
pub const DEFAULT_DISPLAY_TIMEZONE: Tz = chrono_tz::Africa::Accra;

/// A fixed, named shore point distances are measured from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    /// Human-readable name, e.g. `Tema Harbour`.
    pub name: String,
    /// The point's position.
    pub position: GeoPoint,
}

impl ReferencePoint {
    /// The default reference: Tema Harbour on the Ghanaian coast.
    pub fn tema_harbour() -> Self {
        Self {
            name: DEFAULT_REFERENCE_NAME.to_string(),
            position: GeoPoint {
                latitude: DEFAULT_REFERENCE_LAT,
                longitude: DEFAULT_REFERENCE_LON,
            },
        }
    }
}

/// Fixed composition inputs that do not change per update.
#[derive(Clone)]
pub struct ComposerContext {
    /// Magnetic declination source for heading correction.
    pub declination: Arc<dyn DeclinationModel>,
    /// Reference point for shore-relative distance and bearing.
    pub reference: ReferencePoint,
    /// Timezone report dates and times are rendered in.
    pub timezone: Tz,
    /// Unit speed-over-ground is rendered in.
    pub speed_unit: SpeedUnit,
}

impl Default for ComposerContext {
    fn default() -> Self {
        Self {
            declination: Arc::new(WmmDeclination),
            reference: ReferencePoint::tema_harbour(),
            timezone: DEFAULT_DISPLAY_TIMEZONE,
            speed_unit: SpeedUnit::KilometersPerHour,
        }
    }
}

impl fmt::Debug for ComposerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerContext")
            .field("reference", &self.reference)
            .field("timezone", &self.timezone)
            .field("speed_unit", &self.speed_unit)
            .finish_non_exhaustive()
    }
}

/// Compose a navigation snapshot from the current inputs.
///
/// Selection resolution: an explicit selection is kept verbatim, even
/// when the named asset has vanished from the feed (its fields fall back
/// until it reports again); with no explicit selection the
/// lexicographically first asset is used.
pub fn compose(
    reports: &[PositionReport],
    selected: Option<&str>,
    device: &DeviceState,
    context: &ComposerContext,
    now: DateTime<Utc>,
) -> NavigationSnapshot {
    let asset_names = reducer::distinct_asset_names(reports);

    let selected_asset = match selected {
        Some(name) => Some(name.to_string()),
        None => asset_names.first().cloned(),
    };

    let history = selected_asset
        .as_deref()
        .map(|name| reducer::recent_history(reports, name))
        .unwrap_or_default();
    let latest = history.first().copied();

    let display_name = selected_asset
        .as_deref()
        .map(|name| short_display_name(name).to_string())
        .unwrap_or_else(|| SELECT_ASSET.to_string());

    let asset_position = latest.and_then(|r| r.position());
    let position_display = asset_position
        .map(|p| p.to_string())
        .unwrap_or_else(|| POSITION_UNAVAILABLE.to_string());

    let date_display = latest
        .map(|r| r.formatted_date(context.timezone))
        .unwrap_or_else(|| DATE_UNAVAILABLE.to_string());
    let time_display = latest
        .map(|r| r.formatted_time(context.timezone))
        .unwrap_or_else(|| TIME_UNAVAILABLE.to_string());

    let age_minutes = latest.and_then(|r| r.age_minutes(now));
    let freshness = freshness::classify(age_minutes);

    let speed = match (history.first(), history.get(1)) {
        (Some(latest), Some(previous)) => reducer::estimate_speed_over_ground(latest, previous),
        _ => None,
    };
    let speed_display = speed
        .map(|s| s.format(context.speed_unit))
        .unwrap_or_else(|| SPEED_CALCULATING.to_string());

    let reference_distance_km = asset_position
        .map(|p| geo::meters_to_km(geo::distance_meters(&context.reference.position, &p)));
    let reference_bearing_degrees =
        asset_position.map(|p| geo::initial_bearing_degrees(&context.reference.position, &p));

    let device_position = device.position();
    let device_distance_km = device_position
        .zip(asset_position)
        .map(|(d, a)| geo::meters_to_km(geo::distance_meters(&d, &a)));
    let device_bearing_degrees = device_position
        .zip(asset_position)
        .map(|(d, a)| geo::initial_bearing_degrees(&d, &a));

    // Position unknown: the raw azimuth passes through uncorrected
    let heading_degrees = device.raw_heading.map(|raw| match device_position {
        Some(position) => {
            let altitude = device.fix.map(|f| f.altitude_m).unwrap_or(0.0);
            let declination = context
                .declination
                .declination_degrees(&position, altitude, now);
            corrected_heading(raw, declination)
        }
        None => raw,
    });
    let heading_label = heading_degrees
        .map(|h| CompassPoint::from_degrees(h).label().to_string())
        .unwrap_or_else(|| NO_MAGNETOMETER.to_string());

    NavigationSnapshot {
        asset_names,
        selected_asset,
        display_name,
        asset_position,
        position_display,
        date_display,
        time_display,
        age_minutes,
        freshness,
        speed,
        speed_display,
        reference_name: context.reference.name.clone(),
        reference_distance_km,
        reference_bearing_degrees,
        device_distance_km,
        device_bearing_degrees,
        course_over_ground: device.course_over_ground,
        heading_degrees,
        heading_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::model::RawMessage;
    use crate::freshness::FreshnessTier;
    use crate::heading::FixedDeclination;
    use crate::navigator::device::DeviceFix;
    use chrono::TimeZone;

    fn report(name: &str, date_time: &str, lat: f64, lon: f64) -> PositionReport {
        PositionReport::from_raw(RawMessage {
            messenger_name: name.to_string(),
            date_time: date_time.to_string(),
            latitude: lat,
            longitude: lon,
            ..Default::default()
        })
    }

    fn test_context(declination: f64) -> ComposerContext {
        ComposerContext {
            declination: Arc::new(FixedDeclination(declination)),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 12, 10, 30, 0).unwrap()
    }

    fn sample_reports() -> Vec<PositionReport> {
        vec![
            report("BUOY_B2", "2025-12-12T10:00:00+0000", 5.4, 0.1),
            report("BUOY_A1", "2025-12-12T10:05:00+0000", 5.0, 0.0),
            report("BUOY_A1", "2025-12-12T10:25:00+0000", 5.01, 0.0),
        ]
    }

    #[test]
    fn test_defaults_to_first_asset() {
        let snapshot = compose(
            &sample_reports(),
            None,
            &DeviceState::default(),
            &test_context(0.0),
            now(),
        );

        assert_eq!(snapshot.asset_names, vec!["BUOY_A1", "BUOY_B2"]);
        assert_eq!(snapshot.selected_asset.as_deref(), Some("BUOY_A1"));
        assert_eq!(snapshot.display_name, "A1");
        assert_eq!(snapshot.asset_position.unwrap().latitude, 5.01);
        assert_eq!(snapshot.age_minutes, Some(5));
        assert_eq!(snapshot.freshness, FreshnessTier::Fresh);
    }

    #[test]
    fn test_selection_switch_without_new_data() {
        let reports = sample_reports();
        let context = test_context(0.0);
        let device = DeviceState::default();

        let snapshot = compose(&reports, Some("BUOY_B2"), &device, &context, now());
        assert_eq!(snapshot.selected_asset.as_deref(), Some("BUOY_B2"));
        assert_eq!(snapshot.display_name, "B2");
        assert_eq!(snapshot.asset_position.unwrap().latitude, 5.4);
        assert_eq!(snapshot.age_minutes, Some(30));
        assert_eq!(snapshot.freshness, FreshnessTier::Aging);
    }

    #[test]
    fn test_disappeared_selection_keeps_name_with_fallbacks() {
        let snapshot = compose(
            &sample_reports(),
            Some("BUOY_Z9"),
            &DeviceState::default(),
            &test_context(0.0),
            now(),
        );

        assert_eq!(snapshot.selected_asset.as_deref(), Some("BUOY_Z9"));
        assert_eq!(snapshot.display_name, "Z9");
        assert_eq!(snapshot.position_display, POSITION_UNAVAILABLE);
        assert_eq!(snapshot.date_display, DATE_UNAVAILABLE);
        assert_eq!(snapshot.freshness, FreshnessTier::Stale);
        assert_eq!(snapshot.speed_display, SPEED_CALCULATING);
    }

    #[test]
    fn test_empty_history_produces_fallback_snapshot() {
        let snapshot = compose(
            &[],
            None,
            &DeviceState::default(),
            &test_context(0.0),
            now(),
        );
        assert_eq!(snapshot, NavigationSnapshot::default());
    }

    #[test]
    fn test_location_before_feed_keeps_asset_fallbacks() {
        let mut device = DeviceState::default();
        device.apply_fix(DeviceFix {
            latitude: 5.6,
            longitude: 0.0,
            altitude_m: 5.0,
            speed_mps: 1.0,
            bearing_degrees: Some(180.0),
            timestamp: now(),
        });

        let snapshot = compose(&[], None, &device, &test_context(0.0), now());
        assert_eq!(snapshot.display_name, SELECT_ASSET);
        assert_eq!(snapshot.device_distance_km, None);
        assert_eq!(snapshot.device_bearing_degrees, None);
        assert_eq!(snapshot.course_over_ground, Some(180.0));
    }

    #[test]
    fn test_device_distance_and_bearing() {
        let mut device = DeviceState::default();
        device.apply_fix(DeviceFix {
            // Due south of BUOY_A1's latest position
            latitude: 4.91,
            longitude: 0.0,
            altitude_m: 0.0,
            speed_mps: 0.0,
            bearing_degrees: None,
            timestamp: now(),
        });

        let snapshot = compose(
            &sample_reports(),
            None,
            &device,
            &test_context(0.0),
            now(),
        );

        let distance = snapshot.device_distance_km.unwrap();
        assert!((distance - 11.1).abs() < 0.2, "Expected ~11.1 km, got {}", distance);
        let bearing = snapshot.device_bearing_degrees.unwrap();
        assert!(bearing < 1.0 || bearing > 359.0, "Expected ~0 deg, got {}", bearing);
    }

    #[test]
    fn test_reference_distance_present_without_device() {
        let snapshot = compose(
            &sample_reports(),
            None,
            &DeviceState::default(),
            &test_context(0.0),
            now(),
        );

        assert_eq!(snapshot.reference_name, "Tema Harbour");
        assert!(snapshot.reference_distance_km.unwrap() > 0.0);
        assert!(snapshot.reference_bearing_degrees.is_some());
    }

    #[test]
    fn test_heading_passthrough_without_position() {
        let mut device = DeviceState::default();
        device.apply_heading(90.0);

        // Declination would shift the heading if it were applied
        let snapshot = compose(&[], None, &device, &test_context(15.0), now());
        assert_eq!(snapshot.heading_degrees, Some(90.0));
        assert_eq!(snapshot.heading_label, "E");
    }

    #[test]
    fn test_heading_corrected_with_position() {
        let mut device = DeviceState::default();
        device.apply_heading(10.0);
        device.apply_fix(DeviceFix {
            latitude: 5.6,
            longitude: 0.0,
            altitude_m: 0.0,
            speed_mps: 0.0,
            bearing_degrees: None,
            timestamp: now(),
        });

        let snapshot = compose(&[], None, &device, &test_context(-2.0), now());
        assert_eq!(snapshot.heading_degrees, Some(8.0));
        assert_eq!(snapshot.heading_label, "N");
    }

    #[test]
    fn test_speed_from_two_newest_reports() {
        let snapshot = compose(
            &sample_reports(),
            None,
            &DeviceState::default(),
            &test_context(0.0),
            now(),
        );

        // BUOY_A1 moved ~1.11 km in 20 minutes
        let speed = snapshot.speed.unwrap();
        assert!((speed.kmh - 3.34).abs() < 0.05, "Got {}", speed.kmh);
        assert_eq!(snapshot.speed_display, format!("{:.1} km/h", speed.kmh));
    }

    #[test]
    fn test_speed_in_knots_context() {
        let context = ComposerContext {
            speed_unit: SpeedUnit::Knots,
            ..test_context(0.0)
        };
        let snapshot = compose(
            &sample_reports(),
            None,
            &DeviceState::default(),
            &context,
            now(),
        );
        assert!(snapshot.speed_display.ends_with(" kn"));
    }

    #[test]
    fn test_composition_is_idempotent() {
        let reports = sample_reports();
        let context = test_context(-1.5);
        let mut device = DeviceState::default();
        device.apply_heading(42.0);

        let first = compose(&reports, Some("BUOY_A1"), &device, &context, now());
        let second = compose(&reports, Some("BUOY_A1"), &device, &context, now());
        assert_eq!(first, second);
    }
}
