//! Magnetic heading correction and compass presentation.
//!
//! Raw magnetometer azimuths reference magnetic north; navigation works
//! in true north. The [`DeclinationModel`] trait supplies the local
//! magnetic declination, with [`WmmDeclination`] backed by the NOAA
//! World Magnetic Model. Correction and compass-point bucketing are
//! pure functions.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use world_magnetic_model::time::{Date, Month};
use world_magnetic_model::uom::si::angle::degree;
use world_magnetic_model::uom::si::f32::{Angle, Length};
use world_magnetic_model::uom::si::length::meter;
use world_magnetic_model::GeomagneticField;

use crate::geo::{normalize_degrees, GeoPoint};

/// Source of magnetic declination at a position and time.
///
/// Implementations must be total: when the declination cannot be
/// computed they return `0.0`, which turns the correction into a
/// passthrough of the raw azimuth.
pub trait DeclinationModel: Send + Sync {
    /// Declination in degrees east of true north.
    fn declination_degrees(&self, position: &GeoPoint, altitude_m: f64, at: DateTime<Utc>) -> f64;
}

/// Declination from the NOAA World Magnetic Model.
///
/// Dates outside the model's validity window (or any other model
/// failure) degrade to a declination of `0.0` rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct WmmDeclination;

impl WmmDeclination {
    fn model_date(at: DateTime<Utc>) -> Option<Date> {
        let month = Month::try_from(at.month() as u8).ok()?;
        Date::from_calendar_date(at.year(), month, at.day() as u8).ok()
    }
}

impl DeclinationModel for WmmDeclination {
    fn declination_degrees(&self, position: &GeoPoint, altitude_m: f64, at: DateTime<Utc>) -> f64 {
        let Some(date) = Self::model_date(at) else {
            return 0.0;
        };

        let height = Length::new::<meter>(altitude_m as f32);
        let latitude = Angle::new::<degree>(position.latitude as f32);
        let longitude = Angle::new::<degree>(position.longitude as f32);

        match GeomagneticField::new(height, latitude, longitude, date) {
            Ok(field) => f64::from(field.declination().get::<degree>()),
            Err(error) => {
                tracing::debug!(%error, "Declination unavailable, using 0.0");
                0.0
            }
        }
    }
}

/// Fixed declination, for tests and for running without a magnetic model.
#[derive(Debug, Clone, Copy)]
pub struct FixedDeclination(pub f64);

impl DeclinationModel for FixedDeclination {
    fn declination_degrees(&self, _position: &GeoPoint, _altitude_m: f64, _at: DateTime<Utc>) -> f64 {
        self.0
    }
}

/// Correct a raw magnetic azimuth to true north.
///
/// Adds the declination and normalizes into `[0, 360)`. With a
/// declination of `0.0` this is a passthrough of the raw value.
pub fn corrected_heading(raw_degrees: f64, declination_degrees: f64) -> f64 {
    normalize_degrees(raw_degrees + declination_degrees)
}

/// The eight compass points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl CompassPoint {
    /// Bucket a heading into its nearest compass point.
    ///
    /// Total over all finite inputs; headings just below 360 wrap back
    /// to north, and negative inputs bucket without underflow.
    pub fn from_degrees(degrees: f64) -> Self {
        let index = (((degrees / 45.0).round() as i64 % 8) + 8) % 8;
        match index {
            0 => CompassPoint::North,
            1 => CompassPoint::Northeast,
            2 => CompassPoint::East,
            3 => CompassPoint::Southeast,
            4 => CompassPoint::South,
            5 => CompassPoint::Southwest,
            6 => CompassPoint::West,
            _ => CompassPoint::Northwest,
        }
    }

    /// Short display label, e.g. `NE`.
    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::North => "N",
            CompassPoint::Northeast => "NE",
            CompassPoint::East => "E",
            CompassPoint::Southeast => "SE",
            CompassPoint::South => "S",
            CompassPoint::Southwest => "SW",
            CompassPoint::West => "W",
            CompassPoint::Northwest => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    mod correction {
        use super::*;

        #[test]
        fn test_adds_declination() {
            assert_eq!(corrected_heading(100.0, 10.0), 110.0);
        }

        #[test]
        fn test_wraps_past_north() {
            assert_eq!(corrected_heading(350.0, 20.0), 10.0);
        }

        #[test]
        fn test_negative_declination_wraps_below_zero() {
            assert_eq!(corrected_heading(10.0, -20.0), 350.0);
        }

        #[test]
        fn test_zero_declination_is_passthrough() {
            assert_eq!(corrected_heading(123.4, 0.0), 123.4);
        }

        #[test]
        fn test_result_in_range() {
            for raw in [0.0, 90.0, 359.9, 720.0, -720.0] {
                for decl in [-30.0, 0.0, 30.0] {
                    let corrected = corrected_heading(raw, decl);
                    assert!(
                        (0.0..360.0).contains(&corrected),
                        "corrected_heading({}, {}) = {}",
                        raw,
                        decl,
                        corrected
                    );
                }
            }
        }
    }

    mod compass {
        use super::*;

        #[test]
        fn test_cardinal_points() {
            assert_eq!(CompassPoint::from_degrees(0.0), CompassPoint::North);
            assert_eq!(CompassPoint::from_degrees(90.0), CompassPoint::East);
            assert_eq!(CompassPoint::from_degrees(180.0), CompassPoint::South);
            assert_eq!(CompassPoint::from_degrees(270.0), CompassPoint::West);
        }

        #[test]
        fn test_intercardinal_points() {
            assert_eq!(CompassPoint::from_degrees(45.0), CompassPoint::Northeast);
            assert_eq!(CompassPoint::from_degrees(135.0), CompassPoint::Southeast);
            assert_eq!(CompassPoint::from_degrees(225.0), CompassPoint::Southwest);
            assert_eq!(CompassPoint::from_degrees(315.0), CompassPoint::Northwest);
        }

        #[test]
        fn test_rounding_boundaries() {
            assert_eq!(CompassPoint::from_degrees(22.4), CompassPoint::North);
            assert_eq!(CompassPoint::from_degrees(22.5), CompassPoint::Northeast);
            assert_eq!(CompassPoint::from_degrees(337.5), CompassPoint::North);
        }

        #[test]
        fn test_high_heading_wraps_to_north() {
            assert_eq!(CompassPoint::from_degrees(350.0), CompassPoint::North);
            assert_eq!(CompassPoint::from_degrees(359.9), CompassPoint::North);
            assert_eq!(CompassPoint::from_degrees(360.0), CompassPoint::North);
        }

        #[test]
        fn test_negative_heading_does_not_underflow() {
            assert_eq!(CompassPoint::from_degrees(-10.0), CompassPoint::North);
            assert_eq!(CompassPoint::from_degrees(-90.0), CompassPoint::West);
        }

        #[test]
        fn test_labels() {
            assert_eq!(CompassPoint::North.label(), "N");
            assert_eq!(CompassPoint::Southwest.label(), "SW");
            assert_eq!(CompassPoint::Northwest.to_string(), "NW");
        }
    }

    mod declination {
        use super::*;

        #[test]
        fn test_fixed_model_returns_constant() {
            let model = FixedDeclination(-2.5);
            let point = GeoPoint::new(5.6, 0.0).unwrap();
            let at = Utc.with_ymd_and_hms(2025, 12, 12, 12, 0, 0).unwrap();
            assert_eq!(model.declination_degrees(&point, 0.0, at), -2.5);
        }

        #[test]
        fn test_wmm_degrades_to_zero_outside_validity() {
            let model = WmmDeclination;
            let point = GeoPoint::new(5.6, 0.0).unwrap();
            let ancient = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
            assert_eq!(model.declination_degrees(&point, 0.0, ancient), 0.0);
        }

        #[test]
        fn test_wmm_result_is_finite() {
            let model = WmmDeclination;
            let point = GeoPoint::new(5.63438, 0.01674).unwrap();
            let at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
            let declination = model.declination_degrees(&point, 0.0, at);
            assert!(declination.is_finite());
            assert!(declination.abs() < 90.0);
        }
    }
}
