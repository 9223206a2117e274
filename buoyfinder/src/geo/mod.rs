//! Geodesy primitives
//!
//! Great-circle distance and initial bearing between geographic points,
//! plus the angle normalization and unit conversions the navigation
//! math builds on. All angles are signed decimal degrees on input and
//! bearings are normalized to `[0, 360)` on output.

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

/// Mean Earth radius in meters (spherical model).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Conversion factor from km/h to knots.
pub const KMH_TO_KNOTS: f64 = 0.539957;

/// Errors for invalid geographic input.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90].
    #[error("Invalid latitude: {0} (must be -90.0 to 90.0)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("Invalid longitude: {0} (must be -180.0 to 180.0)")]
    InvalidLongitude(f64),
}

/// A point on the Earth's surface in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, validating coordinate ranges.
    ///
    /// # Arguments
    ///
    /// * `latitude` - Latitude in degrees (-90.0 to 90.0)
    /// * `longitude` - Longitude in degrees (-180.0 to 180.0)
    ///
    /// # Returns
    ///
    /// A `Result` containing the point or an error if a coordinate is
    /// out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two points in meters (haversine).
///
/// Symmetric, zero for identical points, and satisfies the triangle
/// inequality within floating-point tolerance.
#[inline]
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing from `from` toward `to` in degrees clockwise from
/// true north, normalized to `[0, 360)`.
///
/// For identical points the bearing is 0.0 by convention.
#[inline]
pub fn initial_bearing_degrees(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_degrees(y.atan2(x) * 180.0 / PI)
}

/// Normalize an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Convert meters to kilometers.
#[inline]
pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

/// Convert a speed in km/h to knots.
#[inline]
pub fn kmh_to_knots(kmh: f64) -> f64 {
    kmh * KMH_TO_KNOTS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).expect("test point should be valid")
    }

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(5.63438, 0.01674).is_ok());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(GeoError::InvalidLatitude(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.1),
            Err(GeoError::InvalidLongitude(-180.1))
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_point_display_five_decimals() {
        let p = point(5.63438, 0.01674);
        assert_eq!(p.to_string(), "5.63438, 0.01674");
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = point(5.55, -0.2);
        assert_eq!(distance_meters(&p, &p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let tema = point(5.63438, 0.01674);
        let buoy = point(5.2, -0.5);
        let there = distance_meters(&tema, &buoy);
        let back = distance_meters(&buoy, &tema);
        assert!(
            (there - back).abs() < 1e-9,
            "Distance not symmetric: {} vs {}",
            there,
            back
        );
    }

    #[test]
    fn test_distance_one_degree_longitude_at_equator() {
        // One degree of longitude at the equator is ~111.19 km
        let a = point(0.0, 0.0);
        let b = point(0.0, 1.0);
        let d = distance_meters(&a, &b);
        assert!(
            (d - 111_195.0).abs() < 100.0,
            "Expected ~111195 m, got {}",
            d
        );
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = point(5.0, 0.0);

        let north = initial_bearing_degrees(&origin, &point(6.0, 0.0));
        assert!(north.abs() < 0.1, "Expected ~0 (north), got {}", north);

        let east = initial_bearing_degrees(&origin, &point(5.0, 1.0));
        assert!((east - 90.0).abs() < 0.5, "Expected ~90 (east), got {}", east);

        let south = initial_bearing_degrees(&origin, &point(4.0, 0.0));
        assert!(
            (south - 180.0).abs() < 0.1,
            "Expected ~180 (south), got {}",
            south
        );

        let west = initial_bearing_degrees(&origin, &point(5.0, -1.0));
        assert!(
            (west - 270.0).abs() < 0.5,
            "Expected ~270 (west), got {}",
            west
        );
    }

    #[test]
    fn test_bearing_same_point_convention() {
        let p = point(5.5, -0.3);
        assert_eq!(initial_bearing_degrees(&p, &p), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-370.0), 350.0);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(meters_to_km(1500.0), 1.5);
        let knots = kmh_to_knots(10.0);
        assert!((knots - 5.39957).abs() < 1e-9, "Expected 5.39957, got {}", knots);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_symmetric_and_nonnegative(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = GeoPoint::new(lat1, lon1).unwrap();
                let b = GeoPoint::new(lat2, lon2).unwrap();
                let ab = distance_meters(&a, &b);
                let ba = distance_meters(&b, &a);

                prop_assert!(ab >= 0.0, "Negative distance: {}", ab);
                prop_assert!(
                    (ab - ba).abs() < 1e-6,
                    "Asymmetric distance: {} vs {}",
                    ab, ba
                );
            }

            #[test]
            fn test_bearing_in_range(
                lat1 in -89.0..89.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -89.0..89.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = GeoPoint::new(lat1, lon1).unwrap();
                let b = GeoPoint::new(lat2, lon2).unwrap();
                let bearing = initial_bearing_degrees(&a, &b);

                prop_assert!(
                    (0.0..360.0).contains(&bearing),
                    "Bearing out of range: {}",
                    bearing
                );
            }

            #[test]
            fn test_triangle_inequality(
                lat1 in -80.0..80.0_f64,
                lon1 in -170.0..170.0_f64,
                lat2 in -80.0..80.0_f64,
                lon2 in -170.0..170.0_f64,
                lat3 in -80.0..80.0_f64,
                lon3 in -170.0..170.0_f64
            ) {
                let a = GeoPoint::new(lat1, lon1).unwrap();
                let b = GeoPoint::new(lat2, lon2).unwrap();
                let c = GeoPoint::new(lat3, lon3).unwrap();

                let direct = distance_meters(&a, &c);
                let via = distance_meters(&a, &b) + distance_meters(&b, &c);

                // Allow a small absolute slack for floating-point error
                prop_assert!(
                    direct <= via + 1e-3,
                    "Triangle inequality violated: {} > {}",
                    direct, via
                );
            }

            #[test]
            fn test_normalize_in_range(degrees in -100_000.0..100_000.0_f64) {
                let n = normalize_degrees(degrees);
                prop_assert!((0.0..360.0).contains(&n), "Out of range: {}", n);
            }
        }
    }
}
