//! Observer device state.
//!
//! Tracks the last known device fix, raw compass azimuth, and
//! course-over-ground. Each slot has a single producer; absent slots stay
//! `None` until their source delivers.

use chrono::{DateTime, Utc};

use crate::geo::GeoPoint;

/// Fix speed above which the fix bearing is trusted as course-over-ground.
///
/// Below this the bearing jitters randomly, so the previous course is kept
/// rather than forced to zero while stationary.
pub const MIN_COURSE_SPEED_MPS: f64 = 0.5;

/// One device location fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceFix {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Altitude above sea level in meters.
    pub altitude_m: f64,
    /// Instantaneous ground speed in meters per second.
    pub speed_mps: f64,
    /// Direction of travel in degrees, when the fix carries one.
    pub bearing_degrees: Option<f64>,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

impl DeviceFix {
    /// The fix position, when its coordinates are in valid range.
    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude).ok()
    }
}

/// Last known device inputs, one slot per producer.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    /// Most recent location fix.
    pub fix: Option<DeviceFix>,
    /// Most recent raw magnetometer azimuth in degrees.
    ///
    /// Stays `None` forever on devices without the sensor.
    pub raw_heading: Option<f64>,
    /// Last course-over-ground accepted through the movement gate.
    pub course_over_ground: Option<f64>,
}

impl DeviceState {
    /// Apply a new location fix.
    ///
    /// The fix bearing replaces the course-over-ground only while the
    /// device is actually moving (speed above [`MIN_COURSE_SPEED_MPS`]).
    pub fn apply_fix(&mut self, fix: DeviceFix) {
        if fix.speed_mps > MIN_COURSE_SPEED_MPS {
            if let Some(bearing) = fix.bearing_degrees {
                self.course_over_ground = Some(bearing);
            }
        }
        self.fix = Some(fix);
    }

    /// Apply a new raw compass azimuth.
    pub fn apply_heading(&mut self, azimuth_degrees: f64) {
        self.raw_heading = Some(azimuth_degrees);
    }

    /// The device position from the last fix, when known and valid.
    pub fn position(&self) -> Option<GeoPoint> {
        self.fix.as_ref().and_then(DeviceFix::position)
    }
}
