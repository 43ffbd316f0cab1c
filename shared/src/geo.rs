//! Geographic positions and great-circle distance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Mean Earth radius used for all distance calculations (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude fix, optionally with accuracy, altitude and
/// the time it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Degrees, positive north
    pub latitude: f64,
    /// Degrees, positive east
    pub longitude: f64,
    /// Horizontal accuracy radius (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Altitude above sea level (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            altitude: None,
            timestamp: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn observed_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build a request origin from caller-supplied values.
    ///
    /// Missing, NaN or infinite components are rejected, as are values
    /// outside the valid degree ranges. Zero is a real coordinate (the
    /// equator, the prime meridian) and is accepted.
    pub fn from_raw(latitude: Option<f64>, longitude: Option<f64>) -> CoreResult<Self> {
        let latitude = latitude.ok_or_else(|| CoreError::invalid("latitude is required"))?;
        let longitude = longitude.ok_or_else(|| CoreError::invalid("longitude is required"))?;

        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    /// Both components finite and inside [-90, 90] / [-180, 180].
    pub fn validate(&self) -> CoreResult<()> {
        let (latitude, longitude) = (self.latitude, self.longitude);
        if !latitude.is_finite() {
            return Err(CoreError::invalid(format!("latitude {} is not a finite number", latitude)));
        }
        if !longitude.is_finite() {
            return Err(CoreError::invalid(format!("longitude {} is not a finite number", longitude)));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::invalid(format!("latitude {} outside [-90, 90]", latitude)));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::invalid(format!("longitude {} outside [-180, 180]", longitude)));
        }
        Ok(())
    }

    /// Great-circle distance to another point (km)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance between two lat/lng pairs given in degrees (km)
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can push antipodal pairs just past 1.0
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
