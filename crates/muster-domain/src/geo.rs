//! Geographic coordinates and straight-line distance.

use serde::{Deserialize, Serialize};

/// Earth mean radius in meters used by [`haversine_meters`].
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    /// The (0, 0) position recorded for a check-out with no matching check-in.
    pub const ORIGIN: Coordinate = Coordinate { lat: 0.0, long: 0.0 };

    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// Build a coordinate, rejecting NaN and out-of-range values.
    pub fn checked(lat: f64, long: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&long) {
            return Err(CoordinateError::LongitudeOutOfRange(long));
        }
        Ok(Self { lat, long })
    }

    /// `"lat,long"` as accepted by routing providers.
    pub fn to_query_value(self) -> String {
        format!("{},{}", self.lat, self.long)
    }
}

/// Great-circle distance between two coordinates in meters (haversine formula).
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_long = (b.long - a.long).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_long / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}
