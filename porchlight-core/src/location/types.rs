//! Coordinate value type.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point on the Earth's surface, in degrees.
///
/// Latitude is expected in `-90.0..=90.0` and longitude in `-180.0..=180.0`.
/// The geodesy and privacy functions do not validate their input; callers
/// that accept untrusted numbers should check [`Coordinate::is_valid`] first.
///
/// # Example
///
/// ```
/// use porchlight_core::location::Coordinate;
///
/// let perth = Coordinate::new(-31.9523, 115.8613);
/// assert!(perth.is_valid());
/// assert!(!Coordinate::new(91.0, 0.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Error returned when a `"lat,lng"` string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected \"lat,lng\" with lat in -90..=90 and lng in -180..=180, got {0:?}")]
pub struct ParseCoordinateError(pub String);

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    /// Parses `"lat,lng"` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(err)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| err())?;
        let longitude = lng.trim().parse::<f64>().map_err(|_| err())?;

        let coordinate = Self::new(latitude, longitude);
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(err())
        }
    }
}
