//! Spherical geodesy used by the privacy and search layers.
//!
//! Two spheres are in play:
//! - [`EARTH_RADIUS_KM`] (mean radius) for great-circle distances, and
//! - [`JITTER_SPHERE_RADIUS_M`] (equatorial radius) for public-position
//!   displacement, which is fixed so jittered positions never move between
//!   releases.

use std::f64::consts::FRAC_PI_2;

use super::types::Coordinate;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Sphere radius used when displacing public positions.
pub const JITTER_SPHERE_RADIUS_M: f64 = 6_378_137.0;

/// Mean kilometers per degree of latitude, used to size the prefilter box.
pub const KM_PER_DEGREE_LAT: f64 = 111.32;

/// Floor for `cos(latitude)` so the longitude span stays finite at the poles.
pub const MIN_COS_LAT: f64 = 1e-6;

/// Absorbs rounding between the box test and the exact distance.
const PREFILTER_PAD_DEG: f64 = 1e-9;

/// Great-circle distance between two coordinates in kilometers.
///
/// Uses the haversine formula on a sphere of [`EARTH_RADIUS_KM`]. The
/// `asin` argument is capped at 1 so rounding on antipodal or coincident
/// points can never produce `NaN`.
///
/// # Examples
///
/// ```
/// use porchlight_core::location::{haversine_km, Coordinate};
///
/// let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
/// assert!((d - 111.195).abs() < 0.001);
/// ```
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Moves `origin` by `distance_m` meters along `bearing_rad` on a sphere of
/// `sphere_radius_m` meters.
///
/// This is the spherical direct problem (forward azimuth formula). Bearings
/// are measured clockwise from north. The resulting longitude is wrapped back
/// into `-180.0..=180.0` only when it leaves that range.
#[must_use]
#[allow(clippy::suboptimal_flops)] // Fused ops would drift from other implementations.
pub fn destination(
    origin: Coordinate,
    bearing_rad: f64,
    distance_m: f64,
    sphere_radius_m: f64,
) -> Coordinate {
    let angular = distance_m / sphere_radius_m;
    let lat1 = origin.latitude.to_radians();
    let lng1 = origin.longitude.to_radians();

    let sin_lat2 =
        lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lng2 = lng1
        + (bearing_rad.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(lat2.to_degrees(), wrap_longitude(lng2.to_degrees()))
}

fn wrap_longitude(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else if lng < -180.0 {
        lng + 360.0
    } else {
        lng
    }
}

/// Absolute longitude separation in degrees, taking the short way around.
fn longitude_separation(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

/// Degree half-spans of a cheap box around a radius search.
///
/// The box is a prefilter: it may admit points outside the radius, but it
/// never rejects a point whose [`haversine_km`] distance is within it.
/// Internal to radius search; callers only see its results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoundingApproximation {
    /// Latitude half-span in degrees.
    pub(crate) delta_lat: f64,

    /// Longitude half-span in degrees (180 once the disk reaches a pole).
    pub(crate) delta_lng: f64,
}

impl BoundingApproximation {
    /// Sizes the box for a `radius_km` disk around `center`.
    ///
    /// Starts from `radius / 111.32` degrees of latitude and
    /// `radius / (111.32 * cos(lat))` degrees of longitude, then widens each
    /// span to the exact spherical extent of the disk where that is larger.
    #[must_use]
    pub(crate) fn around(center: Coordinate, radius_km: f64) -> Self {
        let angular = radius_km / EARTH_RADIUS_KM;
        let cos_lat = center.latitude.to_radians().cos().max(MIN_COS_LAT);

        let nominal_lat = radius_km / KM_PER_DEGREE_LAT;
        let nominal_lng = radius_km / (KM_PER_DEGREE_LAT * cos_lat);

        let exact_lat = angular.to_degrees();
        let exact_lng = if angular >= FRAC_PI_2 || angular.sin() >= cos_lat {
            180.0
        } else {
            (angular.sin() / cos_lat).asin().to_degrees()
        };

        Self {
            delta_lat: nominal_lat.max(exact_lat) + PREFILTER_PAD_DEG,
            delta_lng: nominal_lng.max(exact_lng).min(180.0) + PREFILTER_PAD_DEG,
        }
    }

    /// Returns `true` if `point` lies inside the box centered on `center`.
    #[must_use]
    pub(crate) fn contains(&self, center: Coordinate, point: Coordinate) -> bool {
        (point.latitude - center.latitude).abs() <= self.delta_lat
            && longitude_separation(point.longitude, center.longitude) <= self.delta_lng
    }
}
