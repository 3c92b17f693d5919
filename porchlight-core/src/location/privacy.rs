//! Identifier-keyed coordinate jitter and public geohashes.
//!
//! A listing is never shown at its true position. Instead it is displaced by
//! a bearing and distance derived from the SHA-256 digest of its identifier,
//! so the same listing lands on the same public position on every request,
//! in every process, in every implementation that follows the same recipe:
//!
//! - bearing = `digest[0] / 255 * 2π`
//! - distance = `digest[1] / 255 * 0.9r + 0.1r`
//!
//! The `0.1r` floor guarantees a minimum visible offset for every identifier.

use sha2::{Digest, Sha256};
use std::f64::consts::PI;

use super::geodesy::{destination, JITTER_SPHERE_RADIUS_M};
use super::types::Coordinate;

/// Default jitter radius in meters.
pub const DEFAULT_JITTER_RADIUS_M: f64 = 40.0;

/// Fraction of the radius that every displacement is guaranteed to cover.
pub const MIN_OFFSET_FRACTION: f64 = 0.1;

/// Derives the public position of a listing from its true position.
///
/// The output lies between `0.1 * radius_meters` and `radius_meters` from
/// `(lat, lng)`, measured on a sphere of
/// [`JITTER_SPHERE_RADIUS_M`](super::geodesy::JITTER_SPHERE_RADIUS_M).
/// The function is pure: identical arguments always produce bit-identical
/// output.
///
/// # Arguments
///
/// * `id` - Stable listing identifier (the only entropy source)
/// * `lat` - True latitude in degrees
/// * `lng` - True longitude in degrees
/// * `radius_meters` - Maximum displacement
///
/// # Examples
///
/// ```
/// use porchlight_core::location::jitter;
///
/// let a = jitter("listing-42", -31.9523, 115.8613, 40.0);
/// let b = jitter("listing-42", -31.9523, 115.8613, 40.0);
/// assert_eq!(a, b);
/// assert_ne!((a.latitude, a.longitude), (-31.9523, 115.8613));
/// ```
#[must_use]
pub fn jitter(id: &str, lat: f64, lng: f64, radius_meters: f64) -> Coordinate {
    let digest = Sha256::digest(id.as_bytes());

    let bearing = f64::from(digest[0]) / 255.0 * PI * 2.0;
    let distance = f64::from(digest[1]) / 255.0 * radius_meters * (1.0 - MIN_OFFSET_FRACTION)
        + radius_meters * MIN_OFFSET_FRACTION;

    destination(
        Coordinate::new(lat, lng),
        bearing,
        distance,
        JITTER_SPHERE_RADIUS_M,
    )
}

/// [`jitter`] for callers that already hold a [`Coordinate`].
#[must_use]
pub fn jitter_coordinate(id: &str, coordinate: Coordinate, radius_meters: f64) -> Coordinate {
    jitter(id, coordinate.latitude, coordinate.longitude, radius_meters)
}

/// Converts a public coordinate to a geohash string.
///
/// Only call this with an already jittered coordinate. Returns an empty
/// string if the coordinate cannot be encoded (NaN or out of range).
///
/// # Examples
///
/// ```
/// use porchlight_core::location::{location_to_geohash, Coordinate};
///
/// let geohash = location_to_geohash(Coordinate::new(37.7749, -122.4194), 7);
/// assert_eq!(geohash.len(), 7);
/// ```
#[must_use]
pub fn location_to_geohash(coordinate: Coordinate, precision: u8) -> String {
    geohash::encode(
        geohash::Coord {
            x: coordinate.longitude,
            y: coordinate.latitude,
        },
        precision as usize,
    )
    .unwrap_or_else(|_| String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::geodesy::{haversine_km, EARTH_RADIUS_KM};

    fn displacement_m(id: &str, origin: Coordinate, radius_m: f64) -> f64 {
        let public = jitter_coordinate(id, origin, radius_m);
        // Convert the mean-sphere distance back onto the jitter sphere.
        haversine_km(origin, public) * 1000.0 * (JITTER_SPHERE_RADIUS_M / 1000.0)
            / EARTH_RADIUS_KM
    }

    #[test]
    fn jitter_is_deterministic() {
        let a = jitter("listing-1", -31.9523, 115.8613, 40.0);
        let b = jitter("listing-1", -31.9523, 115.8613, 40.0);
        assert_eq!(a.latitude.to_bits(), b.latitude.to_bits());
        assert_eq!(a.longitude.to_bits(), b.longitude.to_bits());
    }

    #[test]
    fn jitter_matches_known_digest_vector() {
        // sha256("abc") starts with 0xba 0x78.
        let origin = Coordinate::new(0.0, 0.0);
        let expected_bearing = 186.0 / 255.0 * PI * 2.0;
        let expected_distance = 120.0 / 255.0 * 40.0 * 0.9 + 4.0;

        let public = jitter_coordinate("abc", origin, 40.0);
        let reference = destination(
            origin,
            expected_bearing,
            expected_distance,
            JITTER_SPHERE_RADIUS_M,
        );
        assert_eq!(public, reference);
        assert!((displacement_m("abc", origin, 40.0) - expected_distance).abs() < 1e-6);
    }

    #[test]
    fn jitter_stays_within_radius_band() {
        let origin = Coordinate::new(-31.9523, 115.8613);
        for i in 0..64 {
            let id = format!("listing-{i}");
            let d = displacement_m(&id, origin, 40.0);
            assert!(d >= 4.0 - 1e-6, "{id} moved only {d} m");
            assert!(d <= 40.0 + 1e-6, "{id} moved {d} m");
        }
    }

    #[test]
    fn jitter_never_returns_true_position() {
        let origin = Coordinate::new(51.5074, -0.1278);
        for i in 0..32 {
            let public = jitter_coordinate(&format!("listing-{i}"), origin, 40.0);
            assert_ne!(public, origin);
        }
    }

    #[test]
    fn jitter_depends_on_identifier() {
        let a = jitter("listing-1", 10.0, 10.0, 40.0);
        let b = jitter("listing-2", 10.0, 10.0, 40.0);
        assert_ne!(a, b);
    }

    #[test]
    fn jitter_empty_identifier_is_valid_input() {
        let public = jitter("", 10.0, 10.0, 40.0);
        assert!(public.is_valid());
        assert_ne!(public, Coordinate::new(10.0, 10.0));
    }

    #[test]
    fn jitter_zero_radius_is_identity_distance() {
        let origin = Coordinate::new(10.0, 10.0);
        let public = jitter_coordinate("listing-1", origin, 0.0);
        assert!(haversine_km(origin, public) < 1e-9);
    }

    #[test]
    fn jitter_handles_high_latitude() {
        let origin = Coordinate::new(89.999_9, 45.0);
        for i in 0..16 {
            let public = jitter_coordinate(&format!("listing-{i}"), origin, 40.0);
            assert!(public.is_valid());
            assert!(displacement_m(&format!("listing-{i}"), origin, 40.0) <= 40.0 + 1e-6);
        }
    }

    #[test]
    fn geohash_has_requested_length() {
        let geohash = location_to_geohash(Coordinate::new(-31.9523, 115.8613), 7);
        assert_eq!(geohash.len(), 7);
    }

    #[test]
    fn geohash_of_out_of_range_coordinate_is_empty() {
        assert!(location_to_geohash(Coordinate::new(95.0, 0.0), 7).is_empty());
    }

    #[test]
    fn geohash_nearby_positions_share_prefix() {
        let a = location_to_geohash(Coordinate::new(37.7749, -122.4194), 8);
        let b = location_to_geohash(Coordinate::new(37.7758, -122.4203), 8);
        let common = a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count();
        assert!(common >= 5);
    }
}
