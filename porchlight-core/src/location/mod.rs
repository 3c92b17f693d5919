//! Location module for Porchlight.
//!
//! Provides the geospatial primitives behind the public map:
//! - [`Coordinate`], a plain latitude/longitude value type
//! - Great-circle distance and spherical displacement ([`geodesy`])
//! - Identifier-keyed jitter so true positions never leave the core ([`privacy`])
//!
//! # Privacy Guarantees
//!
//! - Every public position is derived with [`jitter`] from the listing id
//! - The same listing always renders at the same public position
//! - Displacement is at least 10% and at most 100% of the jitter radius
//!
//! # Example Usage
//!
//! ```
//! use porchlight_core::location::{haversine_km, jitter, Coordinate};
//!
//! let truth = Coordinate::new(-31.9523, 115.8613);
//! let public = jitter("listing-7", truth.latitude, truth.longitude, 40.0);
//!
//! let offset_km = haversine_km(truth, public);
//! assert!(offset_km > 0.003 && offset_km <= 0.040);
//! ```

pub mod geodesy;
pub mod privacy;
pub mod types;

pub use geodesy::{destination, haversine_km, EARTH_RADIUS_KM};
pub use privacy::{jitter, jitter_coordinate, location_to_geohash, DEFAULT_JITTER_RADIUS_M};
pub use types::{Coordinate, ParseCoordinateError};
