//! Proximity and viewport search over listings.
//!
//! Radius searches run in two stages: a cheap degree-box test discards
//! clearly distant listings, then the exact [`haversine_km`] distance
//! decides membership and order.
//! Both stages use the listings' true positions; the output only carries
//! jittered positions.
//!
//! ```text
//! candidates ─► box prefilter ─► haversine <= radius ─► stable sort ─► jitter
//! ```

mod query;

pub use query::SearchQuery;

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::listing::{Listing, PublicListing};
use crate::location::geodesy::BoundingApproximation;
use crate::location::{haversine_km, Coordinate};
use crate::settings::DirectorySettings;

/// The area a search is restricted to.
///
/// Exactly one shape is active per query. Geometry is only defined for
/// well-formed regions: a positive radius, and a box that does not cross
/// the antimeridian (`west <= east`). [`SearchQuery`] enforces both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchRegion {
    /// Everything within `radius_km` of `center`, nearest first.
    Radius {
        /// Search center.
        center: Coordinate,
        /// Inclusive radius in kilometers.
        radius_km: f64,
    },
    /// Everything inside a viewport, in input order.
    BoundingBox {
        /// Western longitude.
        west: f64,
        /// Southern latitude.
        south: f64,
        /// Eastern longitude.
        east: f64,
        /// Northern latitude.
        north: f64,
    },
}

impl SearchRegion {
    /// Radius region around `center`.
    #[must_use]
    pub const fn radius(center: Coordinate, radius_km: f64) -> Self {
        Self::Radius { center, radius_km }
    }

    /// Viewport region. Arguments follow map-library order: west, south, east, north.
    #[must_use]
    pub const fn bounding_box(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::BoundingBox {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns `true` if `point` is inside the region.
    ///
    /// Both shapes treat their boundary as inside.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        match *self {
            Self::Radius { center, radius_km } => haversine_km(center, point) <= radius_km,
            Self::BoundingBox {
                west,
                south,
                east,
                north,
            } => {
                (south..=north).contains(&point.latitude)
                    && (west..=east).contains(&point.longitude)
            }
        }
    }
}

/// Filters and ranks listings against a [`SearchRegion`].
#[derive(Debug, Clone, Default)]
pub struct ProximityFilter {
    settings: DirectorySettings,
}

impl ProximityFilter {
    /// Creates a filter that jitters results with `settings`.
    ///
    /// A jitter radius that would not move listings is replaced by the
    /// default when projecting (see
    /// [`DirectorySettings::public_jitter_radius_m`]).
    #[must_use]
    pub fn new(settings: DirectorySettings) -> Self {
        if let Err(error) = settings.validate() {
            warn!(%error, "directory settings failed validation");
        }
        Self { settings }
    }

    /// Returns the settings used for public projection.
    #[must_use]
    pub const fn settings(&self) -> &DirectorySettings {
        &self.settings
    }

    /// Runs a search and projects the matches for public display.
    ///
    /// - Radius: listings whose true position is within `radius_km` of the
    ///   center (inclusive), sorted by ascending distance. Equal distances
    ///   keep their input order. Each result carries `distance_km`.
    /// - Bounding box: listings whose true position is inside the box
    ///   (inclusive), in input order, without `distance_km`.
    ///
    /// Candidates may be owned listings or references to them. An empty
    /// candidate slice yields an empty result.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use porchlight_core::listing::{Listing, ListingDetails};
    /// use porchlight_core::location::Coordinate;
    /// use porchlight_core::search::{ProximityFilter, SearchRegion};
    ///
    /// let details = ListingDetails {
    ///     title: "Porch".to_string(),
    ///     suburb: String::new(),
    ///     tags: Vec::new(),
    ///     scare_level: 2,
    ///     photo_url: String::new(),
    ///     start_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
    ///     open_from: None,
    ///     open_to: None,
    /// };
    /// let near = Listing::new("a", Coordinate::new(1.0, 0.0), details.clone());
    /// let far = Listing::new("b", Coordinate::new(1.01, 0.0), details);
    ///
    /// let region = SearchRegion::radius(Coordinate::new(0.0, 0.0), 111.32);
    /// let results = ProximityFilter::default().search(&region, &[near, far]);
    ///
    /// assert_eq!(results.len(), 1);
    /// assert_eq!(results[0].id, "a");
    /// assert!((results[0].distance_km.unwrap() - 111.195).abs() < 0.001);
    /// ```
    #[must_use]
    pub fn search<L: Borrow<Listing>>(
        &self,
        region: &SearchRegion,
        candidates: &[L],
    ) -> Vec<PublicListing> {
        match *region {
            SearchRegion::Radius { center, radius_km } => {
                self.search_radius(center, radius_km, candidates)
            }
            SearchRegion::BoundingBox { .. } => {
                let results: Vec<PublicListing> = candidates
                    .iter()
                    .map(<L as Borrow<Listing>>::borrow)
                    .filter(|listing| region.contains(listing.coordinate))
                    .map(|listing| PublicListing::from_listing(listing, &self.settings, None))
                    .collect();
                debug!(
                    candidates = candidates.len(),
                    matched = results.len(),
                    "bounding box search"
                );
                results
            }
        }
    }

    /// Projects every candidate without any geospatial restriction.
    #[must_use]
    pub fn project<L: Borrow<Listing>>(&self, candidates: &[L]) -> Vec<PublicListing> {
        candidates
            .iter()
            .map(<L as Borrow<Listing>>::borrow)
            .map(|listing| PublicListing::from_listing(listing, &self.settings, None))
            .collect()
    }

    fn search_radius<L: Borrow<Listing>>(
        &self,
        center: Coordinate,
        radius_km: f64,
        candidates: &[L],
    ) -> Vec<PublicListing> {
        let approx = BoundingApproximation::around(center, radius_km);

        let boxed: Vec<&Listing> = candidates
            .iter()
            .map(<L as Borrow<Listing>>::borrow)
            .filter(|listing| approx.contains(center, listing.coordinate))
            .collect();
        let prefiltered = boxed.len();

        let mut in_range: Vec<(&Listing, f64)> = boxed
            .into_iter()
            .map(|listing| (listing, haversine_km(center, listing.coordinate)))
            .filter(|&(_, distance)| distance <= radius_km)
            .collect();
        // `sort_by` is stable, so ties keep input order.
        in_range.sort_by(|a, b| a.1.total_cmp(&b.1));

        debug!(
            candidates = candidates.len(),
            prefiltered,
            matched = in_range.len(),
            radius_km,
            "radius search"
        );

        in_range
            .into_iter()
            .map(|(listing, distance)| {
                PublicListing::from_listing(listing, &self.settings, Some(distance))
            })
            .collect()
    }
}

/// Runs [`ProximityFilter::search`] with default settings.
#[must_use]
pub fn search(region: &SearchRegion, candidates: &[Listing]) -> Vec<PublicListing> {
    ProximityFilter::default().search(region, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingDetails;
    use crate::location::jitter;
    use chrono::NaiveDate;

    fn listing(id: &str, lat: f64, lng: f64) -> Listing {
        Listing::new(
            id,
            Coordinate::new(lat, lng),
            ListingDetails {
                title: id.to_string(),
                suburb: String::new(),
                tags: Vec::new(),
                scare_level: 2,
                photo_url: String::new(),
                start_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
                open_from: None,
                open_to: None,
            },
        )
    }

    fn ids(results: &[PublicListing]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_candidates_yield_empty_results() {
        let radius = SearchRegion::radius(Coordinate::new(0.0, 0.0), 5.0);
        let bbox = SearchRegion::bounding_box(-1.0, -1.0, 1.0, 1.0);
        assert!(search(&radius, &[]).is_empty());
        assert!(search(&bbox, &[]).is_empty());
    }

    #[test]
    fn worked_example_one_degree() {
        let candidates = [listing("in", 1.0, 0.0), listing("out", 1.01, 0.0)];
        let region = SearchRegion::radius(Coordinate::new(0.0, 0.0), 111.32);
        let results = search(&region, &candidates);

        assert_eq!(ids(&results), vec!["in"]);
        let d = results[0].distance_km.unwrap();
        assert!((d - 111.2).abs() < 0.01);
    }

    #[test]
    fn radius_results_sorted_by_distance() {
        // Due north of the equator: ~0.111195 km per 0.001 degree.
        let km = |d: f64| d / 111.194_926_6;
        let candidates = [
            listing("two", km(2.0), 0.0),
            listing("half", km(0.5), 0.0),
            listing("ten", km(10.0), 0.0),
        ];
        let region = SearchRegion::radius(Coordinate::new(0.0, 0.0), 15.0);
        let results = search(&region, &candidates);

        assert_eq!(ids(&results), vec!["half", "two", "ten"]);
        let distances: Vec<f64> = results.iter().map(|r| r.distance_km.unwrap()).collect();
        assert!((distances[0] - 0.5).abs() < 1e-6);
        assert!((distances[1] - 2.0).abs() < 1e-6);
        assert!((distances[2] - 10.0).abs() < 1e-6);
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let candidates = [
            listing("east", 0.0, 0.01),
            listing("west", 0.0, -0.01),
            listing("near", 0.0, 0.001),
        ];
        let region = SearchRegion::radius(Coordinate::new(0.0, 0.0), 5.0);
        assert_eq!(ids(&search(&region, &candidates)), vec!["near", "east", "west"]);

        let reversed = [candidates[1].clone(), candidates[0].clone()];
        assert_eq!(ids(&search(&region, &reversed)), vec!["west", "east"]);
    }

    #[test]
    fn radius_results_use_jittered_positions() {
        let candidates = [listing("a", -31.95, 115.86)];
        let region = SearchRegion::radius(Coordinate::new(-31.95, 115.86), 1.0);
        let results = search(&region, &candidates);

        assert_eq!(results.len(), 1);
        assert_ne!(results[0].coordinate(), candidates[0].coordinate);
        // Distance is measured to the true position.
        assert_eq!(results[0].distance_km, Some(0.0));
    }

    #[test]
    fn bbox_boundaries_are_inclusive() {
        let candidates = [
            listing("sw", -32.0, 115.0),
            listing("ne", -31.0, 116.0),
            listing("outside-west", -31.5, 115.0 - 1e-9),
            listing("outside-north", -31.0 + 1e-9, 115.5),
        ];
        let region = SearchRegion::bounding_box(115.0, -32.0, 116.0, -31.0);
        let results = search(&region, &candidates);

        assert_eq!(ids(&results), vec!["sw", "ne"]);
        assert!(results.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn bbox_preserves_input_order() {
        let candidates = [
            listing("c", 0.3, 0.3),
            listing("a", 0.1, 0.1),
            listing("b", 0.2, 0.2),
        ];
        let region = SearchRegion::bounding_box(0.0, 0.0, 1.0, 1.0);
        assert_eq!(ids(&search(&region, &candidates)), vec!["c", "a", "b"]);
    }

    #[test]
    fn filter_uses_configured_jitter_radius() {
        let settings = DirectorySettings {
            jitter_radius_m: 2.0,
            ..DirectorySettings::default()
        };
        let candidates = [listing("a", 10.0, 10.0)];
        let region = SearchRegion::bounding_box(9.0, 9.0, 11.0, 11.0);
        let results = ProximityFilter::new(settings).search(&region, &candidates);

        let public = results[0].coordinate();
        assert_eq!(public, jitter("a", 10.0, 10.0, 2.0));
        // Within 2 m on the 6371 km sphere, plus slack for the sphere ratio.
        let offset_km = haversine_km(public, candidates[0].coordinate);
        assert!(offset_km > 0.0 && offset_km <= 0.002_1, "{offset_km}");
    }

    #[test]
    fn zero_jitter_radius_never_returns_true_position() {
        let settings = DirectorySettings {
            jitter_radius_m: 0.0,
            ..DirectorySettings::default()
        };
        let candidates = [listing("a", 10.0, 10.0)];
        let radius = SearchRegion::radius(Coordinate::new(10.0, 10.0), 1.0);
        let filter = ProximityFilter::new(settings);

        for public in filter
            .search(&radius, &candidates)
            .into_iter()
            .chain(filter.project(&candidates))
        {
            assert_eq!(public.coordinate(), jitter("a", 10.0, 10.0, 40.0));
            // At least the 4 m floor of the default radius.
            assert!(haversine_km(public.coordinate(), candidates[0].coordinate) > 0.003_9);
        }
    }

    #[test]
    fn borrowed_candidates_match_owned() {
        let owned = [listing("a", 0.0, 0.001), listing("b", 0.0, 0.0)];
        let borrowed: Vec<&Listing> = owned.iter().collect();
        let radius = SearchRegion::radius(Coordinate::new(0.0, 0.0), 1.0);
        let bbox = SearchRegion::bounding_box(-1.0, -1.0, 1.0, 1.0);
        let filter = ProximityFilter::default();

        assert_eq!(filter.search(&radius, &borrowed), filter.search(&radius, &owned));
        assert_eq!(filter.search(&bbox, &borrowed), filter.search(&bbox, &owned));
        assert_eq!(filter.project(&borrowed), filter.project(&owned));
    }

    #[test]
    fn project_keeps_every_candidate() {
        let candidates = [listing("a", 0.0, 0.0), listing("b", 80.0, 170.0)];
        let results = ProximityFilter::default().project(&candidates);
        assert_eq!(ids(&results), vec!["a", "b"]);
    }

    #[test]
    fn region_serializes_as_tagged_variant() {
        let region = SearchRegion::radius(Coordinate::new(1.0, 2.0), 3.0);
        let json = serde_json::to_string(&region).unwrap();
        assert!(json.contains(r#""type":"radius""#));

        let parsed: SearchRegion = serde_json::from_str(
            r#"{"type":"bounding_box","west":1.0,"south":2.0,"east":3.0,"north":4.0}"#,
        )
        .unwrap();
        assert_eq!(parsed, SearchRegion::bounding_box(1.0, 2.0, 3.0, 4.0));
    }
}
