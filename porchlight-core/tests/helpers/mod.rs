//! Reusable fixtures for directory integration tests.
//!
//! Listings are placed at exact great-circle distances from a center with
//! [`destination`] on the haversine sphere, so the distances the search
//! computes are known up to rounding.

#![allow(dead_code)]

use chrono::NaiveDate;
use porchlight_core::listing::{Listing, ListingDetails, ListingStatus};
use porchlight_core::location::{destination, Coordinate, EARTH_RADIUS_KM};

/// Perth CBD, the default map center.
pub const PERTH: Coordinate = Coordinate::new(-31.9523, 115.8613);

/// A date inside the default listing season.
pub fn halloween() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 31).expect("valid date")
}

/// Display attributes active for the whole default season.
pub fn details(title: &str) -> ListingDetails {
    ListingDetails {
        title: title.to_string(),
        suburb: "Northbridge".to_string(),
        tags: vec!["lights".to_string()],
        scare_level: 2,
        photo_url: String::new(),
        start_date: NaiveDate::from_ymd_opt(2026, 10, 20).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 11, 1).expect("valid date"),
        open_from: Some("18:00".to_string()),
        open_to: Some("21:00".to_string()),
    }
}

/// An approved listing at `coordinate`.
pub fn listing(id: &str, coordinate: Coordinate) -> Listing {
    Listing::new(id, coordinate, details(id))
}

/// A listing with the given status.
pub fn listing_with_status(id: &str, coordinate: Coordinate, status: ListingStatus) -> Listing {
    let mut listing = listing(id, coordinate);
    listing.status = status;
    listing
}

/// Point `km` kilometers from `center` along `bearing_deg` (clockwise from north).
pub fn offset(center: Coordinate, bearing_deg: f64, km: f64) -> Coordinate {
    destination(center, bearing_deg.to_radians(), km * 1000.0, EARTH_RADIUS_KM * 1000.0)
}
