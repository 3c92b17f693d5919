//! Listing data types.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::location::{jitter_coordinate, location_to_geohash, Coordinate};
use crate::settings::DirectorySettings;

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Submitted and awaiting review. New submissions always start here.
    #[default]
    Pending,
    /// Visible on the public map.
    Approved,
    /// Reviewed and hidden.
    Rejected,
}

/// Display attributes that may be shown publicly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetails {
    /// Headline shown on the map marker.
    pub title: String,

    /// Suburb or locality, never a street address.
    #[serde(default)]
    pub suburb: String,

    /// Free-form tags, matched exactly by [`ListingFilter`](super::ListingFilter).
    #[serde(default)]
    pub tags: Vec<String>,

    /// Intensity rating, 1-5.
    #[serde(default = "default_scare_level")]
    pub scare_level: u8,

    /// Public photo URL, empty when there is none.
    #[serde(default)]
    pub photo_url: String,

    /// First day the listing is shown.
    pub start_date: NaiveDate,

    /// Last day the listing is shown (inclusive).
    pub end_date: NaiveDate,

    /// Opening time, as entered by the submitter.
    #[serde(default)]
    pub open_from: Option<String>,

    /// Closing time, as entered by the submitter.
    #[serde(default)]
    pub open_to: Option<String>,
}

pub(crate) const fn default_scare_level() -> u8 {
    2
}

/// A stored listing, including its true position.
///
/// `Listing` deserializes from the data store but does not implement
/// `Serialize`: the only way out of the core is [`PublicListing`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing {
    /// Stable identifier. Changing it moves the public position.
    ///
    /// Integer keys from the store are read as their decimal text, so
    /// `7` and `"7"` jitter identically.
    #[serde(deserialize_with = "id_from_store")]
    pub id: String,

    /// True position. Never exposed outside the core.
    #[serde(flatten)]
    pub coordinate: Coordinate,

    /// Moderation state.
    #[serde(default)]
    pub status: ListingStatus,

    /// Publicly displayable attributes.
    #[serde(flatten)]
    pub details: ListingDetails,

    // Private attributes - kept for moderators, never projected.
    /// Long description.
    #[serde(default)]
    pub description: String,

    /// Street address.
    #[serde(default)]
    pub street: String,

    /// State or region.
    #[serde(default)]
    pub state: String,

    /// Postal code.
    #[serde(default)]
    pub postcode: String,
}

impl Listing {
    /// Creates an approved listing with no private attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, coordinate: Coordinate, details: ListingDetails) -> Self {
        Self {
            id: id.into(),
            coordinate,
            status: ListingStatus::Approved,
            details,
            description: String::new(),
            street: String::new(),
            state: String::new(),
            postcode: String::new(),
        }
    }

    /// Returns `true` if `date` falls within the listing's date range.
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.details.start_date <= date && date <= self.details.end_date
    }

    /// Creates a `Listing` from a JSON record.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or missing required fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn id_from_store<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoreId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match StoreId::deserialize(deserializer)? {
        StoreId::Text(id) => id,
        StoreId::Signed(id) => id.to_string(),
        StoreId::Unsigned(id) => id.to_string(),
    })
}

/// The public projection of a [`Listing`].
///
/// `latitude`/`longitude` are always the jittered position. `distance_km` is
/// present only when the listing came from a radius search, and is measured
/// from the search center to the listing's true position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicListing {
    /// Listing identifier.
    pub id: String,

    /// Jittered latitude.
    pub latitude: f64,

    /// Jittered longitude.
    pub longitude: f64,

    /// Geohash of the jittered position.
    pub geohash: String,

    /// Public display attributes.
    #[serde(flatten)]
    pub details: ListingDetails,

    /// Great-circle distance from the search center, unrounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl PublicListing {
    /// Projects a listing for public display, jittering its position.
    #[must_use]
    pub fn from_listing(
        listing: &Listing,
        settings: &DirectorySettings,
        distance_km: Option<f64>,
    ) -> Self {
        let public = jitter_coordinate(
            &listing.id,
            listing.coordinate,
            settings.public_jitter_radius_m(),
        );

        Self {
            id: listing.id.clone(),
            latitude: public.latitude,
            longitude: public.longitude,
            geohash: location_to_geohash(public, settings.geohash_precision),
            details: listing.details.clone(),
            distance_km,
        }
    }

    /// Returns the public position as a [`Coordinate`].
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Converts this `PublicListing` to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
