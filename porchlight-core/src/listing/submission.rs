//! Validation of user-submitted listings.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::types::{default_scare_level, Listing, ListingDetails, ListingStatus};
use crate::error::{DirectoryError, Result};
use crate::location::Coordinate;
use crate::settings::DirectorySettings;

/// Highest accepted scare level.
pub const MAX_SCARE_LEVEL: u8 = 5;

/// A listing as submitted by a visitor, before review.
///
/// Every field except the title and position is optional; blank strings are
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Submission {
    /// Display title. Required.
    pub title: String,

    /// Long description, kept private.
    pub description: String,

    /// True latitude. Required.
    #[serde(alias = "lat")]
    pub latitude: Option<f64>,

    /// True longitude. Required.
    #[serde(alias = "lng")]
    pub longitude: Option<f64>,

    /// Street address, kept private.
    pub street: String,

    /// Suburb shown publicly.
    pub suburb: String,

    /// State or region, kept private.
    pub state: String,

    /// Postal code, kept private.
    pub postcode: String,

    /// First open day. Defaults to the season start.
    pub start_date: Option<NaiveDate>,

    /// Last open day. Defaults to the season end.
    pub end_date: Option<NaiveDate>,

    /// Opening time, free text such as `"18:00"`.
    pub open_from: Option<String>,

    /// Closing time, free text.
    pub open_to: Option<String>,

    /// Free-form tags. Blank entries are dropped.
    pub tags: Vec<String>,

    /// Scare level, `1..=5`. Defaults to 2.
    pub scare_level: Option<u8>,

    /// Photo link shown publicly.
    pub photo_url: String,
}

impl Submission {
    /// Creates a `Submission` from a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the submission and turns it into a pending [`Listing`].
    ///
    /// Missing dates default to the configured season window in the year of
    /// `today`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidSubmission`] when the title is blank,
    /// the position is missing or out of range, the date range is inverted,
    /// or the scare level is outside `1..=5`.
    pub fn into_listing(
        self,
        id: impl Into<String>,
        today: NaiveDate,
        settings: &DirectorySettings,
    ) -> Result<Listing> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(rejected("missing title"));
        }

        let coordinate = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
            _ => return Err(rejected("missing lat/lng")),
        };
        if !coordinate.is_valid() {
            return Err(rejected("lat/lng out of range"));
        }

        let start_date = match self.start_date {
            Some(date) => date,
            None => settings
                .season_start
                .in_year(today.year())
                .ok_or_else(|| rejected("season start does not exist this year"))?,
        };
        let end_date = match self.end_date {
            Some(date) => date,
            None => settings
                .season_end
                .in_year(today.year())
                .ok_or_else(|| rejected("season end does not exist this year"))?,
        };
        if end_date < start_date {
            return Err(rejected("end_date is before start_date"));
        }

        let scare_level = self.scare_level.unwrap_or_else(default_scare_level);
        if !(1..=MAX_SCARE_LEVEL).contains(&scare_level) {
            return Err(rejected("scare_level must be between 1 and 5"));
        }

        Ok(Listing {
            id: id.into(),
            coordinate,
            status: ListingStatus::Pending,
            details: ListingDetails {
                title: title.to_string(),
                suburb: self.suburb.trim().to_string(),
                tags: self
                    .tags
                    .iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
                scare_level,
                photo_url: self.photo_url.trim().to_string(),
                start_date,
                end_date,
                open_from: non_blank(self.open_from),
                open_to: non_blank(self.open_to),
            },
            description: self.description,
            street: self.street,
            state: self.state,
            postcode: self.postcode,
        })
    }
}

fn rejected(reason: &str) -> DirectoryError {
    DirectoryError::InvalidSubmission(reason.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
