//! Entry point used by request handlers.

use chrono::NaiveDate;

use crate::error::Result;
use crate::listing::{Listing, ListingFilter, PublicListing, Submission};
use crate::search::{ProximityFilter, SearchQuery, SearchRegion};
use crate::settings::DirectorySettings;

/// Read and submit operations for the public map.
///
/// Every read path goes through [`PublicListing::from_listing`], so a true
/// coordinate can never appear in anything this type returns.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    filter: ProximityFilter,
}

impl Directory {
    /// Creates a `Directory` with the given settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use porchlight_core::{Directory, DirectorySettings};
    ///
    /// let directory = Directory::new(DirectorySettings::default());
    /// assert_eq!(directory.settings().max_results, 500);
    /// ```
    #[must_use]
    pub fn new(settings: DirectorySettings) -> Self {
        Self {
            filter: ProximityFilter::new(settings),
        }
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &DirectorySettings {
        self.filter.settings()
    }

    /// Lists publicly visible listings.
    ///
    /// Applies `visibility` first, then the optional `region`. Without a
    /// region the visible listings are returned in input order. The result
    /// is capped at `max_results`.
    #[must_use]
    pub fn list(
        &self,
        listings: &[Listing],
        visibility: &ListingFilter,
        region: Option<&SearchRegion>,
    ) -> Vec<PublicListing> {
        let visible: Vec<&Listing> = listings
            .iter()
            .filter(|listing| visibility.matches(listing))
            .collect();

        let mut results = match region {
            Some(region) => self.filter.search(region, &visible),
            None => self.filter.project(&visible),
        };
        results.truncate(self.settings().max_results);
        results
    }

    /// Parses `query` and lists matching public listings.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidQuery`](crate::DirectoryError::InvalidQuery)
    /// if the query parameters are malformed.
    pub fn list_from_query(
        &self,
        listings: &[Listing],
        visibility: &ListingFilter,
        query: &SearchQuery,
    ) -> Result<Vec<PublicListing>> {
        let region = query.region(self.settings())?;
        Ok(self.list(listings, visibility, region.as_ref()))
    }

    /// Public view of a single listing, whatever its status.
    ///
    /// Used to show submitters a preview of a pending listing; the preview
    /// is jittered exactly as it will be once approved.
    #[must_use]
    pub fn preview(&self, listing: &Listing) -> PublicListing {
        PublicListing::from_listing(listing, self.settings(), None)
    }

    /// Validates a submission and returns the pending listing to store.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidSubmission`](crate::DirectoryError::InvalidSubmission)
    /// if validation fails.
    pub fn submit(
        &self,
        submission: Submission,
        id: impl Into<String>,
        today: NaiveDate,
    ) -> Result<Listing> {
        submission.into_listing(id, today, self.settings())
    }
}
