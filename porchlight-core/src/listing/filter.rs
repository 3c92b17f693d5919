//! Non-geospatial visibility predicates for the public read path.

use chrono::NaiveDate;

use super::types::{Listing, ListingStatus};

/// Decides which stored listings may appear on the public map at all.
///
/// A listing is visible when it is approved, active on `date`, and carries
/// every tag in `tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    /// Day the visitor is browsing.
    pub date: NaiveDate,

    /// Tags that must all be present.
    pub tags: Vec<String>,
}

impl ListingFilter {
    /// Filter for approved listings active on `date`, with no tag constraint.
    #[must_use]
    pub const fn on(date: NaiveDate) -> Self {
        Self {
            date,
            tags: Vec::new(),
        }
    }

    /// Adds required tags. Blank entries are ignored.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    /// Returns `true` if `listing` may be shown publicly.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        listing.status == ListingStatus::Approved
            && listing.is_active_on(self.date)
            && self
                .tags
                .iter()
                .all(|wanted| listing.details.tags.iter().any(|tag| tag == wanted))
    }
}
