//! Listings and their public projection.
//!
//! # Types
//!
//! - [`Listing`]: a stored listing with its true position (never serialized)
//! - [`PublicListing`]: the jittered, serializable view returned to callers
//! - [`ListingFilter`]: approval, date and tag predicates for the public map
//! - [`Submission`]: an unreviewed listing from a visitor

mod filter;
mod submission;
pub mod types;

pub use filter::ListingFilter;
pub use submission::{Submission, MAX_SCARE_LEVEL};
pub use types::{Listing, ListingDetails, ListingStatus, PublicListing};
