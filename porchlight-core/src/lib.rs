//! Porchlight Core Library
//!
//! Core functionality for Porchlight - a map directory of user-submitted
//! listings. Listings are shown near, but never at, their true position,
//! and can be searched by radius or by map viewport.
//!
//! - [`location`]: coordinates, great-circle geometry and public-position jitter
//! - [`search`]: radius and viewport search over listings
//! - [`listing`]: stored listings, their public projection and submissions
//! - [`Directory`]: the facade request handlers call

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
mod error;
pub mod listing;
pub mod location;
pub mod search;
mod settings;

pub use api::Directory;
pub use error::{DirectoryError, Result};
pub use settings::{DirectorySettings, MonthDay, ENV_PREFIX};
