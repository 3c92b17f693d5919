//! Directory configuration.
//!
//! Settings are plain serde data with privacy-first defaults. They can be
//! loaded from JSON or from `PORCHLIGHT_*` environment variables; any
//! variable that is unset keeps its default.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, Result};
use crate::location::{Coordinate, DEFAULT_JITTER_RADIUS_M};

/// Prefix shared by every environment variable read by [`DirectorySettings::from_env`].
pub const ENV_PREFIX: &str = "PORCHLIGHT_";

/// A calendar day without a year, used for the seasonal listing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
}

impl MonthDay {
    /// Creates a month/day pair. Validity is checked by [`MonthDay::in_year`].
    #[must_use]
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// Resolves this day in `year`, or `None` if it does not exist there.
    #[must_use]
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }

    fn parse(key: &str, value: &str) -> Result<Self> {
        let invalid =
            || DirectoryError::InvalidSetting(format!("{key}: expected MM-DD, got {value:?}"));
        let (month, day) = value.trim().split_once('-').ok_or_else(invalid)?;
        let parsed = Self::new(
            month.parse().map_err(|_| invalid())?,
            day.parse().map_err(|_| invalid())?,
        );
        // 2000 is a leap year, so Feb 29 is accepted here.
        parsed.in_year(2000).map(|_| parsed).ok_or_else(invalid)
    }
}

/// Settings for the public directory.
///
/// # Example
///
/// ```
/// use porchlight_core::DirectorySettings;
///
/// let settings = DirectorySettings::default();
/// assert_eq!(settings.jitter_radius_m, 40.0);
/// assert_eq!(settings.default_radius_km, 5.0);
/// assert_eq!(settings.max_results, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// Maximum public displacement in meters.
    pub jitter_radius_m: f64,

    /// Radius used when a query names a center but no radius.
    pub default_radius_km: f64,

    /// Initial map center shown to visitors.
    pub default_center: Coordinate,

    /// Upper bound on listings returned by one read.
    pub max_results: usize,

    /// Length of the geohash attached to public listings.
    pub geohash_precision: u8,

    /// First day of the listing season (submission default start date).
    pub season_start: MonthDay,

    /// Last day of the listing season (submission default end date).
    pub season_end: MonthDay,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            jitter_radius_m: DEFAULT_JITTER_RADIUS_M,
            default_radius_km: 5.0,
            default_center: Coordinate::new(-31.9523, 115.8613),
            max_results: 500,
            geohash_precision: 7,
            season_start: MonthDay::new(10, 20),
            season_end: MonthDay::new(11, 1),
        }
    }
}

impl DirectorySettings {
    /// Loads settings from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings from an arbitrary key lookup.
    ///
    /// Recognized keys (each prefixed with [`ENV_PREFIX`]):
    /// `JITTER_RADIUS_M`, `DEFAULT_RADIUS_KM`, `DEFAULT_CENTER` (`"lat,lng"`),
    /// `MAX_RESULTS`, `GEOHASH_PRECISION`, `SEASON_START` and `SEASON_END`
    /// (`"MM-DD"`).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidSetting`] naming the first bad key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };
        let mut settings = Self::default();

        if let Some((key, value)) = get("JITTER_RADIUS_M") {
            settings.jitter_radius_m = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = get("DEFAULT_RADIUS_KM") {
            settings.default_radius_km = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = get("DEFAULT_CENTER") {
            settings.default_center = value
                .parse()
                .map_err(|e| DirectoryError::InvalidSetting(format!("{key}: {e}")))?;
        }
        if let Some((key, value)) = get("MAX_RESULTS") {
            settings.max_results = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = get("GEOHASH_PRECISION") {
            settings.geohash_precision = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = get("SEASON_START") {
            settings.season_start = MonthDay::parse(&key, &value)?;
        }
        if let Some((key, value)) = get("SEASON_END") {
            settings.season_end = MonthDay::parse(&key, &value)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every value is usable by the directory.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidSetting`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !has_public_offset(self.jitter_radius_m) {
            return Err(invalid("jitter_radius_m must be positive"));
        }
        if !(self.default_radius_km.is_finite() && self.default_radius_km > 0.0) {
            return Err(invalid("default_radius_km must be positive"));
        }
        if !self.default_center.is_valid() {
            return Err(invalid("default_center is out of range"));
        }
        if self.max_results == 0 {
            return Err(invalid("max_results must be at least 1"));
        }
        if !(1..=12).contains(&self.geohash_precision) {
            return Err(invalid("geohash_precision must be between 1 and 12"));
        }
        if self.season_start.in_year(2000).is_none() || self.season_end.in_year(2000).is_none() {
            return Err(invalid("season window contains an impossible date"));
        }
        Ok(())
    }

    /// Jitter radius applied when projecting listings for public display.
    ///
    /// Settings built in code skip [`validate`](Self::validate), so a zero,
    /// negative or non-finite radius falls back to
    /// [`DEFAULT_JITTER_RADIUS_M`] here. A public position is never the
    /// true one.
    #[must_use]
    pub fn public_jitter_radius_m(&self) -> f64 {
        if has_public_offset(self.jitter_radius_m) {
            self.jitter_radius_m
        } else {
            DEFAULT_JITTER_RADIUS_M
        }
    }
}

fn has_public_offset(radius_m: f64) -> bool {
    radius_m.is_finite() && radius_m > 0.0
}

fn invalid(message: &str) -> DirectoryError {
    DirectoryError::InvalidSetting(message.to_string())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DirectoryError::InvalidSetting(format!("{key}: cannot parse {value:?}")))
}
