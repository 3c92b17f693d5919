//! Turns raw request parameters into a [`SearchRegion`].

use serde::Deserialize;
use tracing::{debug, warn};

use super::SearchRegion;
use crate::error::{DirectoryError, Result};
use crate::location::Coordinate;
use crate::settings::DirectorySettings;

/// Raw search parameters, exactly as they arrive in a query string.
///
/// Blank values count as absent. When both `near` and `bbox` are given the
/// radius search wins and the box is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Center of a radius search, as `"lat,lng"`.
    pub near: Option<String>,

    /// Radius for `near` in kilometers. The configured default applies
    /// when absent; ignored without `near`.
    pub radius_km: Option<String>,

    /// Viewport as `"west,south,east,north"`.
    pub bbox: Option<String>,
}

impl SearchQuery {
    /// Query for a radius search.
    #[must_use]
    pub fn near(center: &str, radius_km: Option<&str>) -> Self {
        Self {
            near: Some(center.to_string()),
            radius_km: radius_km.map(str::to_string),
            bbox: None,
        }
    }

    /// Query for a viewport search.
    #[must_use]
    pub fn bbox(bbox: &str) -> Self {
        Self {
            bbox: Some(bbox.to_string()),
            ..Self::default()
        }
    }

    /// Resolves the query into a search region.
    ///
    /// Returns `Ok(None)` when the query names no region at all.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidQuery`] if a number cannot be parsed
    /// or is not finite, a coordinate is out of range, the radius is not
    /// positive, or the box is inverted. Boxes crossing the antimeridian
    /// (`west > east`) are not supported and are rejected.
    pub fn region(&self, settings: &DirectorySettings) -> Result<Option<SearchRegion>> {
        let near = present(self.near.as_deref());
        let bbox = present(self.bbox.as_deref());

        if let Some(near) = near {
            if bbox.is_some() {
                warn!("query has both near and bbox; using radius search");
            }
            let center: Coordinate = near
                .parse()
                .map_err(|e| DirectoryError::InvalidQuery(format!("near: {e}")))?;
            let radius_km = match present(self.radius_km.as_deref()) {
                Some(raw) => parse_finite("radius_km", raw)?,
                None => settings.default_radius_km,
            };
            if radius_km <= 0.0 {
                return Err(DirectoryError::InvalidQuery(
                    "radius_km must be positive".to_string(),
                ));
            }
            return Ok(Some(SearchRegion::radius(center, radius_km)));
        }

        if present(self.radius_km.as_deref()).is_some() {
            debug!("radius_km without near is ignored");
        }

        bbox.map(parse_bbox).transpose()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_finite(name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DirectoryError::InvalidQuery(format!("{name}: not a number: {raw:?}")))
}

fn parse_bbox(raw: &str) -> Result<SearchRegion> {
    let parts = raw
        .split(',')
        .map(|part| parse_finite("bbox", part))
        .collect::<Result<Vec<f64>>>()?;
    let [west, south, east, north] = parts[..] else {
        return Err(DirectoryError::InvalidQuery(format!(
            "bbox: expected west,south,east,north, got {raw:?}"
        )));
    };

    let in_range = [west, east].iter().all(|lng| (-180.0..=180.0).contains(lng))
        && [south, north].iter().all(|lat| (-90.0..=90.0).contains(lat));
    if !in_range {
        return Err(DirectoryError::InvalidQuery(
            "bbox: coordinates out of range".to_string(),
        ));
    }
    if south > north {
        return Err(DirectoryError::InvalidQuery(
            "bbox: south is greater than north".to_string(),
        ));
    }
    if west > east {
        return Err(DirectoryError::InvalidQuery(
            "bbox: boxes crossing the antimeridian are not supported".to_string(),
        ));
    }

    Ok(SearchRegion::bounding_box(west, south, east, north))
}
