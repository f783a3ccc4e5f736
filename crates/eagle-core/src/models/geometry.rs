//! Bounding boxes and resolved locations.
//!
//! All coordinates are WGS 84 decimal degrees. A [`BBox`] serializes as the
//! canonical `[minLon, minLat, maxLon, maxLat]` array used by GeoJSON and the
//! HTTP surface.

use geo::algorithm::contains::Contains;
use geo::algorithm::intersects::Intersects;
use geo::{coord, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{EagleError, Result};

/// Pad applied around a point when a geocoder supplies no bounding box
pub const DEFAULT_BBOX_PAD: f64 = 0.01;

/// Valid WGS 84 longitude range
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// Valid WGS 84 latitude range
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Axis-aligned bounding box `[minLon, minLat, maxLon, maxLat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    /// Create a bounding box, rejecting non-finite, out-of-range or inverted extents
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        let bbox = Self { min_lon, min_lat, max_lon, max_lat };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Box centered on a point, extending `pad` degrees in every direction
    pub fn around_point(lat: f64, lon: f64, pad: f64) -> Self {
        Self {
            min_lon: lon - pad,
            min_lat: lat - pad,
            max_lon: lon + pad,
            max_lat: lat + pad,
        }
    }

    /// Build from the canonical `[minLon, minLat, maxLon, maxLat]` array
    pub fn from_array(values: [f64; 4]) -> Result<Self> {
        let [min_lon, min_lat, max_lon, max_lat] = values;
        Self::new(min_lon, min_lat, max_lon, max_lat)
    }

    /// Build from a slice, as received from loosely-typed request bodies
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let values: [f64; 4] = values.try_into().map_err(|_| EagleError::InvalidBBox {
            reason: format!("expected 4 values, got {}", values.len()),
        })?;
        Self::from_array(values)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Geometric center as `(lon, lat)`
    pub fn center(&self) -> (f64, f64) {
        ((self.min_lon + self.max_lon) / 2.0, (self.min_lat + self.max_lat) / 2.0)
    }

    /// True when both spans are strictly positive
    pub fn is_non_degenerate(&self) -> bool {
        self.lon_span() > 0.0 && self.lat_span() > 0.0
    }

    /// Shrink each side by `fraction` of the corresponding span.
    ///
    /// `fraction` is clamped to `[0, 0.5)` so the result never inverts.
    pub fn inset(&self, fraction: f64) -> Self {
        let fraction = fraction.clamp(0.0, 0.499);
        let dx = self.lon_span() * fraction;
        let dy = self.lat_span() * fraction;
        Self {
            min_lon: self.min_lon + dx,
            min_lat: self.min_lat + dy,
            max_lon: self.max_lon - dx,
            max_lat: self.max_lat - dy,
        }
    }

    /// Point lies strictly inside the box (boundary excluded)
    pub fn contains_strictly(&self, lon: f64, lat: f64) -> bool {
        self.to_rect().contains(&coord! { x: lon, y: lat })
    }

    /// Point lies inside the box or on its boundary
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.to_rect().intersects(&coord! { x: lon, y: lat })
    }

    /// Convert to a `geo` rectangle for spatial algorithms
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    fn validate(&self) -> Result<()> {
        if self.to_array().iter().any(|v| !v.is_finite()) {
            return Err(EagleError::InvalidBBox {
                reason: "coordinates must be finite".to_string(),
            });
        }
        let (lon_min, lon_max) = LON_RANGE;
        if [self.min_lon, self.max_lon].iter().any(|v| !(lon_min..=lon_max).contains(v)) {
            return Err(EagleError::InvalidBBox {
                reason: format!("longitude must lie within [{lon_min}, {lon_max}]"),
            });
        }
        let (lat_min, lat_max) = LAT_RANGE;
        if [self.min_lat, self.max_lat].iter().any(|v| !(lat_min..=lat_max).contains(v)) {
            return Err(EagleError::InvalidBBox {
                reason: format!("latitude must lie within [{lat_min}, {lat_max}]"),
            });
        }
        if self.min_lon > self.max_lon {
            return Err(EagleError::InvalidBBox {
                reason: format!("minLon {} exceeds maxLon {}", self.min_lon, self.max_lon),
            });
        }
        if self.min_lat > self.max_lat {
            return Err(EagleError::InvalidBBox {
                reason: format!("minLat {} exceeds maxLat {}", self.min_lat, self.max_lat),
            });
        }
        Ok(())
    }
}

impl TryFrom<[f64; 4]> for BBox {
    type Error = EagleError;

    fn try_from(values: [f64; 4]) -> Result<Self> {
        Self::from_array(values)
    }
}

impl From<BBox> for [f64; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.to_array()
    }
}

impl From<Rect<f64>> for BBox {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        }
    }
}

/// A resolved location, produced once per request by the geocoding stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
    pub bbox: BBox,
    pub display_name: String,
}

impl GeoLocation {
    pub fn new(lat: f64, lon: f64, bbox: BBox, display_name: impl Into<String>) -> Self {
        Self { lat, lon, bbox, display_name: display_name.into() }
    }

    /// Location with the default pad around the resolved point
    pub fn padded(lat: f64, lon: f64, display_name: impl Into<String>) -> Self {
        Self::new(lat, lon, BBox::around_point(lat, lon, DEFAULT_BBOX_PAD), display_name)
    }
}
