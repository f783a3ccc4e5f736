//! Simulated change polygons.
//!
//! A simulated polygon is a rectangle centered on the bbox center, spanning
//! 60% of its longitude range and 50% of its latitude range, so it is always
//! strictly interior to the bbox it was generated from.

use eagle_core::models::{BBox, ChangeTarget};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;

/// Half-span of the polygon as a fraction of the full longitude range
pub const LON_HALF_SPAN: f64 = 0.3;
/// Half-span of the polygon as a fraction of the full latitude range
pub const LAT_HALF_SPAN: f64 = 0.25;

/// Closed ring `[[lon, lat]; 5]` for `bbox`, optionally inset first.
///
/// `inset` shrinks each side of the bbox by that fraction of its span before
/// the rectangle is computed.
pub fn synthesize_ring(bbox: &BBox, inset: Option<f64>) -> Vec<[f64; 2]> {
    let frame = match inset {
        Some(fraction) => bbox.inset(fraction),
        None => *bbox,
    };
    let (mid_lon, mid_lat) = frame.center();
    let half_lon = frame.lon_span() * LON_HALF_SPAN;
    let half_lat = frame.lat_span() * LAT_HALF_SPAN;

    vec![
        [mid_lon - half_lon, mid_lat - half_lat],
        [mid_lon + half_lon, mid_lat - half_lat],
        [mid_lon + half_lon, mid_lat + half_lat],
        [mid_lon - half_lon, mid_lat + half_lat],
        [mid_lon - half_lon, mid_lat - half_lat],
    ]
}

/// A polygon feature carrying `change`, `intensity`, and `target` properties
pub fn polygon_feature(
    ring: Vec<[f64; 2]>,
    change: &str,
    intensity: u8,
    target: ChangeTarget,
) -> Feature {
    let positions: Vec<Vec<f64>> = ring.into_iter().map(|[lon, lat]| vec![lon, lat]).collect();

    let mut properties = JsonObject::new();
    properties.insert("change".to_string(), JsonValue::from(change));
    properties.insert("intensity".to_string(), JsonValue::from(intensity.min(100)));
    properties.insert("target".to_string(), JsonValue::from(target.as_str()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![positions]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Simulated feature for `bbox`, labelled `"simulated"`
pub fn simulated_feature(
    bbox: &BBox,
    inset: Option<f64>,
    intensity: u8,
    target: ChangeTarget,
) -> Feature {
    polygon_feature(synthesize_ring(bbox, inset), "simulated", intensity, target)
}

pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection { bbox: None, features, foreign_members: None }
}
