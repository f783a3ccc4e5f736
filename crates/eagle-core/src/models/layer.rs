use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Prefix carried by every layer id produced by a simulated or fallback path
pub const SIMULATED_LAYER_PREFIX: &str = "sim-";

/// Layer rendering category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    Change,
    Heatmap,
}

/// Leaflet-style path options for a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub color: String,
    pub weight: u32,
    pub fill_opacity: f64,
}

impl LayerStyle {
    pub fn new(color: impl Into<String>, weight: u32, fill_opacity: f64) -> Self {
        Self { color: color.into(), weight, fill_opacity }
    }

    /// Warm red used for the primary change layer
    pub fn warm() -> Self {
        Self::new("#ff6b6b", 2, 0.45)
    }

    /// Cool green used for the secondary change layer
    pub fn cool() -> Self {
        Self::new("#00d184", 2, 0.32)
    }
}

/// A named, styled collection of change polygons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub style: LayerStyle,
    pub geojson: FeatureCollection,
}

impl Layer {
    pub fn change(id: impl Into<String>, style: LayerStyle, geojson: FeatureCollection) -> Self {
        Self { id: id.into(), kind: LayerKind::Change, style, geojson }
    }

    /// Whether this layer came from a simulated or fallback path
    pub fn is_simulated(&self) -> bool {
        self.id.starts_with(SIMULATED_LAYER_PREFIX)
    }
}

/// Ordered layers produced for one bounding box
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InferenceResult {
    pub layers: Vec<Layer>,
}

impl InferenceResult {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// True when any layer was produced without a real model
    pub fn is_degraded(&self) -> bool {
        self.layers.iter().any(Layer::is_simulated)
    }

    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.geojson.features.len()).sum()
    }
}
