//! Model-free layer generation

use std::sync::Arc;

use async_trait::async_trait;
use eagle_core::models::{AnalysisMeta, BBox, InferenceResult, Layer, LayerStyle};
use eagle_core::ports::InferenceBackend;

use crate::intensity::{IntensitySource, RandomIntensity};
use crate::synth::{collection, simulated_feature};
use crate::{SIM_CHANGE_1, SIM_CHANGE_2, SIM_FALLBACK};

/// Inset applied to the secondary simulated layer
pub const SECONDARY_INSET: f64 = 0.1;

/// Always-available backend producing two overlapping simulated layers
#[derive(Clone)]
pub struct SimulatedBackend {
    intensity: Arc<dyn IntensitySource>,
}

impl SimulatedBackend {
    pub fn new(intensity: Arc<dyn IntensitySource>) -> Self {
        Self { intensity }
    }

    /// `sim-change-1` over the full box (warm) and `sim-change-2` over the
    /// box inset by 10% (cool)
    pub fn layers(&self, bbox: &BBox, meta: &AnalysisMeta) -> InferenceResult {
        let primary = simulated_feature(bbox, None, self.intensity.next_intensity(), meta.target);
        let secondary = simulated_feature(
            bbox,
            Some(SECONDARY_INSET),
            self.intensity.next_intensity(),
            meta.target,
        );

        InferenceResult::new(vec![
            Layer::change(SIM_CHANGE_1, LayerStyle::warm(), collection(vec![primary])),
            Layer::change(SIM_CHANGE_2, LayerStyle::cool(), collection(vec![secondary])),
        ])
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Arc::new(RandomIntensity))
    }
}

#[async_trait]
impl InferenceBackend for SimulatedBackend {
    async fn infer(&self, bbox: &BBox, meta: &AnalysisMeta) -> InferenceResult {
        self.layers(bbox, meta)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// The single layer returned when a model exists but could not be used
pub fn fallback_layer(bbox: &BBox, meta: &AnalysisMeta, intensity: &dyn IntensitySource) -> Layer {
    let feature = simulated_feature(bbox, None, intensity.next_intensity(), meta.target);
    Layer::change(SIM_FALLBACK, LayerStyle::warm(), collection(vec![feature]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intensity::FixedIntensity;

    fn bbox() -> BBox {
        BBox::new(74.80, 12.85, 74.90, 12.95).unwrap()
    }

    #[test]
    fn test_two_distinct_layers() {
        let backend = SimulatedBackend::new(Arc::new(FixedIntensity::new(50)));
        let result = backend.layers(&bbox(), &AnalysisMeta::default());

        assert_eq!(result.layers.len(), 2);
        assert_eq!(result.layers[0].id, "sim-change-1");
        assert_eq!(result.layers[1].id, "sim-change-2");
        assert_ne!(result.layers[0].style, result.layers[1].style);
        assert!(result.is_degraded());
    }

    #[test]
    fn test_fixed_intensity_is_applied() {
        let backend = SimulatedBackend::new(Arc::new(FixedIntensity::new(73)));
        let result = backend.layers(&bbox(), &AnalysisMeta::default());
        let json = serde_json::to_value(&result).unwrap();

        for layer in json["layers"].as_array().unwrap() {
            assert_eq!(layer["geojson"]["features"][0]["properties"]["intensity"], 73);
        }
    }

    #[test]
    fn test_fallback_layer_id() {
        let layer = fallback_layer(&bbox(), &AnalysisMeta::default(), &FixedIntensity::new(0));
        assert_eq!(layer.id, "sim-fallback");
        assert!(layer.is_simulated());
        assert_eq!(layer.geojson.features.len(), 1);
    }
}
