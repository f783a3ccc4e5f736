use std::sync::Arc;

use eagle_core::config::AppConfig;
use eagle_core::models::{AnalysisMeta, BBox, InferenceResult};
use eagle_core::ports::{Analyzer, Geocoder, InferenceBackend};
use eagle_core::Result;
use eagle_geo::{FallbackGeocoder, GeoLocator};
use eagle_inference::InferenceEngine;
use eagle_llm::{analyzer_from_config, TemplateAnalyzer};

use crate::location::extract_location_phrase;
use crate::response::QueryResponse;

/// Runs location → analysis → inference for one query
#[derive(Clone)]
pub struct QueryOrchestrator {
    locator: GeoLocator,
    analyzer: Arc<dyn Analyzer>,
    inference: Arc<dyn InferenceBackend>,
}

impl QueryOrchestrator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        analyzer: Arc<dyn Analyzer>,
        inference: Arc<dyn InferenceBackend>,
    ) -> Self {
        Self { locator: GeoLocator::new(geocoder), analyzer, inference }
    }

    /// Wire the backends selected by `config`
    pub fn from_config(config: &AppConfig) -> Self {
        let locator = GeoLocator::from_config(config);
        let analyzer = analyzer_from_config(config);
        let inference = Arc::new(InferenceEngine::from_config(config));

        tracing::info!(
            geocoder = locator.backend_name(),
            analyzer = analyzer.name(),
            inference = inference.name(),
            "Query pipeline ready"
        );

        Self { locator, analyzer, inference }
    }

    /// Network-free pipeline: fallback geocoder and templated analysis
    pub fn offline(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(FallbackGeocoder::new()),
            Arc::new(TemplateAnalyzer::new()),
            Arc::new(InferenceEngine::from_config(config)),
        )
    }

    pub fn geocoder_name(&self) -> &str {
        self.locator.backend_name()
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub fn inference_name(&self) -> &str {
        self.inference.name()
    }

    /// Answer a free-text query.
    ///
    /// Only geocoding can fail; analysis and inference degrade instead.
    pub async fn run(&self, text: &str) -> Result<QueryResponse> {
        let phrase = extract_location_phrase(text);
        tracing::debug!(phrase = %phrase, "Location phrase extracted");

        let geo = self.locator.locate(phrase).await?;
        let analysis = self.analyzer.analyze(text, &geo).await;
        if analysis.degraded {
            tracing::warn!(analyzer = self.analyzer.name(), "Analysis degraded");
        }

        let inference = self.inference.infer(&geo.bbox, &analysis.meta()).await;
        if inference.is_degraded() {
            tracing::warn!(layer_count = inference.layers.len(), "Inference degraded");
        }

        tracing::info!(
            place = %geo.display_name,
            target = %analysis.target,
            layer_count = inference.layers.len(),
            "Query processed"
        );

        Ok(QueryResponse::assemble(geo, analysis, inference))
    }

    /// Compute layers for a bbox the caller already knows
    pub async fn run_inference_only(&self, bbox: &BBox, meta: &AnalysisMeta) -> InferenceResult {
        self.inference.infer(bbox, meta).await
    }
}
