use eagle_core::models::{AnalysisResult, BBox, GeoLocation, InferenceResult, Layer};
use serde::{Deserialize, Serialize};

/// Message carried by every successful query response
pub const QUERY_PROCESSED: &str = "Query processed";

/// Unified answer to a free-text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub message: String,
    pub analysis_text: String,
    pub bbox: BBox,
    pub place: String,
    pub geojson_layers: Vec<Layer>,
}

impl QueryResponse {
    pub fn assemble(
        geo: GeoLocation,
        analysis: AnalysisResult,
        inference: InferenceResult,
    ) -> Self {
        Self {
            message: QUERY_PROCESSED.to_string(),
            analysis_text: analysis.summary,
            bbox: geo.bbox,
            place: geo.display_name,
            geojson_layers: inference.layers,
        }
    }
}
