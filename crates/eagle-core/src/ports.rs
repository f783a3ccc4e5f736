//! Capability ports
//!
//! Each pipeline stage is reached through one of these traits. Every port has
//! an always-available offline implementation, and a networked or
//! model-backed one chosen from [`AppConfig`](crate::config::AppConfig) at
//! startup.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AnalysisMeta, AnalysisResult, BBox, GeoLocation, InferenceResult};

/// Port for resolving free text to a location
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a location phrase
    ///
    /// # Returns
    /// The best match, or `EagleError::LocationNotFound` when the backend has
    /// no match for `text`
    async fn geocode(&self, text: &str) -> Result<GeoLocation>;

    /// Short backend identifier used in logs
    fn name(&self) -> &str;
}

/// Port for turning a query into a structured analysis
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze `text` for the already-resolved `geo`.
    ///
    /// Implementations never fail; any upstream problem yields a degraded
    /// result instead.
    async fn analyze(&self, text: &str, geo: &GeoLocation) -> AnalysisResult;

    fn name(&self) -> &str;
}

/// Port for producing change layers over a bounding box
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Produce at least one layer for `bbox`. Never fails.
    async fn infer(&self, bbox: &BBox, meta: &AnalysisMeta) -> InferenceResult;

    fn name(&self) -> &str;
}
