//! Request-scoped value objects produced and consumed by the pipeline stages.

pub mod analysis;
pub mod geometry;
pub mod layer;

pub use analysis::{parse_date_lenient, AnalysisMeta, AnalysisResult, ChangeTarget, DateBound};
pub use geometry::{BBox, GeoLocation, DEFAULT_BBOX_PAD};
pub use layer::{InferenceResult, Layer, LayerKind, LayerStyle, SIMULATED_LAYER_PREFIX};
