//! EAGLE Inference - Change layers for a bounding box
//!
//! The [`InferenceEngine`] runs a per-pixel classifier from disk when one is
//! present and otherwise synthesizes simulated polygons. Every path returns
//! at least one layer, and every polygon stays inside the queried box.

pub mod engine;
pub mod intensity;
pub mod model;
pub mod simulated;
pub mod synth;
pub mod tensor;

pub use engine::{InferenceEngine, InferenceState};
pub use intensity::{FixedIntensity, IntensitySource, RandomIntensity, SeededIntensity};
pub use model::{ClassShare, LoadedModel, ModelArtifact};
pub use simulated::{fallback_layer, SimulatedBackend};
pub use synth::{polygon_feature, simulated_feature, synthesize_ring};
pub use tensor::{BufferTracker, Tensor};

/// Primary layer when no model artifact exists
pub const SIM_CHANGE_1: &str = "sim-change-1";
/// Secondary, inset layer when no model artifact exists
pub const SIM_CHANGE_2: &str = "sim-change-2";
/// Single layer returned when a model exists but cannot be loaded or run
pub const SIM_FALLBACK: &str = "sim-fallback";
/// Layer produced by a successful model run
pub const MODEL_CHANGE_1: &str = "dw-change-1";
