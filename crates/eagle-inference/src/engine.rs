//! Inference state machine
//!
//! ```text
//! probe ─┬─ absent ──► NoModel ───────────────────────────► Done (sim-change-1, sim-change-2)
//!        └─ present ─► ModelLoad ─┬─ ok ──► ModelRun ─┬─ ok ► Done (dw-change-1)
//!                                 └─ err ─► Fallback ◄┘ err
//!                                           └──────────────► Done (sim-fallback)
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use eagle_core::config::AppConfig;
use eagle_core::models::{AnalysisMeta, BBox, InferenceResult, Layer, LayerStyle};
use eagle_core::ports::InferenceBackend;
use eagle_core::{EagleError, Result};

use crate::intensity::{IntensitySource, RandomIntensity};
use crate::model::LoadedModel;
use crate::simulated::{fallback_layer, SimulatedBackend, SECONDARY_INSET};
use crate::synth::{collection, polygon_feature, synthesize_ring};
use crate::tensor::BufferTracker;
use crate::MODEL_CHANGE_1;

/// Number of polygon features emitted by a model run
const MODEL_FEATURES: usize = 2;

/// Per-call inference state
#[derive(Debug)]
pub enum InferenceState {
    NoModel,
    ModelLoad,
    ModelRun(LoadedModel),
    Fallback(EagleError),
    Done(InferenceResult),
}

impl InferenceState {
    fn label(&self) -> &'static str {
        match self {
            InferenceState::NoModel => "no_model",
            InferenceState::ModelLoad => "model_load",
            InferenceState::ModelRun(_) => "model_run",
            InferenceState::Fallback(_) => "fallback",
            InferenceState::Done(_) => "done",
        }
    }
}

/// Model-backed inference with simulated fallbacks.
///
/// The artifact is probed and loaded on every call, so placing or removing a
/// model file takes effect on the next request. Concurrent cold calls each
/// load their own copy.
#[derive(Clone)]
pub struct InferenceEngine {
    model_path: PathBuf,
    intensity: Arc<dyn IntensitySource>,
    simulated: SimulatedBackend,
    tracker: BufferTracker,
    input_seed: Option<u64>,
}

impl InferenceEngine {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        let intensity: Arc<dyn IntensitySource> = Arc::new(RandomIntensity);
        Self {
            model_path: model_path.into(),
            simulated: SimulatedBackend::new(intensity.clone()),
            intensity,
            tracker: BufferTracker::new(),
            input_seed: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let engine = Self::new(config.model_path());
        tracing::info!(model_path = %engine.model_path.display(), "Inference engine configured");
        engine
    }

    /// Replace the intensity source used by simulated layers
    pub fn with_intensity(mut self, intensity: Arc<dyn IntensitySource>) -> Self {
        self.simulated = SimulatedBackend::new(intensity.clone());
        self.intensity = intensity;
        self
    }

    /// Seed the placeholder raster so model runs are reproducible
    pub fn with_input_seed(mut self, seed: u64) -> Self {
        self.input_seed = Some(seed);
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Tracker for the numeric buffers allocated by model runs
    pub fn tracker(&self) -> &BufferTracker {
        &self.tracker
    }

    /// Whether a model artifact currently exists on disk
    pub async fn model_present(&self) -> bool {
        tokio::fs::try_exists(&self.model_path).await.unwrap_or(false)
    }

    /// Produce layers for `bbox`. Always returns at least one layer.
    pub async fn run(&self, bbox: &BBox, meta: &AnalysisMeta) -> InferenceResult {
        let mut state = if self.model_present().await {
            InferenceState::ModelLoad
        } else {
            InferenceState::NoModel
        };

        loop {
            tracing::debug!(state = state.label(), "Inference step");
            state = match state {
                InferenceState::NoModel => {
                    tracing::info!(
                        model_path = %self.model_path.display(),
                        "No model artifact; returning simulated layers"
                    );
                    InferenceState::Done(self.simulated.layers(bbox, meta))
                }
                InferenceState::ModelLoad => match LoadedModel::load(&self.model_path).await {
                    Ok(model) => {
                        tracing::info!(model = model.name(), "Model loaded");
                        InferenceState::ModelRun(model)
                    }
                    Err(e) => InferenceState::Fallback(e),
                },
                InferenceState::ModelRun(model) => match self.run_model(model, bbox, meta).await {
                    Ok(layer) => InferenceState::Done(InferenceResult::new(vec![layer])),
                    Err(e) => InferenceState::Fallback(e),
                },
                InferenceState::Fallback(error) => {
                    tracing::warn!(
                        error = %error,
                        model_path = %self.model_path.display(),
                        "Model inference failed; returning fallback layer"
                    );
                    InferenceState::Done(InferenceResult::new(vec![fallback_layer(
                        bbox,
                        meta,
                        self.intensity.as_ref(),
                    )]))
                }
                InferenceState::Done(result) => {
                    tracing::info!(
                        layer_count = result.layers.len(),
                        degraded = result.is_degraded(),
                        "Inference complete"
                    );
                    return result;
                }
            };
        }
    }

    async fn run_model(
        &self,
        model: LoadedModel,
        bbox: &BBox,
        meta: &AnalysisMeta,
    ) -> Result<Layer> {
        let seed = self.input_seed;
        let tracker = self.tracker.clone();
        let shares = tokio::task::spawn_blocking(move || model.run(seed, MODEL_FEATURES, &tracker))
            .await
            .map_err(|e| EagleError::ModelInvalid { reason: format!("model run aborted: {e}") })??;

        if shares.len() < MODEL_FEATURES {
            return Err(EagleError::ModelInvalid {
                reason: format!("expected {MODEL_FEATURES} classes, got {}", shares.len()),
            });
        }

        let insets = [None, Some(SECONDARY_INSET)];
        let features = shares
            .iter()
            .zip(insets)
            .map(|(share, inset)| {
                let ring = synthesize_ring(bbox, inset);
                polygon_feature(ring, &share.label, share.percent, meta.target)
            })
            .collect();

        Ok(Layer::change(MODEL_CHANGE_1, LayerStyle::warm(), collection(features)))
    }
}

#[async_trait]
impl InferenceBackend for InferenceEngine {
    async fn infer(&self, bbox: &BBox, meta: &AnalysisMeta) -> InferenceResult {
        self.run(bbox, meta).await
    }

    fn name(&self) -> &str {
        "engine"
    }
}
