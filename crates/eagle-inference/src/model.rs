//! Model artifact loading and execution.
//!
//! An artifact is a JSON per-pixel linear classifier:
//!
//! ```json
//! {
//!   "name": "dynamicworld",
//!   "inputShape": [256, 256, 3],
//!   "classes": ["water", "trees", "built"],
//!   "weights": [[0.1, 0.2, 0.3], [0.0, 1.0, 0.0], [0.5, 0.5, 0.5]],
//!   "bias": [0.0, 0.0, 0.0]
//! }
//! ```

use std::path::Path;

use eagle_core::{EagleError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::tensor::{BufferTracker, Tensor};

/// Largest accepted height or width of the input raster
pub const MAX_INPUT_SIDE: usize = 1024;

/// Largest accepted channel count
pub const MAX_CHANNELS: usize = 64;

/// On-disk model description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifact {
    pub name: String,
    /// `[height, width, channels]`
    pub input_shape: [usize; 3],
    pub classes: Vec<String>,
    /// `[channels][classes]`
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl ModelArtifact {
    /// Check that every dimension agrees with every other
    pub fn validate(&self) -> Result<()> {
        let [height, width, channels] = self.input_shape;
        let invalid = |reason: String| Err(EagleError::ModelInvalid { reason });

        if height == 0 || width == 0 || channels == 0 {
            return invalid(format!("input shape {:?} has an empty axis", self.input_shape));
        }
        if height > MAX_INPUT_SIDE || width > MAX_INPUT_SIDE || channels > MAX_CHANNELS {
            return invalid(format!("input shape {:?} is too large", self.input_shape));
        }
        if self.classes.len() < 2 {
            return invalid(format!("need at least 2 classes, found {}", self.classes.len()));
        }
        if self.bias.len() != self.classes.len() {
            return invalid(format!(
                "bias has {} entries for {} classes",
                self.bias.len(),
                self.classes.len()
            ));
        }
        if self.weights.len() != channels {
            return invalid(format!(
                "weights have {} rows for {} channels",
                self.weights.len(),
                channels
            ));
        }
        if let Some(row) = self.weights.iter().position(|r| r.len() != self.classes.len()) {
            return invalid(format!("weight row {row} does not have one entry per class"));
        }
        let finite = self.weights.iter().flatten().chain(&self.bias).all(|v| v.is_finite());
        if !finite {
            return invalid("weights contain non-finite values".to_string());
        }
        Ok(())
    }
}

/// Pixel share of one predicted class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassShare {
    pub label: String,
    pub pixels: usize,
    /// Share of all pixels, rounded, `0..=100`
    pub percent: u8,
}

/// A validated artifact ready to run
#[derive(Debug, Clone)]
pub struct LoadedModel {
    artifact: ModelArtifact,
}

impl LoadedModel {
    /// Read and validate the artifact at `path`
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EagleError::ModelUnavailable { path: path.to_path_buf() });
            }
            Err(e) => return Err(EagleError::Io(e)),
        };

        let artifact: ModelArtifact =
            serde_json::from_str(&content).map_err(|e| EagleError::ModelInvalid {
                reason: format!("{}: {}", path.display(), e),
            })?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    pub fn classes(&self) -> &[String] {
        &self.artifact.classes
    }

    /// Batched input shape `[1, h, w, c]`
    pub fn batch_shape(&self) -> Vec<usize> {
        let [h, w, c] = self.artifact.input_shape;
        vec![1, h, w, c]
    }

    /// Per-pixel class logits `[1, h, w, k]` for an input `[1, h, w, c]`
    pub fn predict(&self, input: &Tensor) -> Result<Tensor> {
        if input.shape() != self.batch_shape().as_slice() {
            return Err(EagleError::ModelInvalid {
                reason: format!(
                    "input shape {:?} does not match model shape {:?}",
                    input.shape(),
                    self.batch_shape()
                ),
            });
        }
        input.dense(&self.artifact.weights, &self.artifact.bias)
    }

    /// Run on a random placeholder raster and rank classes by pixel count.
    ///
    /// Returns the `top` most frequent classes, most frequent first. Every
    /// buffer allocated here is released before returning.
    pub fn run(
        &self,
        seed: Option<u64>,
        top: usize,
        tracker: &BufferTracker,
    ) -> Result<Vec<ClassShare>> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let input = Tensor::random_uniform(self.batch_shape(), &mut rng, tracker)?;
        let logits = self.predict(&input)?;
        let predicted = logits.argmax_last()?;
        logits.release();
        input.release();

        let mut counts = vec![0usize; self.classes().len()];
        for class in &predicted {
            if let Some(count) = counts.get_mut(*class) {
                *count += 1;
            }
        }

        let total = predicted.len().max(1);
        let mut ranked: Vec<(usize, usize)> = counts.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        Ok(ranked
            .into_iter()
            .take(top)
            .map(|(class, pixels)| ClassShare {
                label: self.artifact.classes[class].clone(),
                pixels,
                percent: ((pixels * 100 + total / 2) / total).min(100) as u8,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class_artifact() -> ModelArtifact {
        ModelArtifact {
            name: "toy".to_string(),
            input_shape: [4, 4, 2],
            classes: vec!["stable".to_string(), "changed".to_string()],
            weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            bias: vec![0.0, 0.0],
        }
    }

    #[test]
    fn test_artifact_deserializes_camel_case() {
        let json = r#"{
            "name": "dw",
            "inputShape": [2, 2, 1],
            "classes": ["a", "b"],
            "weights": [[0.5, -0.5]],
            "bias": [0.0, 0.1]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.input_shape, [2, 2, 1]);
        assert!(artifact.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_single_class() {
        let mut artifact = two_class_artifact();
        artifact.classes.truncate(1);
        artifact.bias.truncate(1);
        artifact.weights = vec![vec![1.0], vec![1.0]];
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_mismatched_weights() {
        let mut artifact = two_class_artifact();
        artifact.weights.push(vec![0.0, 0.0]);
        let err = artifact.validate().unwrap_err();
        assert!(err.to_string().contains("3 rows for 2 channels"));
    }

    #[test]
    fn test_validate_rejects_huge_input() {
        let mut artifact = two_class_artifact();
        artifact.input_shape = [4096, 4096, 2];
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_run_releases_buffers_and_ranks() {
        let model = LoadedModel::from_artifact(two_class_artifact()).unwrap();
        let tracker = BufferTracker::new();

        let shares = model.run(Some(3), 2, &tracker).unwrap();
        assert_eq!(tracker.live(), 0);
        assert_eq!(shares.len(), 2);
        assert!(shares[0].pixels >= shares[1].pixels);
        assert_eq!(shares[0].pixels + shares[1].pixels, 16);
    }

    #[test]
    fn test_run_is_reproducible_with_seed() {
        let model = LoadedModel::from_artifact(two_class_artifact()).unwrap();
        let tracker = BufferTracker::new();
        assert_eq!(
            model.run(Some(11), 2, &tracker).unwrap(),
            model.run(Some(11), 2, &tracker).unwrap()
        );
    }

    #[test]
    fn test_dominant_class_wins() {
        let mut artifact = two_class_artifact();
        artifact.bias = vec![0.0, 10.0];
        let model = LoadedModel::from_artifact(artifact).unwrap();

        let shares = model.run(None, 2, &BufferTracker::new()).unwrap();
        assert_eq!(shares[0].label, "changed");
        assert_eq!(shares[0].percent, 100);
        assert_eq!(shares[1].percent, 0);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = LoadedModel::load(Path::new("/nonexistent/eagle/model.json")).await.unwrap_err();
        assert!(matches!(err, EagleError::ModelUnavailable { .. }));
    }
}
