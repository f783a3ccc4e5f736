//! Dense `f32` buffers with scoped release.
//!
//! Every [`Tensor`] is registered with a [`BufferTracker`] for as long as it
//! is alive. Callers release tensors explicitly once they are done; `Drop`
//! covers early returns and unwinding, so the live count returns to zero on
//! every exit path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use eagle_core::{EagleError, Result};
use rand::Rng;

/// Shared counter of live tensor buffers
#[derive(Debug, Clone, Default)]
pub struct BufferTracker {
    live: Arc<AtomicUsize>,
}

impl BufferTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffers currently allocated through this tracker
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn acquire(&self) {
        self.live.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Row-major n-dimensional buffer
#[derive(Debug)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
    tracker: BufferTracker,
}

impl Tensor {
    /// Wrap `data`, checking it matches `shape`
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>, tracker: &BufferTracker) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(EagleError::ModelInvalid {
                reason: format!(
                    "buffer of {} values does not fit shape {:?}",
                    data.len(),
                    shape
                ),
            });
        }
        tracker.acquire();
        Ok(Self { shape, data, tracker: tracker.clone() })
    }

    pub fn zeros(shape: Vec<usize>, tracker: &BufferTracker) -> Result<Self> {
        let len = shape.iter().product();
        Self::from_vec(shape, vec![0.0; len], tracker)
    }

    /// Values drawn uniformly from `[0, 1)`
    pub fn random_uniform<R: Rng + ?Sized>(
        shape: Vec<usize>,
        rng: &mut R,
        tracker: &BufferTracker,
    ) -> Result<Self> {
        let len = shape.iter().product();
        let data = (0..len).map(|_| rng.gen::<f32>()).collect();
        Self::from_vec(shape, data, tracker)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    fn last_dim(&self) -> Result<usize> {
        match self.shape.last() {
            Some(&dim) if dim > 0 => Ok(dim),
            _ => Err(EagleError::ModelInvalid {
                reason: format!("tensor shape {:?} has no class axis", self.shape),
            }),
        }
    }

    /// Apply `x · W + b` along the last axis.
    ///
    /// `weights` is `[c][k]` for an input whose last axis has size `c`; the
    /// result has the same leading axes and a last axis of size `k`.
    pub fn dense(&self, weights: &[Vec<f32>], bias: &[f32]) -> Result<Tensor> {
        let c = self.last_dim()?;
        let k = bias.len();
        if weights.len() != c || weights.iter().any(|row| row.len() != k) {
            return Err(EagleError::ModelInvalid {
                reason: format!("weights do not map {c} channels to {k} classes"),
            });
        }

        let mut out = Vec::with_capacity(self.data.len() / c * k);
        for pixel in self.data.chunks_exact(c) {
            let mut logits = bias.to_vec();
            for (value, row) in pixel.iter().zip(weights) {
                for (logit, w) in logits.iter_mut().zip(row) {
                    *logit += value * w;
                }
            }
            out.extend(logits);
        }

        let mut shape = self.shape.clone();
        if let Some(last) = shape.last_mut() {
            *last = k;
        }
        Tensor::from_vec(shape, out, &self.tracker)
    }

    /// Index of the maximum along the last axis, one entry per leading position.
    ///
    /// Ties resolve to the lowest index; NaN never wins.
    pub fn argmax_last(&self) -> Result<Vec<usize>> {
        let k = self.last_dim()?;
        Ok(self
            .data
            .chunks_exact(k)
            .map(|row| {
                let mut best = 0;
                for (i, value) in row.iter().enumerate() {
                    if *value > row[best] || row[best].is_nan() {
                        best = i;
                    }
                }
                best
            })
            .collect())
    }

    /// Free the buffer now
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Tensor {
    fn drop(&mut self) {
        self.tracker.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shape_mismatch_rejected() {
        let tracker = BufferTracker::new();
        let err = Tensor::from_vec(vec![2, 2], vec![1.0; 3], &tracker).unwrap_err();
        assert!(matches!(err, EagleError::ModelInvalid { .. }));
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_tracker_counts_live_buffers() {
        let tracker = BufferTracker::new();
        let a = Tensor::zeros(vec![1, 2, 2, 3], &tracker).unwrap();
        let b = Tensor::zeros(vec![4], &tracker).unwrap();
        assert_eq!(tracker.live(), 2);

        a.release();
        assert_eq!(tracker.live(), 1);
        drop(b);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_dense_and_argmax() {
        let tracker = BufferTracker::new();
        // two pixels, two channels
        let input = Tensor::from_vec(vec![1, 1, 2, 2], vec![1.0, 0.0, 0.0, 1.0], &tracker).unwrap();
        let weights = vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 2.0]];
        let bias = vec![0.0, 0.5, 0.0];

        let logits = input.dense(&weights, &bias).unwrap();
        assert_eq!(logits.shape(), &[1, 1, 2, 3]);
        assert_eq!(logits.data(), &[1.0, 0.5, 0.0, 0.0, 0.5, 2.0]);
        assert_eq!(logits.argmax_last().unwrap(), vec![0, 2]);

        logits.release();
        input.release();
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_dense_rejects_bad_weights() {
        let tracker = BufferTracker::new();
        let input = Tensor::zeros(vec![1, 2, 2, 3], &tracker).unwrap();
        assert!(input.dense(&[vec![1.0, 2.0]], &[0.0, 0.0]).is_err());
        drop(input);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_argmax_ties_pick_first() {
        let tracker = BufferTracker::new();
        let t = Tensor::from_vec(vec![2, 2], vec![1.0, 1.0, f32::NAN, 0.0], &tracker).unwrap();
        assert_eq!(t.argmax_last().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_random_uniform_range() {
        let tracker = BufferTracker::new();
        let mut rng = StdRng::seed_from_u64(1);
        let t = Tensor::random_uniform(vec![8, 8, 3], &mut rng, &tracker).unwrap();
        assert_eq!(t.data().len(), 192);
        assert!(t.data().iter().all(|v| (0.0..1.0).contains(v)));
    }
}
