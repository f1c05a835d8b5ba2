// ============================================================
// Layer 4 — Landmark Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<LandmarkSample>
// into tensors for one optimiser step.
//
//   Input:  N samples, each with a feature vector of width W
//   Output: features [N, W] (float), targets [N] (int)
//
// All rows share the same width (checked by the train use case
// before the dataset is built), so the feature vectors can be
// concatenated and reshaped without padding.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::LandmarkSample;

// ─── LandmarkBatch ────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct LandmarkBatch<B: Backend> {
    /// Flattened landmark vectors — shape: [batch_size, width]
    pub features: Tensor<B, 2>,

    /// Class indices — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── LandmarkBatcher ──────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct LandmarkBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> LandmarkBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<LandmarkSample, LandmarkBatch<B>> for LandmarkBatcher<B> {
    fn batch(&self, items: Vec<LandmarkSample>) -> LandmarkBatch<B> {
        let batch_size = items.len();
        let width      = items.first().map(|s| s.features.len()).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let targets: Vec<i64> = items.iter().map(|s| s.target as i64).collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, width]),
            &self.device,
        );
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(targets, [batch_size]),
            &self.device,
        );

        LandmarkBatch { features, targets }
    }
}
