// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{ensure, Context, Result};
use burn::prelude::*;

use crate::infra::artifact_store::ArtifactStore;
use crate::ml::model::LandmarkClassifier;
use crate::ml::InferBackend;

pub struct Inferencer {
    model:       LandmarkClassifier<InferBackend>,
    input_width: usize,
    device:      <InferBackend as Backend>::Device,
}

impl Inferencer {
    pub fn new(model: LandmarkClassifier<InferBackend>, input_width: usize) -> Self {
        Self { model, input_width, device: Default::default() }
    }

    /// Rebuild the architecture from the saved sidecar, then load the weights
    pub fn from_artifacts(artifacts: &ArtifactStore) -> Result<Self> {
        let device    = Default::default();
        let model_cfg = artifacts.load_config()?;
        let model: LandmarkClassifier<InferBackend> = model_cfg.init(&device);
        let model = artifacts.load_model(model, &device)?;
        tracing::debug!(
            "Model loaded: input_width={}, classes={}",
            model_cfg.input_width, model_cfg.num_classes,
        );
        Ok(Self { model, input_width: model_cfg.input_width, device })
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Softmax output for one flattened landmark vector
    pub fn probabilities(&self, features: &[f32]) -> Result<Vec<f32>> {
        ensure!(
            features.len() == self.input_width,
            "Model expects {} values, got {}",
            self.input_width,
            features.len()
        );

        let input = Tensor::<InferBackend, 2>::from_data(
            TensorData::new(features.to_vec(), [1, features.len()]),
            &self.device,
        );
        self.model
            .forward_probs(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read model output: {e:?}"))
    }

    /// (class index, probability) of the most likely class.
    /// Ties resolve to the lowest index.
    pub fn predict(&self, features: &[f32]) -> Result<(usize, f32)> {
        let probs = self.probabilities(features)?;
        let best = probs
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
                Some((_, top)) if top >= p => best,
                _ => Some((i, p)),
            })
            .context("Model produced no outputs")?;

        tracing::debug!("Predicted class {} with p={:.4}", best.0, best.1);
        Ok(best)
    }
}
