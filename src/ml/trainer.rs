// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fits the landmark classifier with Burn's DataLoader and Adam.
//
//   - Training runs on TrainBackend (Autodiff<NdArray>) so
//     gradients are tracked and dropout is active
//   - model.valid() moves the fitted weights to InferBackend
//     (NdArray) for saving and inference
//   - argmax(1) returns [batch, 1], reshaped to [batch] before
//     comparing with the targets
//
// There is no validation split: the loss and accuracy reported
// per epoch are measured on the training batches themselves.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::LandmarkBatcher, dataset::LandmarkDataset};
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::{LandmarkClassifier, LandmarkClassifierConfig};
use crate::ml::{InferBackend, TrainBackend};

/// The fitted model (already on the inference backend) and its
/// per-epoch training history.
pub struct TrainedModel {
    pub model:   LandmarkClassifier<InferBackend>,
    pub history: Vec<EpochMetrics>,
}

impl TrainedModel {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

pub fn run_training(
    cfg:       &TrainConfig,
    model_cfg: &LandmarkClassifierConfig,
    dataset:   LandmarkDataset,
) -> Result<TrainedModel> {
    ensure!(dataset.sample_count() > 0, "No training samples");
    ensure!(cfg.batch_size > 0, "Batch size must be positive");

    let device: <TrainBackend as Backend>::Device = Default::default();
    <TrainBackend as Backend>::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: LandmarkClassifier<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} → {} → {} → {} ({} samples)",
        model_cfg.input_width, model_cfg.hidden_1, model_cfg.hidden_2,
        model_cfg.num_classes, dataset.sample_count(),
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-7);
    let mut optim = optim_cfg.init();

    // ── Data loader (reshuffled every epoch) ──────────────────────────────────
    let batcher = LandmarkBatcher::<TrainBackend>::new(device.clone());
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in loader.iter() {
            let batch_size = batch.targets.dims()[0];
            let (loss, logits) = model.forward_loss(batch.features, batch.targets.clone());

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let predicted = logits.argmax(1).reshape([batch_size]);
            let hits: i64 = predicted
                .equal(batch.targets)
                .int().sum().into_scalar().elem::<i64>();
            correct += hits as usize;
            seen    += batch_size;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let metrics = EpochMetrics::new(
            epoch,
            if batches > 0 { loss_sum / batches as f64 } else { f64::NAN },
            if seen    > 0 { correct as f64 / seen as f64 } else { 0.0 },
        );
        tracing::info!(
            "Epoch {:>3}/{} | loss={:.4} | accuracy={:.1}%",
            epoch, cfg.epochs, metrics.loss, metrics.accuracy * 100.0,
        );
        history.push(metrics);
    }

    Ok(TrainedModel { model: model.valid(), history })
}
