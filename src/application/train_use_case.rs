// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Count samples per label       (Layer 4 - data)
//   Step 2: Check the ≥ 2 labels rule     (Layer 3 - domain)
//   Step 3: Fix the label map             (Layer 3 - domain)
//   Step 4: Load and flatten all samples  (Layer 4 - data)
//   Step 5: Check every row has one width (Layer 3 - domain)
//   Step 6: Run the training loop         (Layer 5 - ml)
//   Step 7: Save model + label map        (Layer 6 - infra)
//   Step 8: Write the metrics CSV         (Layer 6 - infra)
//
// Steps 2 and 5 fail before anything is written, so a rejected
// training request never touches the previous model.
//
// Reference: Burn Book §5 (Training)

use serde::{Deserialize, Serialize};

use crate::data::dataset::{LandmarkDataset, LandmarkSample};
use crate::domain::{
    error::{ServiceError, ServiceResult},
    label_map::LabelMap,
    traits::SampleStore,
};
use crate::infra::{
    artifact_store::ArtifactStore,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::LandmarkClassifierConfig;
use crate::ml::trainer::run_training;

/// Minimum number of labels that must hold samples before training
pub const MIN_POPULATED_LABELS: usize = 2;

// ─── Training Configuration ──────────────────────────────────────────────────
// Optimisation settings for a training run. The architecture
// itself is fixed (see LandmarkClassifierConfig); only the
// input width and class count depend on the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs:     usize,
    pub batch_size: usize,
    pub lr:         f64,
    /// Seeds weight initialisation and the per-epoch shuffle
    pub seed:       u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs:     30,
            batch_size: 16,
            lr:         1e-3,
            seed:       42,
        }
    }
}

/// What a successful run hands back to the caller
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub label_map: LabelMap,
    pub history:   Vec<EpochMetrics>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase<'a> {
    store:     &'a dyn SampleStore,
    artifacts: &'a ArtifactStore,
    config:    TrainConfig,
}

impl<'a> TrainUseCase<'a> {
    pub fn new(store: &'a dyn SampleStore, artifacts: &'a ArtifactStore, config: TrainConfig) -> Self {
        Self { store, artifacts, config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> ServiceResult<TrainOutcome> {
        // ── Step 1-2: Enough populated labels? ────────────────────────────────
        let counts    = self.store.counts()?;
        let populated = counts.values().filter(|&&n| n > 0).count();
        if populated < MIN_POPULATED_LABELS {
            tracing::warn!("Refusing to train: {} populated label(s)", populated);
            return Err(ServiceError::NotEnoughLabels);
        }

        // ── Step 3: Label map over every label, empty ones included ───────────
        // An empty label keeps its index but contributes no rows.
        let label_map = LabelMap::from_labels(self.store.labels()?);

        // ── Step 4-5: Flatten samples, enforce a single width ─────────────────
        let samples = self.collect_rows(&label_map)?;
        let width   = samples[0].features.len();
        tracing::info!(
            "Training on {} samples of width {} across {} labels",
            samples.len(), width, label_map.len(),
        );

        // ── Step 6: Fit ───────────────────────────────────────────────────────
        let model_cfg = LandmarkClassifierConfig::new(width, label_map.len());
        let trained   = run_training(&self.config, &model_cfg, LandmarkDataset::new(samples))?;

        // ── Step 7-8: Persist ─────────────────────────────────────────────────
        self.artifacts.save(&trained.model, &model_cfg, &label_map)?;
        let metrics = MetricsLogger::create(self.artifacts.dir())?;
        metrics.log_all(&trained.history)?;
        tracing::info!("Training metrics written to '{}'", metrics.csv_path().display());

        if let Some(last) = trained.final_metrics() {
            tracing::info!(
                "Training complete: loss={:.4}, training accuracy={:.1}%",
                last.loss, last.accuracy * 100.0,
            );
        }

        Ok(TrainOutcome { label_map, history: trained.history })
    }

    fn collect_rows(&self, label_map: &LabelMap) -> ServiceResult<Vec<LandmarkSample>> {
        let mut rows: Vec<LandmarkSample> = Vec::new();
        let mut expected: Option<usize>   = None;

        for (index, label) in label_map.iter() {
            for landmarks in self.store.load_label(label)? {
                let width = landmarks.width();
                match expected {
                    None => expected = Some(width),
                    Some(w) if w != width => {
                        return Err(ServiceError::validation(format!(
                            "a sample of label '{label}' has {width} values but {w} were expected"
                        )));
                    }
                    Some(_) => {}
                }
                rows.push(LandmarkSample { features: landmarks.values, target: index });
            }
        }

        if rows.is_empty() {
            return Err(ServiceError::NotEnoughLabels);
        }
        Ok(rows)
    }
}
