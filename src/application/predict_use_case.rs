// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Classifies one landmark vector with the latest trained model.
//
// Artifacts are read from disk on every call: there is no model
// cache, so a retrain is picked up by the very next request.

use crate::domain::{
    error::{ServiceError, ServiceResult},
    sample::Landmarks,
};
use crate::infra::artifact_store::ArtifactStore;
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label:      String,
    /// Raw softmax probability of the chosen class
    pub confidence: f32,
}

pub struct PredictUseCase<'a> {
    artifacts: &'a ArtifactStore,
}

impl<'a> PredictUseCase<'a> {
    pub fn new(artifacts: &'a ArtifactStore) -> Self {
        Self { artifacts }
    }

    pub fn execute(&self, landmarks: &Landmarks) -> ServiceResult<Prediction> {
        if !self.artifacts.is_trained() {
            return Err(ServiceError::NotTrained);
        }

        let label_map  = self.artifacts.load_label_map()?;
        let inferencer = Inferencer::from_artifacts(self.artifacts)?;

        if landmarks.width() != inferencer.input_width() {
            return Err(ServiceError::ShapeMismatch {
                expected: inferencer.input_width(),
                actual:   landmarks.width(),
            });
        }

        let (index, confidence) = inferencer.predict(landmarks.as_slice())?;
        let label = label_map.label_for(index);
        tracing::info!("Predicted '{}' ({:.1}%)", label, confidence * 100.0);

        Ok(Prediction { label, confidence })
    }
}
