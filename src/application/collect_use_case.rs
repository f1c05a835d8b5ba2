// ============================================================
// Layer 2 — Collect Use Case
// ============================================================
// Sample collection and the per-label counts shown to the
// person recording gestures.
//
// Every stored sample must have the same width as the ones
// already on disk; the first sample ever stored fixes it. This
// keeps a bad upload from surfacing later as a failed training.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::{
    error::{ServiceError, ServiceResult},
    sample::{Label, Landmarks},
    traits::SampleStore,
};

pub struct CollectUseCase<'a> {
    store: &'a dyn SampleStore,
}

impl<'a> CollectUseCase<'a> {
    pub fn new(store: &'a dyn SampleStore) -> Self {
        Self { store }
    }

    /// Store one labelled sample and return where it was written
    pub fn upload(&self, label: &Label, landmarks: &Landmarks) -> ServiceResult<PathBuf> {
        if let Some(expected) = self.store.feature_width()? {
            if expected != landmarks.width() {
                return Err(ServiceError::ShapeMismatch {
                    expected,
                    actual: landmarks.width(),
                });
            }
        }

        let path = self.store.save(label, landmarks)?;
        tracing::info!("Stored sample for '{}' ({} values)", label, landmarks.width());
        Ok(path)
    }

    /// Samples per label, labels in sorted order
    pub fn counts(&self) -> ServiceResult<BTreeMap<String, usize>> {
        Ok(self.store.counts()?)
    }
}
