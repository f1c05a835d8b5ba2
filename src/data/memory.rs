// In-memory SampleStore used by the application-layer tests.

use anyhow::Result;
use std::{collections::BTreeMap, path::PathBuf, sync::Mutex};

use crate::domain::sample::{Label, Landmarks};
use crate::domain::traits::SampleStore;

#[derive(Default)]
pub struct MemorySampleStore {
    samples: Mutex<BTreeMap<String, Vec<Landmarks>>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label without any samples, like an empty directory on disk
    pub fn add_empty_label(&self, label: &str) {
        self.lock().entry(label.to_string()).or_default();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Landmarks>>> {
        self.samples.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SampleStore for MemorySampleStore {
    fn save(&self, label: &Label, landmarks: &Landmarks) -> Result<PathBuf> {
        let mut samples = self.lock();
        let bucket = samples.entry(label.to_string()).or_default();
        bucket.push(landmarks.clone());
        Ok(PathBuf::from(format!("memory/{label}/{}", bucket.len())))
    }

    fn counts(&self) -> Result<BTreeMap<String, usize>> {
        Ok(self.lock().iter().map(|(l, s)| (l.clone(), s.len())).collect())
    }

    fn load_label(&self, label: &str) -> Result<Vec<Landmarks>> {
        Ok(self.lock().get(label).cloned().unwrap_or_default())
    }

    fn feature_width(&self) -> Result<Option<usize>> {
        Ok(self
            .lock()
            .values()
            .find_map(|samples| samples.first().map(Landmarks::width)))
    }
}
