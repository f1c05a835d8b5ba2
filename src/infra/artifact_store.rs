// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores everything a prediction needs:
//
//   models/
//     landmarks_model.mpk   ← classifier weights (burn record)
//     model_config.json     ← architecture: input width, classes
//     label_map.json        ← class index → label
//
// All three are overwritten wholesale on every training run.
// The weights are only usable together with the config (to
// rebuild the module) and the label map (to name the output),
// so the model counts as trained only when all three exist.
//
// Weights use the named MessagePack recorder at full precision,
// so a reloaded model reproduces the trained outputs exactly.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};

use crate::domain::label_map::LabelMap;
use crate::ml::model::{LandmarkClassifier, LandmarkClassifierConfig};

const MODEL_STEM:     &str = "landmarks_model";
const CONFIG_FILE:    &str = "model_config.json";
const LABEL_MAP_FILE: &str = "label_map.json";

type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open (and create if needed) the models directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create models directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the weights file as written by the recorder
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(format!("{MODEL_STEM}.mpk"))
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn label_map_path(&self) -> PathBuf {
        self.dir.join(LABEL_MAP_FILE)
    }

    /// True once weights, architecture and label map are all on disk
    pub fn is_trained(&self) -> bool {
        self.model_path().is_file()
            && self.config_path().is_file()
            && self.label_map_path().is_file()
    }

    /// Persist a freshly trained model. The label map is written last
    /// since its presence is what marks the artifacts as complete.
    pub fn save<B: Backend>(
        &self,
        model:     &LandmarkClassifier<B>,
        model_cfg: &LandmarkClassifierConfig,
        label_map: &LabelMap,
    ) -> Result<()> {
        self.save_model(model)?;
        self.save_config(model_cfg)?;
        self.save_label_map(label_map)?;
        tracing::info!("Saved model artifacts to '{}'", self.dir.display());
        Ok(())
    }

    pub fn save_model<B: Backend>(&self, model: &LandmarkClassifier<B>) -> Result<()> {
        // The recorder appends the .mpk extension itself
        let path = self.dir.join(MODEL_STEM);
        ModelRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;
        Ok(())
    }

    /// Load weights into a model built from the saved config.
    /// Fails if the architecture does not match the record.
    pub fn load_model<B: Backend>(
        &self,
        model:  LandmarkClassifier<B>,
        device: &B::Device,
    ) -> Result<LandmarkClassifier<B>> {
        let path   = self.dir.join(MODEL_STEM);
        let record = ModelRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load model '{}'. Has the model been trained?", path.display())
            })?;
        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &LandmarkClassifierConfig) -> Result<()> {
        write_json(&self.config_path(), cfg)
    }

    pub fn load_config(&self) -> Result<LandmarkClassifierConfig> {
        read_json(&self.config_path())
    }

    pub fn save_label_map(&self, label_map: &LabelMap) -> Result<()> {
        write_json(&self.label_map_path(), label_map)
    }

    pub fn load_label_map(&self) -> Result<LabelMap> {
        read_json(&self.label_map_path())
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Corrupt file '{}'", path.display()))
}
