// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to sample storage only through
// the SampleStore trait. Two implementations exist:
//
//   - DirSampleStore    → one directory per label on local disk
//   - MemorySampleStore → in-memory fake used by unit tests
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::domain::sample::{Label, Landmarks};

// ─── SampleStore ──────────────────────────────────────────────────────────────
/// Persistent, append-only collection of labelled landmark samples.
///
/// Implementations must be shareable between request handlers,
/// hence the Send + Sync bound.
pub trait SampleStore: Send + Sync {
    /// Persist one sample and return where it was written.
    /// Never overwrites an existing sample.
    fn save(&self, label: &Label, landmarks: &Landmarks) -> Result<PathBuf>;

    /// Number of samples per label, sorted by label.
    /// Labels without samples are reported with 0.
    fn counts(&self) -> Result<BTreeMap<String, usize>>;

    /// All known labels in lexicographic order, including empty ones
    fn labels(&self) -> Result<Vec<String>> {
        Ok(self.counts()?.into_keys().collect())
    }

    /// Every stored sample of one label, in storage order
    fn load_label(&self, label: &str) -> Result<Vec<Landmarks>>;

    /// Width of the first stored sample (labels in sorted order),
    /// or None while the store is empty.
    fn feature_width(&self) -> Result<Option<usize>>;
}
