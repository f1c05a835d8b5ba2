// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the files on disk and the tensors the
// training loop consumes:
//
//   landmarks/<label>/*.json
//       │
//       ▼
//   DirSampleStore    → reads/writes one JSON file per sample
//       │
//       ▼
//   LandmarkDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   LandmarkBatcher   → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds shuffled batches to the trainer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Directory-backed SampleStore
pub mod sample_dir;

/// Implements Burn's Dataset trait for landmark rows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// In-memory SampleStore for tests
#[cfg(test)]
pub mod memory;
