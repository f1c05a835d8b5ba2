// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Persistence that belongs to no single business layer:
//
//   artifact_store.rs — Model weights, architecture sidecar and
//                       label map. Written by training, read on
//                       every prediction.
//
//   metrics.rs        — Per-epoch training loss/accuracy written
//                       to a CSV next to the artifacts.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model artifact saving and loading
pub mod artifact_store;

/// Training metrics CSV logger
pub mod metrics;
