// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case coordinates the other layers for one thing a
// client can ask for.
//
// Rules for this layer:
//   - No tensor or model code here (that's Layer 5)
//   - No HTTP or printing here (that's Layer 1)
//   - No direct file access (that's Layers 4 and 6)
//   - Only workflow coordination, returning ServiceError
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Sample upload and per-label counts
pub mod collect_use_case;

// The training workflow
pub mod train_use_case;

// Single-sample classification
pub mod predict_use_case;
