// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here; the other layers only see
// plain Vec<f32> feature vectors and class indices.
//
//   model.rs      — Dense(256, relu) → Dropout → Dense(128, relu)
//                   → Dense(K) classifier with softmax output
//
//   trainer.rs    — The training loop: Adam, cross-entropy,
//                   fixed epoch count, per-epoch loss/accuracy
//
//   inferencer.rs — Loads the saved model and returns the top
//                   class with its probability
//
// Both backends are CPU (NdArray): the service trains small
// models inline and must run on machines without a GPU.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Backend used for inference and for saved records
pub type InferBackend = burn::backend::NdArray;

/// Backend used while training (tracks gradients, enables dropout)
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

/// Feed-forward landmark classifier
pub mod model;

/// Training loop over the landmark dataset
pub mod trainer;

/// Inference engine — loads artifacts and predicts one sample
pub mod inferencer;
