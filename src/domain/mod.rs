// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the service
// works with: labels, landmark arrays, the label map, the
// service error, and the sample store abstraction.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O or HTTP
//   - Only plain structs, enums and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Typed failures shared by every use case
pub mod error;

// Index → class name mapping fixed at training time
pub mod label_map;

// Label and Landmarks value types
pub mod sample;

// Core abstractions (traits) that other layers implement
pub mod traits;
