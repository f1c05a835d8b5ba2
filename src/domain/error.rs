// ============================================================
// Layer 3 — Service Errors
// ============================================================
// Every use case returns a ServiceError on failure. The
// variants map one-to-one onto the three kinds of failure the
// service reports:
//
//   validation   → Validation, ShapeMismatch       (HTTP 400)
//   precondition → NotEnoughLabels, NotTrained     (HTTP 400)
//   internal     → Internal                        (HTTP 500)
//
// Lower layers (data, ml, infra) keep returning anyhow::Result
// and are converted into Internal with `?`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A request field is missing or cannot be interpreted
    #[error("{0}")]
    Validation(String),

    /// A landmark vector does not have the width the store or the model expects
    #[error("landmarks have {actual} values but {expected} were expected")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Training needs at least two labels that actually hold samples
    #[error("Need at least 2 labels with samples")]
    NotEnoughLabels,

    /// Prediction was requested before a model and label map were written
    #[error("model not trained")]
    NotTrained,

    /// Filesystem, serialization or tensor library failure
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for failures caused by the caller rather than by the service
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
