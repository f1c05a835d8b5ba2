// ============================================================
// Layer 3 — Sample Domain Types
// ============================================================
// A sample is one landmark array tagged with a label.
//
//   Label     → class name, also used as a directory name
//   Landmarks → a rectangular numeric array, kept flattened
//               (row-major) together with its original shape
//
// Clients send landmarks as nested JSON arrays, e.g. 21 hand
// key points as [[x, y, z], ...]. The classifier only ever
// sees the flattened vector, whose length we call its width.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{ServiceError, ServiceResult};

// ─── Label ────────────────────────────────────────────────────────────────────
/// A validated class label: trimmed, non-empty and safe to use
/// as a single path component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(String);

impl Label {
    pub fn parse(raw: &str) -> ServiceResult<Self> {
        let label = raw.trim();
        if label.is_empty() {
            return Err(ServiceError::validation("label must not be empty"));
        }
        if label.contains("..")
            || label.contains('/')
            || label.contains('\\')
            || label.contains('\0')
            || !is_single_dir_name(label)
        {
            return Err(ServiceError::validation(format!(
                "label '{label}' is not a valid directory name"
            )));
        }
        Ok(Self(label.to_string()))
    }

    /// Strings are used as-is, any other non-null value by its
    /// JSON text (so `5` becomes "5").
    pub fn from_json(value: &Value) -> ServiceResult<Self> {
        match value {
            Value::Null => Err(ServiceError::validation("label must not be empty")),
            Value::String(s) => Self::parse(s),
            other => Self::parse(&other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// True when joining the label onto a directory names exactly one
/// child of it. Rules out "." which would point at the parent itself.
fn is_single_dir_name(label: &str) -> bool {
    let mut components = Path::new(label).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Landmarks ────────────────────────────────────────────────────────────────
/// A uniform numeric array, stored flattened.
/// `values.len()` always equals the product of `shape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    pub shape:  Vec<usize>,
    pub values: Vec<f32>,
}

impl Landmarks {
    /// Flat vector with shape [len]
    #[cfg(test)]
    pub fn from_flat(values: Vec<f32>) -> Self {
        Self { shape: vec![values.len()], values }
    }

    /// Convert a JSON number or nested array into Landmarks.
    ///
    /// The shape is read off the first element at every depth;
    /// every other element must then agree with it, otherwise the
    /// array is ragged and rejected. Empty arrays are rejected too
    /// since a zero-width sample cannot feed the classifier.
    pub fn from_json(value: &Value) -> ServiceResult<Self> {
        let shape  = infer_shape(value);
        let mut values = Vec::new();
        collect_values(value, &shape, &mut values)?;

        if values.is_empty() {
            return Err(ServiceError::validation("landmarks must not be empty"));
        }
        Ok(Self { shape, values })
    }

    /// Number of values once flattened
    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

fn infer_shape(value: &Value) -> Vec<usize> {
    let mut shape   = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None        => break,
        }
    }
    shape
}

fn collect_values(value: &Value, shape: &[usize], out: &mut Vec<f32>) -> ServiceResult<()> {
    match (value, shape.split_first()) {
        (Value::Array(items), Some((&len, rest))) => {
            if items.len() != len {
                return Err(ragged());
            }
            for item in items {
                collect_values(item, rest, out)?;
            }
            Ok(())
        }
        (Value::Number(n), None) => {
            let v = n
                .as_f64()
                .ok_or_else(|| ServiceError::validation("landmarks must be numeric"))?;
            out.push(v as f32);
            Ok(())
        }
        (Value::Array(_), None) | (Value::Number(_), Some(_)) => Err(ragged()),
        _ => Err(ServiceError::validation("landmarks must be numeric")),
    }
}

fn ragged() -> ServiceError {
    ServiceError::validation("landmarks must form a uniform numeric array")
}
