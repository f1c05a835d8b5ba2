// ============================================================
// Layer 3 — Label Map
// ============================================================
// Maps the classifier's output index back to a class name.
//
// Indices are assigned from the lexicographically sorted label
// set, so training twice on the same labels always yields the
// same mapping:
//
//   {"rock", "paper"}  →  0: "paper", 1: "rock"
//
// Serialised as a JSON object keyed by the index
// ({"0": "paper", "1": "rock"}), which is also how the train
// endpoint reports it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap(BTreeMap<usize, String>);

impl LabelMap {
    /// Build the mapping from any collection of labels.
    /// Duplicates collapse; order of the input does not matter.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = labels.into_iter().map(Into::into).collect();
        sorted.sort();
        sorted.dedup();
        Self(sorted.into_iter().enumerate().collect())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    /// Label for an output index, or the index itself as text when
    /// the map and the model disagree about the number of classes.
    pub fn label_for(&self, index: usize) -> String {
        self.get(index)
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// (index, label) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(i, l)| (*i, l.as_str()))
    }
}
