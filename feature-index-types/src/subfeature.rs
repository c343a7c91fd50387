//! The record stored per grid entry of a feature index.

use serde::{Deserialize, Serialize};

/// Identifies one indexed occurrence of a feature.
///
/// Two records describe the same occurrence iff their `sort_index` is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedSubfeature {
    /// Position of the feature within its source layer.
    pub index: usize,
    /// Name of the source layer in the decoded tile.
    pub source_layer_name: String,
    /// Name of the render bucket the feature was drawn into.
    pub bucket_name: String,
    /// Insertion order; doubles as paint order and dedup key.
    pub sort_index: usize,
}

impl IndexedSubfeature {
    pub fn new(
        index: usize,
        source_layer_name: impl Into<String>,
        bucket_name: impl Into<String>,
        sort_index: usize,
    ) -> Self {
        Self {
            index,
            source_layer_name: source_layer_name.into(),
            bucket_name: bucket_name.into(),
            sort_index,
        }
    }
}
