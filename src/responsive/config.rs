//! Thresholds for the merge-or-swap decision

use serde::Deserialize;

/// Configuration options for responsive reconciliation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Key overlap at or below which fragments are never merged
    pub swap_overlap: f64,

    /// Key overlap every variant needs for a merge
    pub merge_overlap: f64,

    /// Order-preservation score every variant needs for a merge
    pub merge_order: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            swap_overlap: 0.75,
            merge_overlap: 0.90,
            merge_order: 0.85,
        }
    }
}

impl ReconcileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_swap_overlap(mut self, ratio: f64) -> Self {
        self.swap_overlap = ratio;
        self
    }

    pub fn with_merge_overlap(mut self, ratio: f64) -> Self {
        self.merge_overlap = ratio;
        self
    }

    pub fn with_merge_order(mut self, score: f64) -> Self {
        self.merge_order = score;
        self
    }
}
