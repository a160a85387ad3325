//! # Batch Results
//!
//! A batch submission is a map from caller-chosen index to value. The
//! service answers with a partition of those indices into successes (index →
//! derived identifier) and per-item failures (index → error message).
//!
//! Partial failure is data, not an error: a result with both maps non-empty
//! is a normal outcome.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Items submitted in one batch, keyed by caller-chosen index.
pub type BatchItems<T> = BTreeMap<u32, T>;

/// Partitioned outcome of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult<T> {
    /// Index → derived value for items the service processed.
    pub success: BTreeMap<u32, T>,
    /// Index → error message for items the service rejected.
    pub failed: BTreeMap<u32, String>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            success: BTreeMap::new(),
            failed: BTreeMap::new(),
        }
    }
}

/// Ways a returned result can fail to partition the submitted indices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("batch result does not partition submitted indices: missing {missing:?}, unexpected {unexpected:?}, in both maps {overlapping:?}")]
pub struct PartitionViolation {
    /// Submitted indices absent from both maps.
    pub missing: Vec<u32>,
    /// Indices in the result that were never submitted.
    pub unexpected: Vec<u32>,
    /// Indices present in both `success` and `failed`.
    pub overlapping: Vec<u32>,
}

impl<T> BatchResult<T> {
    /// Total number of indices covered.
    pub fn len(&self) -> usize {
        self.success.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.failed.is_empty()
    }

    /// True when no item failed.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Verify that `success` and `failed` are disjoint and that their union
    /// equals `submitted`.
    pub fn check_partition<'a>(
        &self,
        submitted: impl IntoIterator<Item = &'a u32>,
    ) -> Result<(), PartitionViolation> {
        let submitted: BTreeSet<u32> = submitted.into_iter().copied().collect();
        let overlapping: Vec<u32> = self
            .success
            .keys()
            .filter(|k| self.failed.contains_key(*k))
            .copied()
            .collect();
        let returned: BTreeSet<u32> = self
            .success
            .keys()
            .chain(self.failed.keys())
            .copied()
            .collect();
        let missing: Vec<u32> = submitted.difference(&returned).copied().collect();
        let unexpected: Vec<u32> = returned.difference(&submitted).copied().collect();

        if missing.is_empty() && unexpected.is_empty() && overlapping.is_empty() {
            Ok(())
        } else {
            Err(PartitionViolation {
                missing,
                unexpected,
                overlapping,
            })
        }
    }

    /// Convert every success value, keeping indices and failures.
    pub fn map_success<U>(self, f: impl Fn(T) -> U) -> BatchResult<U> {
        BatchResult {
            success: self.success.into_iter().map(|(k, v)| (k, f(v))).collect(),
            failed: self.failed,
        }
    }
}
