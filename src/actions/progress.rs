//! Progress reporting for sequential bulk actions.

use serde::{Deserialize, Serialize};

/// One item that failed mid-loop. Kept in memory for the duration of the
/// hosting dialog only; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    pub name: String,
    pub error: Option<String>,
}

/// Live progress of a bulk action.
///
/// Invariants: `completed` is monotonically non-decreasing, `failed` is
/// append-only, and `completed + failed.len() + <unattempted>` always equals
/// `total` — a single failure never aborts the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkProgress {
    pub completed: usize,
    pub total: usize,
    /// Label of the item currently being displayed. Advances to the next
    /// item as soon as the previous one settles.
    pub current_label: String,
    pub failed: Vec<FailedItem>,
}

impl BulkProgress {
    pub fn new(total: usize, first_label: impl Into<String>) -> Self {
        Self {
            completed: 0,
            total,
            current_label: first_label.into(),
            failed: Vec::new(),
        }
    }

    /// Number of items attempted so far, successful or not
    pub fn attempted(&self) -> usize {
        self.completed + self.failed.len()
    }

    pub fn is_finished(&self) -> bool {
        self.attempted() == self.total
    }
}
