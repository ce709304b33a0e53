//! Bulk actions over the current selection.
//!
//! All bulk actions share one shape: validate the selection up front, then
//! apply the action to each record strictly in sequence, reporting progress
//! after every item. A failure on one record is recorded and the loop moves
//! on; partial success is the expected outcome, not an abort.

pub mod dialog;
pub mod export;
pub mod funnel;
pub mod merge;
pub mod progress;
pub mod tag;

use async_trait::async_trait;
use log::{info, warn};
use tokio::sync::watch;

use crate::error::{LensError, LensResult};
use crate::model::ObjectRecord;

pub use dialog::{DialogController, DialogState};
pub use export::{ensure_csv_extension, export_csv, export_csv_string};
pub use funnel::AddToFunnelAction;
pub use merge::{
    build_merge_request, overlapping_types, validate_merge_selection, FieldSelection, MergeConfig,
    MergeDialog, MergePhase, OverlappingType, MAX_MERGE_RECORDS, MIN_MERGE_RECORDS,
};
pub use progress::{BulkProgress, FailedItem};
pub use tag::AddTagAction;

/// A per-record operation that can be applied to a selection
#[async_trait]
pub trait BulkAction: Send + Sync {
    /// Stable identifier, used in logs
    fn id(&self) -> &str;

    /// Human-readable action name
    fn label(&self) -> &str;

    /// Checks preconditions before any record is touched. The default
    /// rejects an empty selection.
    fn validate(&self, records: &[ObjectRecord]) -> LensResult<()> {
        if records.is_empty() {
            return Err(LensError::Validation("no records selected".to_string()));
        }
        Ok(())
    }

    /// Applies the action to a single record
    async fn apply(&self, record: &ObjectRecord) -> LensResult<()>;
}

/// Outcome of a finished bulk run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub completed: usize,
    pub total: usize,
    pub failed: Vec<FailedItem>,
}

impl BulkReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary suitable for a toast
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!("{} of {} records updated", self.completed, self.total)
        } else {
            format!(
                "{} of {} records updated, {} failed",
                self.completed,
                self.total,
                self.failed.len()
            )
        }
    }
}

/// Drives a [`BulkAction`] over a selection, one record at a time
pub struct BulkExecutor {
    progress_tx: watch::Sender<Option<BulkProgress>>,
    progress_rx: watch::Receiver<Option<BulkProgress>>,
}

impl Default for BulkExecutor {
    fn default() -> Self {
        let (progress_tx, progress_rx) = watch::channel(None);
        Self {
            progress_tx,
            progress_rx,
        }
    }
}

impl BulkExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle onto the live progress; `None` while no run is active
    pub fn progress(&self) -> watch::Receiver<Option<BulkProgress>> {
        self.progress_rx.clone()
    }

    /// Runs `action` over `records` in order. Validation errors abort before
    /// any record is touched; per-record failures are collected and the loop
    /// continues. The final progress snapshot stays published after the run
    /// so the hosting dialog can render the failure list.
    pub async fn run(
        &self,
        action: &dyn BulkAction,
        records: &[ObjectRecord],
    ) -> LensResult<BulkReport> {
        action.validate(records)?;

        let total = records.len();
        info!("starting bulk action '{}' over {} records", action.id(), total);
        self.progress_tx
            .send_replace(Some(BulkProgress::new(total, records[0].name.clone())));

        let mut completed = 0;
        let mut failed: Vec<FailedItem> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match action.apply(record).await {
                Ok(()) => completed += 1,
                Err(e) => {
                    warn!(
                        "bulk action '{}' failed for '{}': {}",
                        action.id(),
                        record.name,
                        e
                    );
                    failed.push(FailedItem {
                        name: record.name.clone(),
                        error: Some(e.to_string()),
                    });
                }
            }

            let next_label = records
                .get(index + 1)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| record.name.clone());
            let failed_snapshot = failed.clone();
            self.progress_tx.send_modify(|progress| {
                if let Some(progress) = progress {
                    progress.completed = completed;
                    progress.failed = failed_snapshot;
                    progress.current_label = next_label;
                }
            });
        }

        let report = BulkReport {
            completed,
            total,
            failed,
        };
        info!("bulk action '{}' finished: {}", action.id(), report.summary());
        Ok(report)
    }

    /// Clears the published progress, typically when the dialog closes
    pub fn reset(&self) {
        self.progress_tx.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyAction {
        fail_on: Vec<String>,
        applied: AtomicUsize,
    }

    #[async_trait]
    impl BulkAction for FlakyAction {
        fn id(&self) -> &str {
            "flaky"
        }

        fn label(&self) -> &str {
            "Flaky"
        }

        async fn apply(&self, record: &ObjectRecord) -> LensResult<()> {
            self.applied.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&record.id) {
                return Err(LensError::Client(format!("rejected {}", record.id)));
            }
            Ok(())
        }
    }

    fn record(id: &str) -> ObjectRecord {
        ObjectRecord {
            id: id.to_string(),
            name: format!("record {}", id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_loop() {
        let action = FlakyAction {
            fail_on: vec!["b".to_string()],
            applied: AtomicUsize::new(0),
        };
        let records = vec![record("a"), record("b"), record("c")];
        let executor = BulkExecutor::new();

        let report = executor.run(&action, &records).await.unwrap();
        assert_eq!(report.completed, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "record b");
        assert!(report.failed[0].error.as_deref().unwrap().contains("rejected b"));
        assert_eq!(action.applied.load(Ordering::SeqCst), 3);
        assert_eq!(report.summary(), "2 of 3 records updated, 1 failed");
    }

    #[tokio::test]
    async fn test_empty_selection_rejected_before_any_apply() {
        let action = FlakyAction {
            fail_on: Vec::new(),
            applied: AtomicUsize::new(0),
        };
        let executor = BulkExecutor::new();

        let err = executor.run(&action, &[]).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(action.applied.load(Ordering::SeqCst), 0);
        assert!(executor.progress().borrow().is_none());
    }

    #[tokio::test]
    async fn test_final_progress_stays_published() {
        let action = FlakyAction {
            fail_on: Vec::new(),
            applied: AtomicUsize::new(0),
        };
        let records = vec![record("a"), record("b")];
        let executor = BulkExecutor::new();
        executor.run(&action, &records).await.unwrap();

        let progress = executor.progress().borrow().clone().unwrap();
        assert_eq!(progress.completed, 2);
        assert!(progress.is_finished());

        executor.reset();
        assert!(executor.progress().borrow().is_none());
    }
}
