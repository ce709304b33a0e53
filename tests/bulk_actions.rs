//! Bulk actions over a selection: sequential execution, partial failure, and
//! the refresh that follows a finished run.

use std::sync::Arc;

use objectlens::actions::{AddTagAction, AddToFunnelAction, BulkExecutor};
use objectlens::client::mock::MockRecordClient;
use objectlens::client::{ListResponse, TotalCount};
use objectlens::filter::{FilterConfig, FilterStore};
use objectlens::model::ObjectRecord;
use objectlens::pipeline::FetchPipeline;
use objectlens::selection::SelectionModel;

fn record(id: &str, name: &str) -> ObjectRecord {
    ObjectRecord {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn partial_failure_reports_every_failed_name() {
    let client = Arc::new(MockRecordClient::new());
    client.fail_record("obj-2");
    client.fail_record("obj-4");

    let records = vec![
        record("obj-1", "Alpha"),
        record("obj-2", "Beta"),
        record("obj-3", "Gamma"),
        record("obj-4", "Delta"),
    ];
    let action = AddTagAction::new(Arc::clone(&client), "tag-1");
    let executor = BulkExecutor::new();

    let report = executor.run(&action, &records).await.unwrap();
    assert_eq!(report.completed, 2);
    let failed: Vec<&str> = report.failed.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(failed, vec!["Beta", "Delta"]);
    assert!(report.failed.iter().all(|f| f.error.is_some()));

    // every record was attempted exactly once, in selection order
    let attempted: Vec<String> = client.tag_calls().into_iter().map(|(id, _)| id).collect();
    assert_eq!(attempted, vec!["obj-1", "obj-2", "obj-3", "obj-4"]);
}

#[tokio::test]
async fn progress_counts_settle_at_the_total() {
    let client = Arc::new(MockRecordClient::new());
    client.fail_record("obj-2");
    let records = vec![record("obj-1", "Alpha"), record("obj-2", "Beta")];

    let action = AddToFunnelAction::new(Arc::clone(&client), "step-1", 2);
    let executor = BulkExecutor::new();
    executor.run(&action, &records).await.unwrap();

    let progress = executor.progress().borrow().clone().unwrap();
    assert_eq!(progress.total, 2);
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.failed.len(), 1);
    assert!(progress.is_finished());
}

#[tokio::test(start_paused = true)]
async fn successful_run_refreshes_the_listing() {
    let client = Arc::new(MockRecordClient::new());
    client.push_list_response(ListResponse {
        items: vec![record("obj-1", "Alpha")],
        total_count: TotalCount::Simple(1),
        page: 1,
        page_size: 20,
    });

    let mut store = FilterStore::new(FilterConfig::default());
    let pipeline = FetchPipeline::spawn(Arc::clone(&client), store.subscribe());
    let state = pipeline.wait_for(|s| s.total_count == 1).await;

    let mut selection = SelectionModel::new();
    selection.select_all_on_page(&state.data);
    assert_eq!(selection.len(), 1);

    let action = AddTagAction::new(Arc::clone(&client), "tag-1");
    let report = BulkExecutor::new()
        .run(&action, selection.records())
        .await
        .unwrap();
    assert!(report.is_success());

    // on success the host clears the selection and re-fetches
    selection.clear();
    store.refresh();
    pipeline.wait_for(|_| client.list_calls().len() == 2).await;
    assert!(selection.is_empty());
    pipeline.abort();
}
