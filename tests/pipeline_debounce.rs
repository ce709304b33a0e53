//! End-to-end behavior of the debounced fetch pipeline against the filter
//! store: burst coalescing, page resets, and stale-response discarding.

use std::sync::Arc;
use std::time::Duration;

use objectlens::client::mock::MockRecordClient;
use objectlens::client::{ListResponse, TotalCount};
use objectlens::filter::{FilterConfig, FilterStore, FilterUpdate};
use objectlens::pipeline::FetchPipeline;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn response(total: u64) -> ListResponse {
    ListResponse {
        items: Vec::new(),
        total_count: TotalCount::Simple(total),
        page: 1,
        page_size: 20,
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_updates_coalesce_into_one_fetch() {
    init_logs();
    let client = Arc::new(MockRecordClient::new());
    client.push_list_response(response(42));

    let mut store = FilterStore::new(FilterConfig::default());
    let pipeline = FetchPipeline::spawn(Arc::clone(&client), store.subscribe());

    // the initial snapshot plus a typing burst, all inside one quiet window
    store.update(FilterUpdate::search("a"));
    store.update(FilterUpdate::search("ac"));
    store.update(FilterUpdate::search("acme"));

    let state = pipeline.wait_for(|s| s.total_count == 42).await;
    assert!(state.error.is_none());

    let calls = client.list_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].get("q").map(String::as_str), Some("acme"));
    pipeline.abort();
}

#[tokio::test(start_paused = true)]
async fn filter_change_fetches_page_one() {
    let client = Arc::new(MockRecordClient::new());
    client.push_list_response(response(100));
    client.push_list_response(response(100));
    client.push_list_response(response(7));

    let mut store = FilterStore::new(FilterConfig::default());
    let pipeline = FetchPipeline::spawn(Arc::clone(&client), store.subscribe());
    pipeline.wait_for(|s| s.total_count == 100).await;

    store.update(FilterUpdate::page(4));
    pipeline
        .wait_for(|_| client.list_calls().len() == 2)
        .await;

    store.update(FilterUpdate::tags(vec!["t1".to_string()]));
    let state = pipeline.wait_for(|s| s.total_count == 7).await;
    assert!(state.error.is_none());

    let calls = client.list_calls();
    assert_eq!(calls[1].get("page").map(String::as_str), Some("4"));
    assert_eq!(calls[2].get("page").map(String::as_str), Some("1"));
    assert_eq!(calls[2].get("tag_ids").map(String::as_str), Some("t1"));
    pipeline.abort();
}

#[tokio::test(start_paused = true)]
async fn slow_response_loses_to_a_newer_fetch() {
    init_logs();
    let client = Arc::new(MockRecordClient::new());
    // first fetch stalls for a second, second returns immediately
    client.push_list_delay(Duration::from_millis(1000));
    client.push_list_response(response(10));
    client.push_list_response(response(2));

    let mut store = FilterStore::new(FilterConfig::default());
    let pipeline = FetchPipeline::spawn(Arc::clone(&client), store.subscribe());

    // let the initial fetch dispatch, then change the filter while it hangs
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(client.list_calls().len(), 1);
    store.update(FilterUpdate::search("narrow"));

    let state = pipeline.wait_for(|s| s.total_count == 2).await;
    assert!(state.error.is_none());

    // once the stalled response lands it must not overwrite the newer one
    tokio::time::sleep(Duration::from_millis(2000)).await;
    let state = pipeline.state().borrow().clone();
    assert_eq!(state.total_count, 2);
    assert_eq!(client.list_calls().len(), 2);
    pipeline.abort();
}

#[tokio::test(start_paused = true)]
async fn refresh_refetches_without_changing_the_filter() {
    let client = Arc::new(MockRecordClient::new());
    client.push_list_response(response(5));
    client.push_list_response(response(5));

    let mut store = FilterStore::new(FilterConfig::default());
    let pipeline = FetchPipeline::spawn(Arc::clone(&client), store.subscribe());
    pipeline.wait_for(|s| s.total_count == 5).await;

    store.refresh();
    pipeline
        .wait_for(|_| client.list_calls().len() == 2)
        .await;

    let calls = client.list_calls();
    assert_eq!(calls[0], calls[1]);
    pipeline.abort();
}
