//! Mock record client for tests and examples.
//!
//! Records every call and replays queued responses. Listing calls can be
//! given artificial latency so stale-response handling is exercisable under
//! paused tokio time.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ListResponse, MergeRequest, RecordClient, TotalCount};
use crate::error::{LensError, LensResult};

#[derive(Default)]
pub struct MockRecordClient {
    list_queue: Mutex<VecDeque<Result<ListResponse, String>>>,
    list_delays: Mutex<VecDeque<Duration>>,
    list_calls: Mutex<Vec<BTreeMap<String, String>>>,
    tag_calls: Mutex<Vec<(String, String)>>,
    funnel_calls: Mutex<Vec<(String, String, i32)>>,
    merge_calls: Mutex<Vec<MergeRequest>>,
    failing_records: Mutex<HashSet<String>>,
    merge_failure: Mutex<Option<String>>,
}

impl MockRecordClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful listing response; replayed in FIFO order
    pub fn push_list_response(&self, response: ListResponse) {
        self.list_queue.lock().unwrap().push_back(Ok(response));
    }

    /// Queues a failing listing response
    pub fn push_list_error(&self, message: impl Into<String>) {
        self.list_queue.lock().unwrap().push_back(Err(message.into()));
    }

    /// Queues artificial latency for the next listing call
    pub fn push_list_delay(&self, delay: Duration) {
        self.list_delays.lock().unwrap().push_back(delay);
    }

    /// Makes per-record mutations (tag attach, funnel place) fail for `id`
    pub fn fail_record(&self, id: impl Into<String>) {
        self.failing_records.lock().unwrap().insert(id.into());
    }

    /// Makes the next merge submission fail
    pub fn fail_merge(&self, message: impl Into<String>) {
        *self.merge_failure.lock().unwrap() = Some(message.into());
    }

    pub fn list_calls(&self) -> Vec<BTreeMap<String, String>> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn tag_calls(&self) -> Vec<(String, String)> {
        self.tag_calls.lock().unwrap().clone()
    }

    pub fn funnel_calls(&self) -> Vec<(String, String, i32)> {
        self.funnel_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<MergeRequest> {
        self.merge_calls.lock().unwrap().clone()
    }

    fn record_fails(&self, id: &str) -> bool {
        self.failing_records.lock().unwrap().contains(id)
    }
}

#[async_trait]
impl RecordClient for MockRecordClient {
    async fn list_records(&self, params: &BTreeMap<String, String>) -> LensResult<ListResponse> {
        self.list_calls.lock().unwrap().push(params.clone());

        // claim the response at call time so responses map to call order
        // even when calls overlap
        let queued = self.list_queue.lock().unwrap().pop_front();
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match queued {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LensError::Fetch(message)),
            None => Ok(ListResponse {
                items: Vec::new(),
                total_count: TotalCount::Simple(0),
                page: 1,
                page_size: 20,
            }),
        }
    }

    async fn attach_tag(&self, record_id: &str, tag_id: &str) -> LensResult<()> {
        self.tag_calls
            .lock()
            .unwrap()
            .push((record_id.to_string(), tag_id.to_string()));
        if self.record_fails(record_id) {
            return Err(LensError::Client(format!("tag attach failed for {}", record_id)));
        }
        Ok(())
    }

    async fn place_in_funnel(
        &self,
        record_id: &str,
        step_id: &str,
        sub_status: i32,
    ) -> LensResult<()> {
        self.funnel_calls.lock().unwrap().push((
            record_id.to_string(),
            step_id.to_string(),
            sub_status,
        ));
        if self.record_fails(record_id) {
            return Err(LensError::Client(format!(
                "funnel placement failed for {}",
                record_id
            )));
        }
        Ok(())
    }

    async fn merge_objects(&self, request: &MergeRequest) -> LensResult<()> {
        self.merge_calls.lock().unwrap().push(request.clone());
        if let Some(message) = self.merge_failure.lock().unwrap().take() {
            return Err(LensError::Client(message));
        }
        Ok(())
    }
}
