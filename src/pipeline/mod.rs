//! Debounced reactive fetch pipeline.
//!
//! Subscribes to filter-config updates, coalesces bursts into a single fetch
//! per quiet period, and publishes the listing state through a watch channel.
//! Fetches are keyed by a monotonically increasing sequence number; a result
//! arriving after a newer fetch was dispatched is discarded (last-fetch-wins).
//! Failures reset the data and surface as a state flag; there is no automatic
//! retry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::client::{ListResponse, RecordClient};
use crate::error::LensResult;
use crate::filter::{build_query, FilterConfig};
use crate::model::ObjectRecord;

/// Quiet period before a config burst turns into a fetch
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// The listing surface's observable state
#[derive(Debug, Clone, Default)]
pub struct ListingState {
    pub data: Vec<ObjectRecord>,
    pub total_count: u64,
    /// Per-funnel-step breakdown; only present when the response carried one
    pub step_counts: Option<HashMap<String, u64>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Owns the background task driving fetches for one listing surface
pub struct FetchPipeline {
    state_rx: watch::Receiver<ListingState>,
    handle: JoinHandle<()>,
}

impl FetchPipeline {
    /// Spawns the pipeline over a filter-config subscription. The pipeline
    /// runs until every sender side of `updates` is dropped and the final
    /// fetch has settled.
    pub fn spawn<C>(client: Arc<C>, updates: UnboundedReceiver<FilterConfig>) -> Self
    where
        C: RecordClient + 'static,
    {
        let (state_tx, state_rx) = watch::channel(ListingState::default());
        let handle = tokio::spawn(run(client, updates, state_tx));
        Self { state_rx, handle }
    }

    /// A fresh handle onto the published state
    pub fn state(&self) -> watch::Receiver<ListingState> {
        self.state_rx.clone()
    }

    /// Waits until the published state satisfies `predicate`
    pub async fn wait_for<F>(&self, mut predicate: F) -> ListingState
    where
        F: FnMut(&ListingState) -> bool,
    {
        let mut rx = self.state_rx.clone();
        loop {
            {
                let current = rx.borrow();
                if predicate(&current) {
                    return current.clone();
                }
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }

    /// Stops the background task immediately
    pub fn abort(&self) {
        self.handle.abort();
    }
}

async fn run<C>(
    client: Arc<C>,
    mut updates: UnboundedReceiver<FilterConfig>,
    state_tx: watch::Sender<ListingState>,
) where
    C: RecordClient + 'static,
{
    let (results_tx, mut results_rx) =
        mpsc::unbounded_channel::<(u64, LensResult<ListResponse>)>();

    let mut pending: Option<FilterConfig> = None;
    let mut deadline = Instant::now();
    let mut seq: u64 = 0;
    let mut outstanding: usize = 0;
    let mut open = true;

    loop {
        tokio::select! {
            maybe_config = updates.recv(), if open => match maybe_config {
                Some(config) => {
                    // coalesce: only the latest snapshot survives the window
                    pending = Some(config);
                    deadline = Instant::now() + DEBOUNCE_WINDOW;
                }
                None => {
                    open = false;
                    if pending.is_none() && outstanding == 0 {
                        break;
                    }
                }
            },
            _ = time::sleep_until(deadline), if pending.is_some() => {
                if let Some(config) = pending.take() {
                    seq += 1;
                    outstanding += 1;
                    state_tx.send_modify(|state| state.is_loading = true);

                    let params = build_query(&config);
                    debug!("dispatching fetch #{} (page {})", seq, config.page);
                    let client = Arc::clone(&client);
                    let results_tx = results_tx.clone();
                    let this_seq = seq;
                    tokio::spawn(async move {
                        let result = client.list_records(&params).await;
                        let _ = results_tx.send((this_seq, result));
                    });
                }
            },
            Some((result_seq, result)) = results_rx.recv() => {
                outstanding -= 1;
                if result_seq == seq {
                    apply_result(&state_tx, result);
                } else {
                    debug!("discarding stale fetch result #{result_seq} (latest is #{seq})");
                }
                if !open && pending.is_none() && outstanding == 0 {
                    break;
                }
            },
        }
    }
}

fn apply_result(state_tx: &watch::Sender<ListingState>, result: LensResult<ListResponse>) {
    match result {
        Ok(response) => {
            let step_counts = response.total_count.step_counts().cloned();
            let total = response.total_count.total();
            state_tx.send_modify(|state| {
                state.data = response.items;
                state.total_count = total;
                state.step_counts = step_counts;
                state.is_loading = false;
                state.error = None;
            });
        }
        Err(e) => {
            error!("listing fetch failed: {}", e);
            let message = e.to_string();
            state_tx.send_modify(|state| {
                state.data = Vec::new();
                state.total_count = 0;
                state.step_counts = None;
                state.is_loading = false;
                state.error = Some(message);
            });
        }
    }
}
