//! Pub-sub store for the current filter configuration.
//!
//! Subscribers receive the full new configuration (not a diff) on every
//! change, delivered synchronously through unbounded channels. The single
//! logical actor model means notification order is the mutation order.

use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::config::{FilterConfig, FilterUpdate};

/// Holds the current filter state and fans out snapshots to subscribers
pub struct FilterStore {
    current: FilterConfig,
    defaults: FilterConfig,
    subscribers: Vec<UnboundedSender<FilterConfig>>,
}

impl FilterStore {
    /// Creates a store hydrated with `initial` (typically the config cache's
    /// load result). `reset` returns to this snapshot.
    pub fn new(initial: FilterConfig) -> Self {
        Self {
            current: initial.clone(),
            defaults: initial,
            subscribers: Vec::new(),
        }
    }

    /// Current configuration snapshot
    pub fn current(&self) -> &FilterConfig {
        &self.current
    }

    /// Registers a subscriber. The receiver immediately observes the current
    /// configuration so a fresh pipeline issues its initial fetch.
    pub fn subscribe(&mut self) -> UnboundedReceiver<FilterConfig> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(self.current.clone());
        self.subscribers.push(tx);
        rx
    }

    /// Shallow-merges `update` into the current state. Any update touching a
    /// field other than `page`/`page_size` resets `page` to 1.
    pub fn update(&mut self, update: FilterUpdate) {
        self.current = update.apply(&self.current);
        debug!(
            "filter updated: page={} sort={} ascending={}",
            self.current.page, self.current.sort_by, self.current.ascending
        );
        self.notify();
    }

    /// Restores the hydrated defaults and notifies subscribers
    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
        debug!("filter reset to defaults");
        self.notify();
    }

    /// Re-notifies subscribers with the unchanged current snapshot. Used by
    /// bulk-action success callbacks to trigger a re-fetch.
    pub fn refresh(&mut self) {
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.current.clone();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}
