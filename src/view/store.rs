//! Pub-sub store for the view configuration, wrapping the pure column
//! transitions with full-config notification.

use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::columns::{self, ColumnSpec};
use super::config::{ColumnConfig, Density, DisplayMode, ViewConfig, ViewRestrictions};

/// Partial update applied on top of an existing [`ViewConfig`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewUpdate {
    pub display_mode: Option<DisplayMode>,
    pub density: Option<Density>,
    pub columns: Option<Vec<ColumnConfig>>,
}

/// Holds the current view state, enforces the source's restrictions, and
/// fans out snapshots to subscribers.
pub struct ViewStore {
    config: ViewConfig,
    defaults: ViewConfig,
    restrictions: ViewRestrictions,
    subscribers: Vec<UnboundedSender<ViewConfig>>,
}

impl ViewStore {
    pub fn new(initial: ViewConfig, restrictions: ViewRestrictions) -> Self {
        Self {
            config: initial.clone(),
            defaults: initial,
            restrictions,
            subscribers: Vec::new(),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn restrictions(&self) -> &ViewRestrictions {
        &self.restrictions
    }

    /// Visible columns in render order, cloned out of the current config
    pub fn visible_columns(&self) -> Vec<ColumnConfig> {
        self.config.visible_columns().into_iter().cloned().collect()
    }

    /// Registers a subscriber; the receiver immediately observes the current
    /// configuration.
    pub fn subscribe(&mut self) -> UnboundedReceiver<ViewConfig> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(self.config.clone());
        self.subscribers.push(tx);
        rx
    }

    /// Shallow-merges `update` into the current config and notifies
    pub fn update(&mut self, update: ViewUpdate) {
        if let Some(display_mode) = update.display_mode {
            self.config.display_mode = display_mode;
        }
        if let Some(density) = update.density {
            self.config.density = density;
        }
        if let Some(columns) = update.columns {
            self.config.columns = columns;
        }
        self.notify();
    }

    pub fn set_display_mode(&mut self, display_mode: DisplayMode) {
        self.config.display_mode = display_mode;
        self.notify();
    }

    pub fn set_density(&mut self, density: Density) {
        self.config.density = density;
        self.notify();
    }

    /// Restores the hydrated defaults
    pub fn reset(&mut self) {
        self.config = self.defaults.clone();
        debug!("view reset to defaults");
        self.notify();
    }

    // ===== Column manager surface =====

    pub fn toggle_visibility(&mut self, field: &str, visible: bool, object_type_id: Option<&str>) {
        if columns::toggle_visibility(
            &mut self.config.columns,
            &self.restrictions,
            field,
            visible,
            object_type_id,
        ) {
            self.notify();
        }
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        if columns::reorder(&mut self.config.columns, from, to) {
            self.notify();
        }
    }

    pub fn add_column(&mut self, spec: ColumnSpec) {
        columns::add(&mut self.config.columns, spec);
        self.notify();
    }

    pub fn remove_column(&mut self, field: &str, object_type_id: Option<&str>) {
        if columns::remove(
            &mut self.config.columns,
            &self.restrictions,
            field,
            object_type_id,
        ) {
            self.notify();
        }
    }

    pub fn resize_width(&mut self, field: &str, width: u32, object_type_id: Option<&str>) {
        if columns::resize_width(&mut self.config.columns, field, width, object_type_id) {
            self.notify();
        }
    }

    fn notify(&mut self) {
        let snapshot = self.config.clone();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::config::MIN_COLUMN_WIDTH;

    fn store() -> ViewStore {
        ViewStore::new(ViewConfig::default(), ViewRestrictions::temporary())
    }

    #[test]
    fn test_noop_transitions_do_not_notify() {
        let mut store = store();
        let mut rx = store.subscribe();
        let _ = rx.try_recv().unwrap();

        // required column: hide is rejected, no notification
        store.toggle_visibility("name", false, None);
        assert!(rx.try_recv().is_err());

        store.resize_width("name", 30, None);
        let seen = rx.try_recv().unwrap();
        assert_eq!(seen.columns[0].width, MIN_COLUMN_WIDTH);
        // clamping to the same value again changes nothing
        store.resize_width("name", 10, None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = store();
        store.set_density(Density::Compact);
        store.remove_column("tags", None);
        assert_eq!(store.config().columns.len(), 6);

        store.reset();
        assert_eq!(store.config(), &ViewConfig::default());
    }

    #[test]
    fn test_display_mode_and_density_notify() {
        let mut store = store();
        let mut rx = store.subscribe();
        let _ = rx.try_recv().unwrap();

        store.set_display_mode(DisplayMode::Kanban);
        assert_eq!(rx.try_recv().unwrap().display_mode, DisplayMode::Kanban);

        store.set_density(Density::Compact);
        assert_eq!(rx.try_recv().unwrap().density, Density::Compact);
    }
}
