//! Versioned persistence of {filter, view} configuration.
//!
//! The stored entry is adopted wholesale or not at all: a missing entry, a
//! version mismatch, or a parse failure discards it and falls back to the
//! caller's defaults. On success, stored column state is reconciled against
//! the current defaults so stored layouts survive catalog changes, and the
//! defaults' page size wins (it carries the host's per-page setting).
//! Persistence is best-effort: write failures are logged, never surfaced.

use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConfigStore;
use crate::filter::FilterConfig;
use crate::view::{ColumnConfig, ViewConfig};

/// Format version of the persisted entry; bumping it invalidates stored configs
pub const CONFIG_VERSION: &str = "1.0";

/// Fixed key the listing surface persists its configuration under
pub const CONFIG_STORAGE_KEY: &str = "advanced-listing-config";

/// The hydrated {filter, view} pair a listing surface boots from
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedConfig {
    pub filter: FilterConfig,
    pub view: ViewConfig,
}

#[derive(Serialize, Deserialize)]
struct StoredConfig {
    version: String,
    filter: Value,
    view: ViewConfig,
    #[serde(rename = "lastUpdated")]
    last_updated: i64,
}

/// Versioned load/save of configuration against a [`ConfigStore`]
pub struct ConfigCache<S: ConfigStore> {
    store: S,
    key: String,
}

impl<S: ConfigStore> ConfigCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, CONFIG_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Loads the stored configuration, merged against `defaults`. Any failure
    /// discards the stored entry and yields the defaults unchanged.
    pub fn load(&self, version: &str, defaults: &HydratedConfig) -> HydratedConfig {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return defaults.clone(),
            Err(e) => {
                warn!("failed to read stored config: {}", e);
                return defaults.clone();
            }
        };

        let stored: StoredConfig = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("discarding unparseable stored config: {}", e);
                self.discard();
                return defaults.clone();
            }
        };

        if stored.version != version {
            warn!(
                "discarding stored config: version {} does not match {}",
                stored.version, version
            );
            self.discard();
            return defaults.clone();
        }

        let filter = merge_filter(&defaults.filter, &stored.filter);
        let view = ViewConfig {
            display_mode: stored.view.display_mode,
            density: stored.view.density,
            columns: merge_columns(&defaults.view.columns, &stored.view.columns),
        };

        HydratedConfig { filter, view }
    }

    /// Persists the configuration, stripping the transient `search` and
    /// `page` fields. Failures are logged and swallowed.
    pub fn save(&self, version: &str, filter: &FilterConfig, view: &ViewConfig) {
        let mut filter_value = match serde_json::to_value(filter) {
            Ok(value) => value,
            Err(e) => {
                warn!("failed to serialize filter config: {}", e);
                return;
            }
        };
        if let Some(object) = filter_value.as_object_mut() {
            object.remove("search");
            object.remove("page");
        }

        let entry = StoredConfig {
            version: version.to_string(),
            filter: filter_value,
            view: view.clone(),
            last_updated: Utc::now().timestamp_millis(),
        };

        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!("failed to serialize stored config: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &serialized) {
            warn!("failed to persist config: {}", e);
        }
    }

    fn discard(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!("failed to discard stored config: {}", e);
        }
    }
}

/// Shallow field-by-field merge of the stored filter over the defaults.
/// The defaults' `page_size` always wins, and the transient `search`/`page`
/// fields come back as defaults since they are never persisted.
fn merge_filter(defaults: &FilterConfig, stored: &Value) -> FilterConfig {
    let mut merged = match serde_json::to_value(defaults) {
        Ok(value) => value,
        Err(_) => return defaults.clone(),
    };
    if let (Some(target), Some(source)) = (merged.as_object_mut(), stored.as_object()) {
        for (key, value) in source {
            if key == "search" || key == "page" {
                continue;
            }
            target.insert(key.clone(), value.clone());
        }
    }
    match serde_json::from_value::<FilterConfig>(merged) {
        Ok(mut filter) => {
            filter.page_size = defaults.page_size;
            filter.page = defaults.page;
            filter
        }
        Err(e) => {
            warn!("stored filter did not merge cleanly, using defaults: {}", e);
            defaults.clone()
        }
    }
}

/// Reconciles stored column state against the current defaults.
///
/// For each default column (in default order), a stored column with the same
/// `(field, objectTypeId)` identity contributes its `visible`, `order`, and
/// `width`; everything else stays as the default defines it. Stored
/// typed-attribute columns with no default counterpart are user-added and
/// appended after the defaults.
pub fn merge_columns(defaults: &[ColumnConfig], stored: &[ColumnConfig]) -> Vec<ColumnConfig> {
    let mut merged: Vec<ColumnConfig> = defaults
        .iter()
        .map(|default| {
            let matched = stored
                .iter()
                .find(|s| s.matches(&default.field, default.object_type_id.as_deref()));
            match matched {
                Some(stored_col) => ColumnConfig {
                    visible: stored_col.visible,
                    order: stored_col.order,
                    width: if stored_col.width > 0 {
                        stored_col.width
                    } else {
                        default.width
                    },
                    ..default.clone()
                },
                None => default.clone(),
            }
        })
        .collect();

    for stored_col in stored {
        if stored_col.object_type_id.is_none() {
            continue;
        }
        let known = defaults
            .iter()
            .any(|d| d.matches(&stored_col.field, stored_col.object_type_id.as_deref()));
        if !known {
            merged.push(stored_col.clone());
        }
    }

    merged
}
