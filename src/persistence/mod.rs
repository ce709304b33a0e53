//! Injectable key-value persistence for view/filter configuration.
//!
//! The config cache is storage-agnostic: anything implementing
//! [`ConfigStore`] works. The sled implementation keeps its own tree and
//! flushes on write so configs survive an unclean shutdown; the in-memory
//! implementation backs tests.

pub mod cache;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{LensError, LensResult};

pub use cache::{ConfigCache, HydratedConfig, CONFIG_STORAGE_KEY, CONFIG_VERSION};

/// Durable key-value storage for serialized configuration entries
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> LensResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LensResult<()>;
    fn remove(&self, key: &str) -> LensResult<()>;
}

/// Sled-backed config store using a dedicated tree
pub struct SledConfigStore {
    tree: sled::Tree,
}

impl SledConfigStore {
    pub fn new(db: &sled::Db) -> LensResult<Self> {
        let tree = db.open_tree("view_configs")?;
        Ok(Self { tree })
    }

    /// Opens (or creates) a database at `path` and uses its config tree
    pub fn open(path: impl AsRef<std::path::Path>) -> LensResult<Self> {
        let db = sled::open(path)?;
        Self::new(&db)
    }
}

impl ConfigStore for SledConfigStore {
    fn get(&self, key: &str) -> LensResult<Option<String>> {
        match self.tree.get(key.as_bytes())? {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    LensError::Persistence(format!("stored config is not UTF-8: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> LensResult<()> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        // Ensure the entry is durably written to disk
        self.tree.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> LensResult<()> {
        self.tree.remove(key.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

/// In-memory config store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryConfigStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> LensResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LensResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LensResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
