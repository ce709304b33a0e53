//! Unified error handling for objectlens.
//!
//! Errors are grouped by the boundary they belong to rather than by the module
//! that raised them. Fetch and persistence failures are absorbed at the
//! pipeline/cache boundary and surface as state flags; validation and merge
//! errors stay inside the action layer that produced them.

use thiserror::Error;

/// Errors that can occur within the objectlens engine
#[derive(Error, Debug)]
pub enum LensError {
    /// A bulk-action precondition failed before execution started
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A listing request failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Config read/write against the key-value store failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A merge submission was missing a required resolution
    #[error("Merge validation failed: {0}")]
    MergeValidation(String),

    /// A collaborator call failed mid-action
    #[error("Client error: {0}")]
    Client(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Sled(#[from] sled::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for objectlens operations
pub type LensResult<T> = Result<T, LensError>;

impl LensError {
    /// True when the error blocks an action from starting rather than
    /// reporting a mid-flight failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, LensError::Validation(_) | LensError::MergeValidation(_))
    }
}
