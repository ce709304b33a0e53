//! objectlens: an interactive record-exploration engine.
//!
//! The crate is organized as a set of composable layers around one listing
//! surface:
//!
//! - [`filter`] — the composable filter model and its query translation
//! - [`view`] — column layout, display mode, and the column-manager operations
//! - [`persistence`] — versioned config storage with defaults-aware merging
//! - [`pipeline`] — the debounced reactive fetch loop
//! - [`selection`] — cross-page record selection
//! - [`actions`] — sequential bulk actions, CSV export, and object merging
//! - [`client`] — the backend seam the pipeline and actions talk through
//!
//! State flows one way: filter updates feed the pipeline, the pipeline
//! publishes listing state, and bulk actions run over the selection before
//! triggering a refresh through the same filter store.

pub mod actions;
pub mod client;
pub mod error;
pub mod filter;
pub mod model;
pub mod persistence;
pub mod pipeline;
pub mod selection;
pub mod view;

pub use actions::{BulkAction, BulkExecutor, BulkProgress, BulkReport};
pub use client::RecordClient;
pub use error::{LensError, LensResult};
pub use filter::{FilterConfig, FilterStore, FilterUpdate};
pub use model::{ObjectRecord, ReferenceData};
pub use persistence::{ConfigCache, ConfigStore, HydratedConfig};
pub use pipeline::{FetchPipeline, ListingState};
pub use selection::SelectionModel;
pub use view::{ViewConfig, ViewStore};
