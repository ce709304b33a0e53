//! View configuration: column layout, density, display mode, and the
//! per-source customization restrictions.

pub mod columns;
pub mod config;
pub mod store;

pub use columns::ColumnSpec;
pub use config::{
    default_columns, ColumnConfig, ColumnFormat, Density, DisplayMode, PredefinedView,
    ViewConfig, ViewRestrictions, ViewSource, MIN_COLUMN_WIDTH,
};
pub use store::{ViewStore, ViewUpdate};
