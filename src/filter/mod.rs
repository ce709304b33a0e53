//! Composable filter model: configuration, query translation, and the
//! pub-sub filter store.

pub mod config;
pub mod query;
pub mod store;

pub use config::{
    FilterConfig, FilterUpdate, FunnelStepFilter, TypeValueCriterion, TypeValueFilter,
    DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD,
};
pub use query::{build_query, parse_type_value_sort};
pub use store::FilterStore;
