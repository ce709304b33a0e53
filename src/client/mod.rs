//! Collaborator seam: the record-listing and mutation endpoints consumed by
//! the pipeline and the bulk actions.
//!
//! Everything network-facing goes through [`RecordClient`] so hosts can plug
//! in their transport and tests can substitute the mock implementation.

#[cfg(feature = "mock")]
pub mod mock;

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LensResult;
use crate::model::ObjectRecord;

/// `total_count` arrives either as a bare number or, when a funnel filter is
/// active, as a breakdown object with per-step counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalCount {
    Simple(u64),
    WithSteps {
        total_count: u64,
        step_counts: HashMap<String, u64>,
    },
}

impl TotalCount {
    pub fn total(&self) -> u64 {
        match self {
            TotalCount::Simple(total) => *total,
            TotalCount::WithSteps { total_count, .. } => *total_count,
        }
    }

    pub fn step_counts(&self) -> Option<&HashMap<String, u64>> {
        match self {
            TotalCount::Simple(_) => None,
            TotalCount::WithSteps { step_counts, .. } => Some(step_counts),
        }
    }
}

/// One page of listing results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<ObjectRecord>,
    pub total_count: TotalCount,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

/// Per-type resolved values inside a merge request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeTypeValue {
    #[serde(rename = "typeId")]
    pub type_id: String,
    #[serde(rename = "typeValues")]
    pub type_values: Map<String, Value>,
}

/// The single aggregated merge submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub target_object_id: String,
    pub source_object_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_values: Vec<MergeTypeValue>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub id_string: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// The external endpoints this engine drives
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Fetches one page of records for the translated query parameters
    async fn list_records(&self, params: &BTreeMap<String, String>) -> LensResult<ListResponse>;

    /// Attaches one tag to one record
    async fn attach_tag(&self, record_id: &str, tag_id: &str) -> LensResult<()>;

    /// Places or moves one record into a funnel step with a sub-status
    async fn place_in_funnel(
        &self,
        record_id: &str,
        step_id: &str,
        sub_status: i32,
    ) -> LensResult<()>;

    /// Submits an assembled merge request
    async fn merge_objects(&self, request: &MergeRequest) -> LensResult<()>;
}
