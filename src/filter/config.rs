//! Filter configuration and partial updates.
//!
//! `FilterConfig` is the complete filter state for one listing surface;
//! `FilterUpdate` is the shallow-merge carrier applied by the store. Field
//! names serialize in the persisted wire casing (`tagIds`, `sortBy`, ...) so
//! stored configs stay compatible with the config cache format.

use serde::{Deserialize, Serialize};

/// Default page size; the host usually overrides this with its per-page setting
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default sort key for a fresh filter
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// One typed-field predicate: all three parts must be present for the
/// criterion to take effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeValueCriterion {
    #[serde(rename = "typeId")]
    pub type_id: String,
    pub field: String,
    pub value: String,
}

impl TypeValueCriterion {
    /// A criterion only participates in the query when every part is filled in
    pub fn is_active(&self) -> bool {
        !self.type_id.is_empty() && !self.field.is_empty() && !self.value.is_empty()
    }
}

/// Up to three simultaneous typed-field predicates
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeValueFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria1: Option<TypeValueCriterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria2: Option<TypeValueCriterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria3: Option<TypeValueCriterion>,
}

impl TypeValueFilter {
    /// The criteria slots in emission order
    pub fn slots(&self) -> [&Option<TypeValueCriterion>; 3] {
        [&self.criteria1, &self.criteria2, &self.criteria3]
    }
}

/// Restricts results to records placed in particular funnel steps,
/// optionally narrowed to particular sub-statuses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunnelStepFilter {
    #[serde(rename = "funnelId")]
    pub funnel_id: Option<String>,
    #[serde(rename = "stepIds", default)]
    pub step_ids: Vec<String>,
    #[serde(rename = "subStatuses", default)]
    pub sub_statuses: Vec<i32>,
}

/// Complete filter state for a listing surface.
///
/// `page` is 1-based. Tag and type id lists carry set semantics; order is
/// irrelevant to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "tagIds", default)]
    pub tag_ids: Vec<String>,
    #[serde(rename = "typeIds", default)]
    pub type_ids: Vec<String>,
    #[serde(rename = "typeValueCriteria", default, skip_serializing_if = "Option::is_none")]
    pub type_value_criteria: Option<TypeValueFilter>,
    #[serde(rename = "funnelStepFilter", default, skip_serializing_if = "Option::is_none")]
    pub funnel_step_filter: Option<FunnelStepFilter>,
    #[serde(rename = "sortBy")]
    pub sort_by: String,
    pub ascending: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search: None,
            tag_ids: Vec::new(),
            type_ids: Vec::new(),
            type_value_criteria: None,
            funnel_step_filter: None,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            ascending: false,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Partial update applied on top of an existing [`FilterConfig`].
///
/// `None` leaves a field untouched. Clearable fields carry a nested `Option`
/// so "clear the search box" and "don't touch the search box" stay distinct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub search: Option<Option<String>>,
    pub tag_ids: Option<Vec<String>>,
    pub type_ids: Option<Vec<String>>,
    pub type_value_criteria: Option<Option<TypeValueFilter>>,
    pub funnel_step_filter: Option<Option<FunnelStepFilter>>,
    pub sort_by: Option<String>,
    pub ascending: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl FilterUpdate {
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(Some(value.into())),
            ..Default::default()
        }
    }

    pub fn clear_search() -> Self {
        Self {
            search: Some(None),
            ..Default::default()
        }
    }

    pub fn tags(tag_ids: Vec<String>) -> Self {
        Self {
            tag_ids: Some(tag_ids),
            ..Default::default()
        }
    }

    pub fn types(type_ids: Vec<String>) -> Self {
        Self {
            type_ids: Some(type_ids),
            ..Default::default()
        }
    }

    pub fn criteria(filter: Option<TypeValueFilter>) -> Self {
        Self {
            type_value_criteria: Some(filter),
            ..Default::default()
        }
    }

    pub fn funnel(filter: Option<FunnelStepFilter>) -> Self {
        Self {
            funnel_step_filter: Some(filter),
            ..Default::default()
        }
    }

    pub fn sort(sort_by: impl Into<String>, ascending: bool) -> Self {
        Self {
            sort_by: Some(sort_by.into()),
            ascending: Some(ascending),
            ..Default::default()
        }
    }

    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    /// True when the update touches anything besides pagination. Such updates
    /// reset `page` to 1 when applied.
    pub fn touches_filter_fields(&self) -> bool {
        self.search.is_some()
            || self.tag_ids.is_some()
            || self.type_ids.is_some()
            || self.type_value_criteria.is_some()
            || self.funnel_step_filter.is_some()
            || self.sort_by.is_some()
            || self.ascending.is_some()
    }

    /// Shallow-merge this update into `config`, applying the page-reset
    /// invariant.
    pub fn apply(self, config: &FilterConfig) -> FilterConfig {
        let reset_page = self.touches_filter_fields();
        let mut next = config.clone();

        if let Some(search) = self.search {
            next.search = search;
        }
        if let Some(tag_ids) = self.tag_ids {
            next.tag_ids = tag_ids;
        }
        if let Some(type_ids) = self.type_ids {
            next.type_ids = type_ids;
        }
        if let Some(criteria) = self.type_value_criteria {
            next.type_value_criteria = criteria;
        }
        if let Some(funnel) = self.funnel_step_filter {
            next.funnel_step_filter = funnel;
        }
        if let Some(sort_by) = self.sort_by {
            next.sort_by = sort_by;
        }
        if let Some(ascending) = self.ascending {
            next.ascending = ascending;
        }
        if let Some(page_size) = self.page_size {
            next.page_size = page_size;
        }
        if reset_page {
            next.page = 1;
        } else if let Some(page) = self.page {
            next.page = page;
        }

        next
    }
}
