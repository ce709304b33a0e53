//! Query translation: `FilterConfig` to flat listing-request parameters.
//!
//! Pure and deterministic; never mutates its input. The output map matches
//! the listing collaborator's GET contract: `q`, `tag_ids`, `type_ids`,
//! `order_by`, `ascending`, `type_value_criteria1..3`, `type_value_field`,
//! `step_ids`, `sub_status`, `page`, `page_size`.

use std::collections::BTreeMap;

use serde_json::json;

use super::config::FilterConfig;

/// Prefix marking a sort key that targets a typed-attribute field
const TYPE_VALUE_SORT_PREFIX: &str = "type_value:";

/// Splits a `type_value:<typeId>:<field>` sort key into its parts.
/// Returns `None` for standard sort keys.
pub fn parse_type_value_sort(sort_by: &str) -> Option<(&str, &str)> {
    let rest = sort_by.strip_prefix(TYPE_VALUE_SORT_PREFIX)?;
    let (type_id, field) = rest.split_once(':')?;
    if type_id.is_empty() || field.is_empty() {
        return None;
    }
    Some((type_id, field))
}

/// Translates a filter configuration into flat request parameters
pub fn build_query(config: &FilterConfig) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    if let Some(search) = &config.search {
        if !search.is_empty() {
            params.insert("q".to_string(), search.clone());
        }
    }
    if !config.tag_ids.is_empty() {
        params.insert("tag_ids".to_string(), config.tag_ids.join(","));
    }
    if !config.type_ids.is_empty() {
        params.insert("type_ids".to_string(), config.type_ids.join(","));
    }

    match parse_type_value_sort(&config.sort_by) {
        Some((_type_id, field)) => {
            params.insert("order_by".to_string(), "type_value".to_string());
            params.insert("type_value_field".to_string(), field.to_string());
        }
        None => {
            params.insert("order_by".to_string(), config.sort_by.clone());
        }
    }
    params.insert("ascending".to_string(), config.ascending.to_string());

    if let Some(criteria) = &config.type_value_criteria {
        for (index, slot) in criteria.slots().iter().enumerate() {
            let Some(criterion) = slot else { continue };
            if !criterion.is_active() {
                continue;
            }
            // wire format: type_value_criteriaN = {"<field>": "<value>"}
            let body = json!({ criterion.field.clone(): criterion.value.clone() });
            params.insert(
                format!("type_value_criteria{}", index + 1),
                body.to_string(),
            );
        }
    }

    if let Some(funnel) = &config.funnel_step_filter {
        if funnel.funnel_id.is_some() {
            params.insert("step_ids".to_string(), funnel.step_ids.join(","));
            if !funnel.sub_statuses.is_empty() {
                let joined = funnel
                    .sub_statuses
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                params.insert("sub_status".to_string(), joined);
            }
        }
    }

    params.insert("page".to_string(), config.page.to_string());
    params.insert("page_size".to_string(), config.page_size.to_string());

    params
}
