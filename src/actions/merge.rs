//! Object-merge conflict resolution.
//!
//! Merging combines 2 to 5 records into one. For the basic fields the user
//! picks which record's value survives; for typed attributes shared by more
//! than one record each field is resolved either by picking one source or by
//! combining every non-empty value into a single comma-separated string.
//! Types held by exactly one record pass through untouched. The target of the
//! merge is the record whose canonical id-string was chosen.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use serde_json::{Map, Value};

use crate::client::{MergeRequest, MergeTypeValue, RecordClient};
use crate::error::{LensError, LensResult};
use crate::model::{ObjectRecord, ReferenceData};

pub const MIN_MERGE_RECORDS: usize = 2;
pub const MAX_MERGE_RECORDS: usize = 5;

/// Resolution of one typed-attribute field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    /// Record whose value wins when not combining
    pub source_object_id: String,
    /// Join every record's non-empty value instead of picking one
    pub combine: bool,
}

/// The user's resolution choices. The basic fields hold the *record id*
/// whose value was chosen, not the value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub name: String,
    pub description: String,
    pub id_string: String,
    /// type id -> field name -> resolution
    pub type_values: HashMap<String, HashMap<String, FieldSelection>>,
    /// Extra aliases to carry onto the merged record
    pub aliases: Vec<String>,
}

impl MergeConfig {
    /// Starting choices: every basic field taken from the first record,
    /// no per-field overrides.
    pub fn initial(records: &[ObjectRecord]) -> Self {
        let first = records.first().map(|r| r.id.clone()).unwrap_or_default();
        Self {
            name: first.clone(),
            description: first.clone(),
            id_string: first,
            type_values: HashMap::new(),
            aliases: Vec::new(),
        }
    }
}

/// A typed-attribute group held by more than one selected record, needing
/// per-field resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlappingType {
    pub type_id: String,
    pub type_name: String,
    /// Union of field names across holders, in first-seen order
    pub fields: Vec<String>,
}

/// Rejects selections outside the supported merge arity
pub fn validate_merge_selection(records: &[ObjectRecord]) -> LensResult<()> {
    if records.len() < MIN_MERGE_RECORDS {
        return Err(LensError::Validation(format!(
            "merging requires at least {} records",
            MIN_MERGE_RECORDS
        )));
    }
    if records.len() > MAX_MERGE_RECORDS {
        return Err(LensError::Validation(format!(
            "merging supports at most {} records",
            MAX_MERGE_RECORDS
        )));
    }
    Ok(())
}

/// Typed-attribute groups that need conflict resolution: those held by two
/// or more of the selected records. Order follows first appearance across
/// the selection.
pub fn overlapping_types(
    records: &[ObjectRecord],
    reference: &ReferenceData,
) -> Vec<OverlappingType> {
    let mut result = Vec::new();
    for type_id in type_ids_in_order(records) {
        let holders: Vec<&ObjectRecord> = records
            .iter()
            .filter(|r| r.type_value(&type_id).is_some())
            .collect();
        if holders.len() < 2 {
            continue;
        }
        let mut fields: Vec<String> = Vec::new();
        for holder in &holders {
            if let Some(entry) = holder.type_value(&type_id) {
                for field in entry.type_values.keys() {
                    if !fields.iter().any(|f| f == field) {
                        fields.push(field.clone());
                    }
                }
            }
        }
        let type_name = reference
            .object_type(&type_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| type_id.clone());
        result.push(OverlappingType {
            type_id,
            type_name,
            fields,
        });
    }
    result
}

fn type_ids_in_order(records: &[ObjectRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for record in records {
        for entry in &record.type_values {
            if !seen.iter().any(|t| t == &entry.object_type_id) {
                seen.push(entry.object_type_id.clone());
            }
        }
    }
    seen
}

/// Builds the merge submission payload from the selection and the user's
/// resolution choices.
///
/// The target is the record whose id-string was chosen; every other selected
/// record becomes a source. Overlapping types are resolved field by field,
/// single-holder types pass through unchanged, and the alias list is the
/// deduplicated union of all aliases and id-strings minus the surviving
/// id-string.
pub fn build_merge_request(
    records: &[ObjectRecord],
    config: &MergeConfig,
) -> LensResult<MergeRequest> {
    validate_merge_selection(records)?;

    let find = |id: &str, what: &str| -> LensResult<&ObjectRecord> {
        records.iter().find(|r| r.id == id).ok_or_else(|| {
            LensError::MergeValidation(format!("{} choice '{}' is not a selected record", what, id))
        })
    };
    let name_source = find(&config.name, "name")?;
    let description_source = find(&config.description, "description")?;
    let target = find(&config.id_string, "id-string")?;

    let overlap = overlapping_types(records, &ReferenceData::default());
    let mut type_values: Vec<MergeTypeValue> = Vec::new();
    for type_id in type_ids_in_order(records) {
        let resolved = match overlap.iter().find(|t| t.type_id == type_id) {
            Some(overlapping) => resolve_overlapping(records, config, overlapping)?,
            None => passthrough_type(records, &type_id),
        };
        if !resolved.is_empty() {
            type_values.push(MergeTypeValue {
                type_id,
                type_values: resolved,
            });
        }
    }

    let aliases = merged_aliases(records, &config.aliases, &target.id_string);
    let source_object_ids: Vec<String> = records
        .iter()
        .filter(|r| r.id != target.id)
        .map(|r| r.id.clone())
        .collect();

    Ok(MergeRequest {
        target_object_id: target.id.clone(),
        source_object_ids,
        type_values,
        name: name_source.name.clone(),
        description: description_source.description.clone(),
        id_string: target.id_string.clone(),
        aliases,
    })
}

fn resolve_overlapping(
    records: &[ObjectRecord],
    config: &MergeConfig,
    overlapping: &OverlappingType,
) -> LensResult<Map<String, Value>> {
    let choices = config.type_values.get(&overlapping.type_id);
    let default_source = records[0].id.clone();
    let mut resolved = Map::new();

    for field in &overlapping.fields {
        let selection = choices.and_then(|c| c.get(field));
        let combine = selection.map(|s| s.combine).unwrap_or(false);
        if combine {
            let joined = combine_values(records, &overlapping.type_id, field);
            resolved.insert(field.clone(), Value::String(joined));
            continue;
        }
        let source_id = selection
            .map(|s| s.source_object_id.as_str())
            .unwrap_or(default_source.as_str());
        let source = records.iter().find(|r| r.id == source_id).ok_or_else(|| {
            LensError::MergeValidation(format!(
                "field '{}' resolves to '{}', which is not a selected record",
                field, source_id
            ))
        })?;
        if let Some(value) = source.field_value(&overlapping.type_id, field) {
            resolved.insert(field.clone(), value.clone());
        }
    }
    Ok(resolved)
}

fn combine_values(records: &[ObjectRecord], type_id: &str, field: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for record in records {
        if let Some(value) = record.field_value(type_id, field) {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => serde_json::to_string(other).unwrap_or_default(),
            };
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
    }
    parts.join(", ")
}

fn passthrough_type(records: &[ObjectRecord], type_id: &str) -> Map<String, Value> {
    records
        .iter()
        .find_map(|r| r.type_value(type_id))
        .map(|entry| entry.type_values.clone())
        .unwrap_or_default()
}

fn merged_aliases(records: &[ObjectRecord], extra: &[String], surviving: &str) -> Vec<String> {
    let mut aliases: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        if candidate.is_empty() || candidate == surviving {
            return;
        }
        if !aliases.iter().any(|a| a == candidate) {
            aliases.push(candidate.to_string());
        }
    };
    for record in records {
        for alias in &record.aliases {
            push(alias);
        }
        push(&record.id_string);
    }
    for alias in extra {
        push(alias);
    }
    aliases
}

/// Lifecycle of the merge dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePhase {
    /// Choices are being edited
    Configuring,
    /// Submission in flight; the dialog cannot be dismissed
    Submitting,
    /// Merge accepted; carries the surviving record's id
    Success { target_object_id: String },
    /// Submission failed; choices are intact and can be resubmitted
    Error(String),
}

/// Drives a merge from selection through submission
pub struct MergeDialog<C: RecordClient> {
    client: Arc<C>,
    records: Vec<ObjectRecord>,
    config: MergeConfig,
    phase: MergePhase,
    dirty: bool,
}

impl<C: RecordClient> MergeDialog<C> {
    /// Opens the dialog over a selection; rejects unsupported arities
    pub fn open(client: Arc<C>, records: Vec<ObjectRecord>) -> LensResult<Self> {
        validate_merge_selection(&records)?;
        let config = MergeConfig::initial(&records);
        Ok(Self {
            client,
            records,
            config,
            phase: MergePhase::Configuring,
            dirty: false,
        })
    }

    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn phase(&self) -> &MergePhase {
        &self.phase
    }

    /// True once any choice differs from the initial configuration
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn overlapping_types(&self, reference: &ReferenceData) -> Vec<OverlappingType> {
        overlapping_types(&self.records, reference)
    }

    pub fn choose_name(&mut self, record_id: impl Into<String>) {
        self.config.name = record_id.into();
        self.dirty = true;
    }

    pub fn choose_description(&mut self, record_id: impl Into<String>) {
        self.config.description = record_id.into();
        self.dirty = true;
    }

    pub fn choose_id_string(&mut self, record_id: impl Into<String>) {
        self.config.id_string = record_id.into();
        self.dirty = true;
    }

    pub fn set_field_selection(
        &mut self,
        type_id: impl Into<String>,
        field: impl Into<String>,
        selection: FieldSelection,
    ) {
        self.config
            .type_values
            .entry(type_id.into())
            .or_default()
            .insert(field.into(), selection);
        self.dirty = true;
    }

    pub fn set_aliases(&mut self, aliases: Vec<String>) {
        self.config.aliases = aliases;
        self.dirty = true;
    }

    /// Submits the merge. On a validation failure the dialog stays in
    /// `Configuring` with every choice intact; on a client failure it moves
    /// to `Error` and can be resubmitted. Returns the surviving record's id.
    pub async fn submit(&mut self) -> LensResult<String> {
        match self.phase {
            MergePhase::Configuring | MergePhase::Error(_) => {}
            _ => {
                return Err(LensError::Validation(
                    "merge already submitted".to_string(),
                ));
            }
        }

        let request = match build_merge_request(&self.records, &self.config) {
            Ok(request) => request,
            Err(e) => {
                self.phase = MergePhase::Configuring;
                return Err(e);
            }
        };

        self.phase = MergePhase::Submitting;
        match self.client.merge_objects(&request).await {
            Ok(()) => {
                info!(
                    "merged {} records into {}",
                    self.records.len(),
                    request.target_object_id
                );
                self.phase = MergePhase::Success {
                    target_object_id: request.target_object_id.clone(),
                };
                Ok(request.target_object_id)
            }
            Err(e) => {
                self.phase = MergePhase::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Whether dismissing now needs an explicit confirmation: choices were
    /// made and the merge has not gone through.
    pub fn close_needs_confirmation(&self) -> bool {
        self.dirty && !matches!(self.phase, MergePhase::Success { .. })
    }

    /// Attempts to dismiss the dialog. Refused while submitting; a dirty
    /// unsubmitted dialog closes only when `confirmed` is set.
    pub fn close(&self, confirmed: bool) -> bool {
        if matches!(self.phase, MergePhase::Submitting) {
            return false;
        }
        if self.close_needs_confirmation() && !confirmed {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeValueEntry;
    use serde_json::json;

    fn record_with_type(
        id: &str,
        id_string: &str,
        type_id: &str,
        fields: &[(&str, Value)],
    ) -> ObjectRecord {
        let mut map = Map::new();
        for (key, value) in fields {
            map.insert(key.to_string(), value.clone());
        }
        ObjectRecord {
            id: id.to_string(),
            id_string: id_string.to_string(),
            name: format!("record {}", id),
            description: format!("about {}", id),
            type_values: vec![TypeValueEntry {
                id: format!("tv-{}", id),
                object_type_id: type_id.to_string(),
                type_values: map,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_selection_arity() {
        let one = vec![ObjectRecord::default()];
        assert!(validate_merge_selection(&one).is_err());
        let six: Vec<ObjectRecord> = (0..6).map(|_| ObjectRecord::default()).collect();
        assert!(validate_merge_selection(&six).is_err());
        let two: Vec<ObjectRecord> = (0..2).map(|_| ObjectRecord::default()).collect();
        assert!(validate_merge_selection(&two).is_ok());
    }

    #[test]
    fn test_overlap_detection_ignores_single_holders() {
        let records = vec![
            record_with_type("a", "A", "shared", &[("city", json!("Oslo"))]),
            record_with_type("b", "B", "shared", &[("city", json!("Bergen")), ("phone", json!("555"))]),
            record_with_type("c", "C", "solo", &[("note", json!("x"))]),
        ];
        let overlap = overlapping_types(&records, &ReferenceData::default());
        assert_eq!(overlap.len(), 1);
        assert_eq!(overlap[0].type_id, "shared");
        assert_eq!(overlap[0].fields, vec!["city", "phone"]);
    }

    #[test]
    fn test_pick_and_combine_resolutions() {
        let records = vec![
            record_with_type("a", "A", "shared", &[("city", json!("Oslo")), ("phone", json!("111"))]),
            record_with_type("b", "B", "shared", &[("city", json!("Bergen")), ("phone", json!(""))]),
        ];
        let mut config = MergeConfig::initial(&records);
        let mut fields = HashMap::new();
        fields.insert(
            "city".to_string(),
            FieldSelection {
                source_object_id: "b".to_string(),
                combine: false,
            },
        );
        fields.insert(
            "phone".to_string(),
            FieldSelection {
                source_object_id: String::new(),
                combine: true,
            },
        );
        config.type_values.insert("shared".to_string(), fields);

        let request = build_merge_request(&records, &config).unwrap();
        assert_eq!(request.type_values.len(), 1);
        let resolved = &request.type_values[0].type_values;
        assert_eq!(resolved["city"], json!("Bergen"));
        // empty values are dropped from a combine
        assert_eq!(resolved["phone"], json!("111"));
    }

    #[test]
    fn test_combine_joins_non_empty_values() {
        let records = vec![
            record_with_type("a", "A", "t", &[("note", json!("first"))]),
            record_with_type("b", "B", "t", &[("note", json!(null))]),
            record_with_type("c", "C", "t", &[("note", json!("third"))]),
        ];
        assert_eq!(combine_values(&records, "t", "note"), "first, third");
    }

    #[test]
    fn test_target_and_sources_follow_id_string_choice() {
        let records = vec![
            record_with_type("a", "A", "t", &[]),
            record_with_type("b", "B", "t", &[]),
            record_with_type("c", "C", "t", &[]),
        ];
        let mut config = MergeConfig::initial(&records);
        config.id_string = "b".to_string();

        let request = build_merge_request(&records, &config).unwrap();
        assert_eq!(request.target_object_id, "b");
        assert_eq!(request.id_string, "B");
        assert_eq!(request.source_object_ids, vec!["a", "c"]);
        assert_eq!(request.name, "record a");
        assert_eq!(request.description, "about a");
    }

    #[test]
    fn test_aliases_union_excludes_survivor() {
        let mut a = record_with_type("a", "A", "t", &[]);
        a.aliases = vec!["alpha".to_string(), "A".to_string()];
        let mut b = record_with_type("b", "B", "t", &[]);
        b.aliases = vec!["alpha".to_string(), "beta".to_string()];
        let records = vec![a, b];

        let config = MergeConfig::initial(&records); // survivor is "a" / "A"
        let request = build_merge_request(&records, &config).unwrap();
        assert_eq!(request.aliases, vec!["alpha", "beta", "B"]);
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let records = vec![
            record_with_type("a", "A", "t", &[]),
            record_with_type("b", "B", "t", &[]),
        ];
        let mut config = MergeConfig::initial(&records);
        config.name = "stranger".to_string();
        let err = build_merge_request(&records, &config).unwrap_err();
        assert!(matches!(err, LensError::MergeValidation(_)));
    }
}
