//! Core data model for objectlens.
//!
//! Records ("objects") carry dynamic typed attributes (type values), tag
//! references, and funnel-step placements. The catalogs that describe tags,
//! object types, and funnels are shared read-only reference data: components
//! that need them receive a [`ReferenceData`] snapshot explicitly instead of
//! reaching into ambient state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tag attached to a record. The listing endpoint only returns the id;
/// names and colors come from the tag catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: String,
}

/// One typed-attribute group attached to a record: the object type it
/// instantiates plus its key-value contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeValueEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "objectTypeId")]
    pub object_type_id: String,
    pub type_values: Map<String, Value>,
}

/// A record's placement within a funnel step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepPlacement {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "stepId")]
    pub step_id: String,
    #[serde(rename = "subStatus", default)]
    pub sub_status: i32,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<String>,
}

/// The primary entity being filtered, tagged, placed in funnels, and merged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: String,
    #[serde(default)]
    pub id_string: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub first_fact_date: Option<String>,
    #[serde(default)]
    pub last_fact_date: Option<String>,
    #[serde(default)]
    pub search_rank: Option<f64>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub type_values: Vec<TypeValueEntry>,
    #[serde(default)]
    pub steps: Vec<StepPlacement>,
}

impl ObjectRecord {
    /// The typed-attribute entry for a given object type, if the record has one
    pub fn type_value(&self, object_type_id: &str) -> Option<&TypeValueEntry> {
        self.type_values
            .iter()
            .find(|tv| tv.object_type_id == object_type_id)
    }

    /// A single typed-attribute field value, if present
    pub fn field_value(&self, object_type_id: &str, field: &str) -> Option<&Value> {
        self.type_value(object_type_id)
            .and_then(|tv| tv.type_values.get(field))
    }
}

// ========== Reference catalogs ==========

/// Tag catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color_schema: ColorSchema,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorSchema {
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub text: String,
}

/// Object-type catalog entry: a dynamically-defined field group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// One ordered stage of a funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStep {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: i32,
}

/// A named pipeline and its ordered stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funnel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<FunnelStep>,
}

/// Read-only snapshot of the shared catalogs. Built once by the host and
/// passed to the components that need it; mutation is owned elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub object_types: Vec<ObjectTypeDef>,
    #[serde(default)]
    pub funnels: Vec<Funnel>,
}

impl ReferenceData {
    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn object_type(&self, id: &str) -> Option<&ObjectTypeDef> {
        self.object_types.iter().find(|t| t.id == id)
    }

    pub fn funnel(&self, id: &str) -> Option<&Funnel> {
        self.funnels.iter().find(|f| f.id == id)
    }

    /// Steps of a funnel, in declared order. Empty when the funnel is unknown.
    pub fn funnel_steps(&self, funnel_id: &str) -> &[FunnelStep] {
        self.funnel(funnel_id).map(|f| f.steps.as_slice()).unwrap_or(&[])
    }
}

// ========== Sub-status ==========

/// Fine-grained per-record status within a funnel step
pub fn sub_status_label(sub_status: i32) -> &'static str {
    match sub_status {
        0 => "To Engage",
        1 => "Proceeding",
        2 => "Drop Out",
        _ => "Unknown",
    }
}

/// The selectable sub-status values
pub fn sub_status_options() -> [i32; 3] {
    [0, 1, 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with_type_values() -> ObjectRecord {
        serde_json::from_value(json!({
            "id": "obj-1",
            "id_string": "ACME",
            "name": "Acme Corp",
            "description": "industrial supplier",
            "created_at": "2024-01-05T10:00:00Z",
            "tags": [{"id": "tag-1"}],
            "type_values": [{
                "id": "tv-1",
                "objectTypeId": "type-crm",
                "type_values": {"email": "hello@acme.example", "score": "10"}
            }],
            "steps": [{"id": "s-1", "stepId": "step-9", "subStatus": 1}]
        }))
        .unwrap()
    }

    #[test]
    fn test_record_deserializes_wire_shape() {
        let record = record_with_type_values();
        assert_eq!(record.id, "obj-1");
        assert_eq!(record.tags[0].id, "tag-1");
        assert_eq!(record.type_values[0].object_type_id, "type-crm");
        assert_eq!(record.steps[0].sub_status, 1);
        // fields absent from the payload fall back to defaults
        assert!(record.aliases.is_empty());
        assert!(record.first_fact_date.is_none());
    }

    #[test]
    fn test_field_value_lookup() {
        let record = record_with_type_values();
        assert_eq!(
            record.field_value("type-crm", "score"),
            Some(&json!("10"))
        );
        assert!(record.field_value("type-crm", "missing").is_none());
        assert!(record.field_value("type-other", "score").is_none());
    }

    #[test]
    fn test_sub_status_labels() {
        assert_eq!(sub_status_label(0), "To Engage");
        assert_eq!(sub_status_label(1), "Proceeding");
        assert_eq!(sub_status_label(2), "Drop Out");
        assert_eq!(sub_status_label(7), "Unknown");
        assert_eq!(sub_status_options(), [0, 1, 2]);
    }

    #[test]
    fn test_reference_data_lookups() {
        let reference = ReferenceData {
            tags: vec![],
            object_types: vec![ObjectTypeDef {
                id: "type-crm".to_string(),
                name: "CRM".to_string(),
                fields: Map::new(),
            }],
            funnels: vec![Funnel {
                id: "f-1".to_string(),
                name: "Sales".to_string(),
                description: String::new(),
                steps: vec![FunnelStep {
                    id: "step-9".to_string(),
                    name: "Qualified".to_string(),
                    order: 0,
                }],
            }],
        };
        assert_eq!(reference.object_type("type-crm").unwrap().name, "CRM");
        assert_eq!(reference.funnel_steps("f-1").len(), 1);
        assert!(reference.funnel_steps("f-missing").is_empty());
    }
}
