//! View configuration types and the standard column catalog.

use serde::{Deserialize, Serialize};

/// Columns can never be resized below this width
pub const MIN_COLUMN_WIDTH: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Table,
    Kanban,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Comfortable,
    Compact,
}

/// How a column's values render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFormat {
    Text,
    Date,
    Number,
    Boolean,
    Object,
}

/// One column of the listing table.
///
/// Identity is the `(field, object_type_id)` pair: a standard column has no
/// `object_type_id`, a typed-attribute column carries the object type it
/// belongs to. Identity pairs are unique within a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub field: String,
    #[serde(default)]
    pub label: String,
    pub width: u32,
    pub visible: bool,
    pub order: usize,
    #[serde(default = "default_sortable")]
    pub sortable: bool,
    #[serde(rename = "objectTypeId", default, skip_serializing_if = "Option::is_none")]
    pub object_type_id: Option<String>,
    #[serde(rename = "formatType", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ColumnFormat>,
}

fn default_sortable() -> bool {
    true
}

impl ColumnConfig {
    /// Identity comparison: field plus owning object type
    pub fn matches(&self, field: &str, object_type_id: Option<&str>) -> bool {
        self.field == field && self.object_type_id.as_deref() == object_type_id
    }

    /// True for columns backed by a typed attribute rather than a standard field
    pub fn is_type_value(&self) -> bool {
        self.object_type_id.is_some()
    }
}

/// Column layout, density, and display mode for one listing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(rename = "displayMode")]
    pub display_mode: DisplayMode,
    pub density: Density,
    pub columns: Vec<ColumnConfig>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Table,
            density: Density::Comfortable,
            columns: default_columns(),
        }
    }
}

impl ViewConfig {
    /// Visible columns in render order
    pub fn visible_columns(&self) -> Vec<&ColumnConfig> {
        let mut visible: Vec<&ColumnConfig> =
            self.columns.iter().filter(|c| c.visible).collect();
        visible.sort_by_key(|c| c.order);
        visible
    }

    pub fn column(&self, field: &str, object_type_id: Option<&str>) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.matches(field, object_type_id))
    }
}

/// The standard columns every record listing starts from
pub fn default_columns() -> Vec<ColumnConfig> {
    fn column(
        field: &str,
        label: &str,
        width: u32,
        visible: bool,
        order: usize,
        format: Option<ColumnFormat>,
    ) -> ColumnConfig {
        ColumnConfig {
            field: field.to_string(),
            label: label.to_string(),
            width,
            visible,
            order,
            sortable: true,
            object_type_id: None,
            format,
        }
    }

    vec![
        column("name", "Name", 200, true, 0, None),
        column("created_at", "Created Date", 150, true, 1, Some(ColumnFormat::Date)),
        column("first_fact_date", "First Fact", 150, false, 2, Some(ColumnFormat::Date)),
        column("last_fact_date", "Last Fact", 150, false, 3, Some(ColumnFormat::Date)),
        column("id_string", "ID String", 150, false, 4, None),
        column("tags", "Tags", 150, true, 5, Some(ColumnFormat::Object)),
        column("type_values", "Type Values", 150, false, 6, Some(ColumnFormat::Object)),
    ]
}

/// The context a view configuration originates from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewSource {
    /// A predefined view with restricted customization
    Predefined { id: String },
    /// An ad-hoc view, fully customizable
    Temporary,
}

/// Customization limits attached to a view source, not to the config itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRestrictions {
    pub allow_customization: bool,
    /// Columns that cannot be reordered or dragged
    pub restricted_columns: Vec<String>,
    /// Columns that cannot be hidden or removed
    pub required_columns: Vec<String>,
}

impl ViewRestrictions {
    /// Restrictions for an ad-hoc view: everything allowed, name always shown
    pub fn temporary() -> Self {
        Self {
            allow_customization: true,
            restricted_columns: Vec::new(),
            required_columns: vec!["name".to_string()],
        }
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required_columns.iter().any(|f| f == field)
    }

    pub fn is_restricted(&self, field: &str) -> bool {
        self.restricted_columns.iter().any(|f| f == field)
    }
}

impl Default for ViewRestrictions {
    fn default() -> Self {
        Self::temporary()
    }
}

/// Registry entry for a predefined view: its base config plus restrictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredefinedView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: ViewConfig,
    pub restrictions: ViewRestrictions,
}

impl ViewSource {
    /// Resolves the restrictions for this source against the predefined-view
    /// registry. Unknown predefined ids fall back to temporary semantics.
    pub fn restrictions(&self, registry: &[PredefinedView]) -> ViewRestrictions {
        match self {
            ViewSource::Predefined { id } => registry
                .iter()
                .find(|v| &v.id == id)
                .map(|v| v.restrictions.clone())
                .unwrap_or_else(ViewRestrictions::temporary),
            ViewSource::Temporary => ViewRestrictions::temporary(),
        }
    }

    /// Resolves the starting configuration for this source
    pub fn initial_config(&self, registry: &[PredefinedView]) -> ViewConfig {
        match self {
            ViewSource::Predefined { id } => registry
                .iter()
                .find(|v| &v.id == id)
                .map(|v| v.config.clone())
                .unwrap_or_default(),
            ViewSource::Temporary => ViewConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns_shape() {
        let columns = default_columns();
        assert_eq!(columns.len(), 7);
        let view = ViewConfig::default();
        let visible: Vec<&str> = view
            .visible_columns()
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(visible, vec!["name", "created_at", "tags"]);
    }

    #[test]
    fn test_identity_matching() {
        let mut column = default_columns().remove(0);
        assert!(column.matches("name", None));
        assert!(!column.matches("name", Some("t1")));

        column.object_type_id = Some("t1".to_string());
        assert!(column.matches("name", Some("t1")));
        assert!(!column.matches("name", None));
        assert!(column.is_type_value());
    }

    #[test]
    fn test_persisted_casing() {
        let value = serde_json::to_value(ViewConfig::default()).unwrap();
        assert!(value.get("displayMode").is_some());
        let first = &value["columns"][0];
        assert!(first.get("formatType").is_none()); // name column has no format
        let created = &value["columns"][1];
        assert_eq!(created["formatType"], "date");
    }

    #[test]
    fn test_source_restrictions() {
        let registry = vec![PredefinedView {
            id: "by-funnel".to_string(),
            name: "By Funnel".to_string(),
            description: String::new(),
            config: ViewConfig::default(),
            restrictions: ViewRestrictions {
                allow_customization: false,
                restricted_columns: vec!["name".to_string()],
                required_columns: vec!["name".to_string(), "tags".to_string()],
            },
        }];

        let source = ViewSource::Predefined {
            id: "by-funnel".to_string(),
        };
        let restrictions = source.restrictions(&registry);
        assert!(!restrictions.allow_customization);
        assert!(restrictions.is_restricted("name"));
        assert!(restrictions.is_required("tags"));

        let adhoc = ViewSource::Temporary.restrictions(&registry);
        assert!(adhoc.allow_customization);
        assert!(adhoc.is_required("name"));
        assert!(!adhoc.is_restricted("name"));
    }
}
