//! Pure column-layout transitions.
//!
//! Every operation here transforms a column array in place and reports
//! whether anything changed; the view store wraps them with notification.
//! Restricted columns (no reordering) are rejected at the input layer, so
//! `reorder` assumes its indices point at movable columns.

use serde::{Deserialize, Serialize};

use super::config::{ColumnConfig, ColumnFormat, ViewRestrictions, MIN_COLUMN_WIDTH};

/// Catalog entry describing a column to add: a standard field or a typed
/// attribute of one object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: String,
    pub label: String,
    pub width: u32,
    #[serde(rename = "objectTypeId", default)]
    pub object_type_id: Option<String>,
    #[serde(rename = "formatType", default)]
    pub format: Option<ColumnFormat>,
}

/// Shows or hides a column. Hiding a required standard column is a no-op.
/// A column made visible is appended to the end of the visible sequence.
pub fn toggle_visibility(
    columns: &mut [ColumnConfig],
    restrictions: &ViewRestrictions,
    field: &str,
    visible: bool,
    object_type_id: Option<&str>,
) -> bool {
    if !visible && object_type_id.is_none() && restrictions.is_required(field) {
        return false;
    }
    let visible_count = columns.iter().filter(|c| c.visible).count();
    let Some(column) = columns
        .iter_mut()
        .find(|c| c.matches(field, object_type_id))
    else {
        return false;
    };
    if column.visible == visible {
        return false;
    }
    column.visible = visible;
    if visible {
        column.order = visible_count;
    }
    true
}

/// Moves the visible column at position `from` to position `to`, both indices
/// into the visible, order-sorted sequence. Orders across that sequence are
/// reassigned 0..n-1. Out-of-range indices are a no-op.
pub fn reorder(columns: &mut [ColumnConfig], from: usize, to: usize) -> bool {
    let mut visible: Vec<(usize, usize)> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.visible)
        .map(|(index, c)| (index, c.order))
        .collect();
    visible.sort_by_key(|(_, order)| *order);

    if from >= visible.len() || to >= visible.len() || from == to {
        return false;
    }

    let moved = visible.remove(from);
    visible.insert(to, moved);
    for (position, (index, _)) in visible.into_iter().enumerate() {
        columns[index].order = position;
    }
    true
}

/// Adds a column from the catalog. If a column with the same identity already
/// exists it is re-shown instead of duplicated.
pub fn add(columns: &mut Vec<ColumnConfig>, spec: ColumnSpec) {
    let visible_count = columns.iter().filter(|c| c.visible).count();
    if let Some(existing) = columns
        .iter_mut()
        .find(|c| c.matches(&spec.field, spec.object_type_id.as_deref()))
    {
        if !existing.visible {
            existing.visible = true;
            existing.order = visible_count;
        }
        return;
    }

    let order = columns.len();
    columns.push(ColumnConfig {
        field: spec.field,
        label: spec.label,
        width: spec.width,
        visible: true,
        order,
        sortable: true,
        object_type_id: spec.object_type_id,
        format: spec.format,
    });
}

/// Deletes a column by identity. Required standard columns are a no-op.
pub fn remove(
    columns: &mut Vec<ColumnConfig>,
    restrictions: &ViewRestrictions,
    field: &str,
    object_type_id: Option<&str>,
) -> bool {
    if object_type_id.is_none() && restrictions.is_required(field) {
        return false;
    }
    let before = columns.len();
    columns.retain(|c| !c.matches(field, object_type_id));
    columns.len() != before
}

/// Resizes a column, clamping to [`MIN_COLUMN_WIDTH`]
pub fn resize_width(
    columns: &mut [ColumnConfig],
    field: &str,
    width: u32,
    object_type_id: Option<&str>,
) -> bool {
    let Some(column) = columns
        .iter_mut()
        .find(|c| c.matches(field, object_type_id))
    else {
        return false;
    };
    let clamped = width.max(MIN_COLUMN_WIDTH);
    if column.width == clamped {
        return false;
    }
    column.width = clamped;
    true
}
