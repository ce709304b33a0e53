//! CSV export of the current listing.
//!
//! Exports exactly the visible columns in their display order, using the
//! column labels as the header row. Every cell is quoted; object-shaped
//! values are serialized as JSON strings, missing values become empty cells.

use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

use crate::error::LensResult;
use crate::model::ObjectRecord;
use crate::view::{ColumnConfig, ViewConfig};

/// Appends a `.csv` extension unless the name already carries one
pub fn ensure_csv_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".csv") {
        name.to_string()
    } else {
        format!("{}.csv", name)
    }
}

/// Writes the visible columns of `view` for every record to `writer`
pub fn export_csv<W: Write>(
    writer: W,
    records: &[ObjectRecord],
    view: &ViewConfig,
) -> LensResult<()> {
    let columns = view.visible_columns();
    let mut out = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    out.write_record(columns.iter().map(|c| c.label.as_str()))?;
    for record in records {
        out.write_record(columns.iter().map(|c| cell_value(record, c)))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Convenience wrapper producing the CSV document as a string
pub fn export_csv_string(records: &[ObjectRecord], view: &ViewConfig) -> LensResult<String> {
    let mut buffer = Vec::new();
    export_csv(&mut buffer, records, view)?;
    // csv output is valid UTF-8 when the inputs are
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn cell_value(record: &ObjectRecord, column: &ColumnConfig) -> String {
    if let Some(type_id) = &column.object_type_id {
        return record
            .field_value(type_id, &column.field)
            .map(render_value)
            .unwrap_or_default();
    }
    match column.field.as_str() {
        "name" => record.name.clone(),
        "description" => record.description.clone(),
        "id_string" => record.id_string.clone(),
        "created_at" => record.created_at.clone().unwrap_or_default(),
        "first_fact_date" => record.first_fact_date.clone().unwrap_or_default(),
        "last_fact_date" => record.last_fact_date.clone().unwrap_or_default(),
        "tags" => serde_json::to_string(&record.tags).unwrap_or_default(),
        "type_values" => serde_json::to_string(&record.type_values).unwrap_or_default(),
        _ => String::new(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
