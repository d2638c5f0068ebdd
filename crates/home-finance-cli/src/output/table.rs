use serde_json::Value;
use std::fmt::Write;
use tabled::{builder::Builder, Table};

use super::{record_headers, record_row, result_sections, scalar_text};

/// Render the envelope as text tables: a Field/Value table for scalar
/// results, one table per list of records, then warnings and methodology.
pub fn render_table(value: &Value) -> Result<String, Box<dyn std::error::Error>> {
    let sections = result_sections(value);
    let mut out = String::new();

    if !sections.fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &sections.fields {
            builder.push_record([key.clone(), scalar_text(val)]);
        }
        writeln!(out, "{}", Table::from(builder))?;
    }

    for (name, records) in &sections.tables {
        let headers = record_headers(records);
        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for record in records.iter() {
            builder.push_record(record_row(record, &headers));
        }
        writeln!(out, "\n{name}:")?;
        writeln!(out, "{}", Table::from(builder))?;
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            writeln!(out, "\nWarnings:")?;
            for w in warnings.iter().filter_map(Value::as_str) {
                writeln!(out, "  - {w}")?;
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        writeln!(out, "\nMethodology: {meth}")?;
    }

    Ok(out)
}
