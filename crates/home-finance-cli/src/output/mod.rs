pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Render and print the command output in the requested format.
pub fn format_output(format: &OutputFormat, value: &Value) {
    let rendered = match format {
        OutputFormat::Json => json::render_json(value),
        OutputFormat::Table => table::render_table(value),
        OutputFormat::Csv => csv_out::render_csv(value),
        OutputFormat::Minimal => minimal::render_minimal(value),
    };
    match rendered {
        Ok(text) => print!("{text}"),
        Err(e) => eprintln!("Output error: {e}"),
    }
}

/// The `result` section of a computation envelope split into scalar fields
/// (nested objects flattened to dotted keys) and tabular sections (arrays of
/// records such as schedule rows or compared loans).
pub(crate) struct ResultSections<'a> {
    pub fields: Vec<(String, &'a Value)>,
    pub tables: Vec<(String, &'a [Value])>,
}

pub(crate) fn result_sections(value: &Value) -> ResultSections<'_> {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let mut sections = ResultSections {
        fields: Vec::new(),
        tables: Vec::new(),
    };
    if let Value::Object(map) = result {
        collect(map, "", &mut sections);
    }
    sections
}

fn collect<'a>(map: &'a Map<String, Value>, prefix: &str, out: &mut ResultSections<'a>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect(inner, &name, out),
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                out.tables.push((name, items.as_slice()))
            }
            _ => out.fields.push((name, val)),
        }
    }
}

/// Plain-text rendering of a scalar JSON value.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Column headers for a list of records, in first-seen order.
pub(crate) fn record_headers(records: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    headers
}

/// Values of `record` in `headers` order.
pub(crate) fn record_row(record: &Value, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| record.get(h.as_str()).map(scalar_text).unwrap_or_default())
        .collect()
}
