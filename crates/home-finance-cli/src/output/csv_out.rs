use serde_json::Value;

use super::{record_headers, record_row, result_sections, scalar_text};

/// Render the result as CSV. Results carrying a list of records (schedule
/// rows, compared loans) are written as that list; anything else becomes
/// `field,value` pairs.
pub fn render_csv(value: &Value) -> Result<String, Box<dyn std::error::Error>> {
    let sections = result_sections(value);
    let mut wtr = csv::Writer::from_writer(Vec::new());

    match sections.tables.first() {
        Some((_, records)) => {
            let headers = record_headers(records);
            wtr.write_record(&headers)?;
            for record in records.iter() {
                wtr.write_record(record_row(record, &headers))?;
            }
        }
        None => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in &sections.fields {
                wtr.write_record([key.as_str(), &scalar_text(val)])?;
            }
        }
    }

    let bytes = wtr.into_inner().map_err(|e| e.to_string())?;
    Ok(String::from_utf8(bytes)?)
}
