use serde_json::Value;

/// Pretty-printed JSON, newline-terminated.
pub fn render_json(value: &Value) -> Result<String, Box<dyn std::error::Error>> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}
