use serde_json::Value;

use super::{result_sections, scalar_text};

/// Headline figure of each command, in priority order.
const PRIORITY_KEYS: [&str; 3] = [
    "monthly_payment",
    "breakdown.monthly_payment",
    "max_home_price",
];

/// Just the key answer: the headline figure, or one `label: total_cost`
/// line per compared loan.
pub fn render_minimal(value: &Value) -> Result<String, Box<dyn std::error::Error>> {
    let mut out = String::new();
    for line in minimal_lines(value) {
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

fn minimal_lines(value: &Value) -> Vec<String> {
    let sections = result_sections(value);

    if let Some((_, options)) = sections.tables.iter().find(|(name, _)| name == "options") {
        return options
            .iter()
            .map(|opt| {
                let label = opt.get("label").map(scalar_text).unwrap_or_default();
                let cost = opt.get("total_cost").map(scalar_text).unwrap_or_default();
                format!("{label}: {cost}")
            })
            .collect();
    }

    for key in PRIORITY_KEYS {
        if let Some((_, val)) = sections
            .fields
            .iter()
            .find(|(k, v)| k == key && !v.is_null())
        {
            return vec![scalar_text(val)];
        }
    }

    match sections.fields.first() {
        Some((key, val)) => vec![format!("{key}: {}", scalar_text(val))],
        None => vec![scalar_text(value)],
    }
}
