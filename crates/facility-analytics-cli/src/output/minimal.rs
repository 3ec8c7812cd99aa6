use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "net_profit_tl",
        "risky_facility_count",
        "realized_tons_per_mwh",
        "base_net_profit_tl",
        "max_carbon_intensity",
        "thresholds",
        "years",
        "valid",
    ];

    // Per-facility datasets: one line per facility
    if let Value::Array(rows) = result_obj {
        for row in rows {
            println!("{}", format_row(row));
        }
        return;
    }

    if let Value::Object(map) = result_obj {
        // Try priority keys first (skip null values)
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_minimal(result_obj));
}

/// `name: headline` for one facility row.
fn format_row(row: &Value) -> String {
    let headline = ["efficiency_pct", "profit_tl", "carbon_intensity", "energy_type"]
        .iter()
        .find_map(|k| row.get(*k))
        .unwrap_or(row);
    match row.get("name") {
        Some(name) => format!("{}: {}", format_minimal(name), format_minimal(headline)),
        None => format_minimal(headline),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
