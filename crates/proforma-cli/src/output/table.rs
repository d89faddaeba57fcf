use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::flatten;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(res) if res.contains_key("matrix") => print_sensitivity_grid(res),
        Value::Object(_) => print_flat_object(result),
        // Monthly schedule: one row per month
        Value::Array(rows) => print_array_table(rows),
        _ => print_flat_object(&Value::Object(envelope.clone())),
    }

    // Print warnings if any
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Rows are revenue deltas, columns hard-cost deltas.
fn print_sensitivity_grid(result: &serde_json::Map<String, Value>) {
    let rows = array_field(result, "revenue_delta_values");
    let cols = array_field(result, "hard_cost_delta_values");
    let matrix = array_field(result, "matrix");

    let mut builder = Builder::default();
    let mut header = vec!["rev \\ hard".to_string()];
    header.extend(cols.iter().map(|c| format!("{}%", format_value(c))));
    builder.push_record(header);

    for (i, rev) in rows.iter().enumerate() {
        let mut record = vec![format!("{}%", format_value(rev))];
        if let Some(Value::Array(cells)) = matrix.get(i) {
            record.extend(cells.iter().map(format_value));
        }
        builder.push_record(record);
    }

    if let Some(metric) = result.get("metric") {
        println!("Metric: {}", format_value(metric));
    }
    println!("{}", Table::from(builder));
}

fn array_field<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> &'a [Value] {
    match map.get(key) {
        Some(Value::Array(a)) => a,
        _ => &[],
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in flatten(map) {
            builder.push_record([key, format_value(&val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(format_value)
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        // Simple array of values
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
