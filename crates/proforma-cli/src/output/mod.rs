pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into `(dotted.path, value)` pairs.
///
/// Arrays of objects (the monthly schedule) are summarised rather than
/// expanded; scalar arrays are kept as leaves.
pub(crate) fn flatten(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&path, inner, out),
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                out.push((path, Value::String(format!("[{} rows]", rows.len()))));
            }
            _ => out.push((path, val.clone())),
        }
    }
}

/// Look up a dotted path such as `totals.profit`.
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let v = json!({
            "axis": ["-5", "0", "5"],
            "monthly": [{"month_index": 1}, {"month_index": 2}],
            "totals": {"profit": "100", "return_on_cost_pct": null}
        });
        let flat = flatten(v.as_object().unwrap());
        let keys: Vec<&str> = flat.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["axis", "monthly", "totals.profit", "totals.return_on_cost_pct"]
        );
        assert_eq!(flat[0].1, json!(["-5", "0", "5"]));
        assert_eq!(flat[1].1, json!("[2 rows]"));
    }

    #[test]
    fn test_lookup_dotted_path() {
        let v = json!({"deltas": {"profit": "-5"}});
        assert_eq!(lookup(&v, "deltas.profit"), Some(&json!("-5")));
        assert_eq!(lookup(&v, "deltas.missing"), None);
    }
}
