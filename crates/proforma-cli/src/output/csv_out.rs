use serde_json::{Map, Value};
use std::io;

use super::flatten;

/// Write output as CSV to stdout.
///
/// A closed pipe ends output quietly, the same as JSON output.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        match e.kind() {
            csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::BrokenPipe => {}
            _ => eprintln!("CSV output error: {}", e),
        }
    }
}

/// Render an output envelope as CSV.
///
/// * monthly schedule (`result` is an array): one row per month
/// * sensitivity grid (`result.matrix`): revenue deltas down, hard-cost deltas across
/// * anything else: `field,value` pairs over the flattened result
pub fn write_csv<W: io::Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let result = value.as_object().and_then(|m| m.get("result"));
    match (result, value) {
        (Some(Value::Array(rows)), _) => write_rows(&mut wtr, rows)?,
        (Some(Value::Object(res)), _) if res.contains_key("matrix") => {
            write_grid(&mut wtr, res)?
        }
        (Some(Value::Object(res)), _) => write_fields(&mut wtr, res)?,
        (_, Value::Object(map)) => write_fields(&mut wtr, map)?,
        (_, Value::Array(rows)) => write_rows(&mut wtr, rows)?,
        _ => wtr.write_record([cell(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten(map) {
        wtr.write_record([key, cell(&val)])?;
    }
    Ok(())
}

/// Columns come from the first row; rows that are not objects are skipped.
fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            wtr.write_record([cell(row)])?;
        }
        return Ok(());
    };

    let columns: Vec<&String> = first.keys().collect();
    wtr.write_record(&columns)?;
    for map in rows.iter().filter_map(Value::as_object) {
        wtr.write_record(
            columns
                .iter()
                .map(|c| map.get(c.as_str()).map(cell).unwrap_or_default()),
        )?;
    }
    Ok(())
}

fn write_grid<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    result: &Map<String, Value>,
) -> csv::Result<()> {
    let axis = |key: &str| -> Vec<String> {
        match result.get(key) {
            Some(Value::Array(values)) => values.iter().map(cell).collect(),
            _ => Vec::new(),
        }
    };

    let mut header = vec!["revenue_delta \\ hard_cost_delta".to_string()];
    header.extend(axis("hard_cost_delta_values"));
    wtr.write_record(&header)?;

    let matrix: &[Value] = match result.get("matrix") {
        Some(Value::Array(m)) => m.as_slice(),
        _ => &[],
    };
    for (rev, row) in axis("revenue_delta_values").into_iter().zip(matrix) {
        let mut record = vec![rev];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(cell));
        }
        wtr.write_record(&record)?;
    }
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
