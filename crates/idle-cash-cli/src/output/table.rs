use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_scalar};

/// Format output as tables using the tabled crate.
///
/// Scalar and small nested fields of the result go into one Field/Value
/// table. Lists of records (scheduled contributions, suggestions) and
/// keyed records (category analyses) each get their own table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_result_tables(result);
                print_envelope_notes(map);
            }
            _ => print_result_tables(map),
        },
        Value::Array(arr) => print_record_table(arr.iter()),
        _ => println!("{value}"),
    }
}

fn print_result_tables(result: &Map<String, Value>) {
    let mut summary = Builder::default();
    summary.push_record(["Field", "Value"]);
    let mut sections: Vec<(String, &Value)> = Vec::new();

    collect(result, "", &mut summary, &mut sections);

    println!("{}", Table::from(summary));
    for (title, records) in sections {
        println!("\n{title}:");
        match records {
            Value::Array(arr) => print_record_table(arr.iter()),
            Value::Object(map) => print_keyed_table(map),
            other => println!("{}", format_scalar(other)),
        }
    }
}

fn collect<'a>(
    map: &'a Map<String, Value>,
    prefix: &str,
    summary: &mut Builder,
    sections: &mut Vec<(String, &'a Value)>,
) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Array(arr) if arr.iter().any(Value::is_object) => {
                sections.push((path, val));
            }
            Value::Object(inner) if !inner.is_empty() && inner.values().all(Value::is_object) => {
                sections.push((path, val));
            }
            Value::Object(inner) if !inner.is_empty() => {
                collect(inner, &path, summary, sections);
            }
            _ => {
                let mut rows = Vec::new();
                flatten(val, &path, &mut rows);
                for (field, v) in rows {
                    summary.push_record([field, v]);
                }
            }
        }
    }
}

/// One row per record, columns from the first record's keys.
fn print_record_table<'a>(records: impl Iterator<Item = &'a Value>) {
    let records: Vec<&Map<String, Value>> = records.filter_map(Value::as_object).collect();
    let Some(first) = records.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for record in &records {
        builder.push_record(
            headers
                .iter()
                .map(|h| record.get(h).map(format_scalar).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

/// Like `print_record_table`, with the map key as the first column.
fn print_keyed_table(map: &Map<String, Value>) {
    let Some(Value::Object(first)) = map.values().next() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(std::iter::once("key".to_string()).chain(headers.iter().cloned()));
    for (key, record) in map {
        let cells = headers.iter().map(|h| {
            record
                .get(h.as_str())
                .map(format_scalar)
                .unwrap_or_default()
        });
        builder.push_record(std::iter::once(key.clone()).chain(cells));
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}
