use serde_json::Value;

use super::{format_scalar, result_section};

/// Key answer of each command, most specific first. Paths are
/// `/`-separated JSON pointers into the result section.
const PRIORITY_PATHS: [&str; 3] = [
    "/regular_investment_plan/weekly_total",
    "/investable_amount",
    "/total_amount",
];

/// Print just the key answer value from the output.
///
/// An insufficient plan still reports its (non-positive) investable amount
/// because its weekly total is zero.
pub fn print_minimal(value: &Value) {
    let result = result_section(value);

    let insufficient = result.get("status").and_then(Value::as_str) == Some("Insufficient");
    let paths = PRIORITY_PATHS
        .iter()
        .filter(|p| !(insufficient && p.contains("weekly_total")));

    for path in paths {
        if let Some(val) = result.pointer(path) {
            if !val.is_null() {
                println!("{}", format_scalar(val));
                return;
            }
        }
    }

    // Fall back to first field
    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result));
}
