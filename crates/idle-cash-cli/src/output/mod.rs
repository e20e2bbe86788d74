pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` section of a computation envelope, or the value itself for
/// plain outputs such as `config show`.
pub fn result_section(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Flatten nested objects and arrays into dotted `(path, value)` rows,
/// e.g. `framework_allocation.fund_portfolio` or `funds.0.amount`.
pub fn flatten(value: &Value, prefix: &str, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, val) in map {
                flatten(val, &join(key), rows);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, val) in arr.iter().enumerate() {
                flatten(val, &join(&i.to_string()), rows);
            }
        }
        _ => rows.push((prefix.to_string(), format_scalar(value))),
    }
}

pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) if arr.is_empty() => "(none)".to_string(),
        Value::Object(map) if map.is_empty() => "(none)".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "investable_amount": "13000",
            "framework_allocation": {"fund_portfolio": "3900"},
            "regular_investment_plan": {"funds": [{"amount": "585"}]},
            "warning": null
        });
        let mut rows = Vec::new();
        flatten(&value, "", &mut rows);
        assert!(rows.contains(&("investable_amount".into(), "13000".into())));
        assert!(rows.contains(&("framework_allocation.fund_portfolio".into(), "3900".into())));
        assert!(rows.contains(&("regular_investment_plan.funds.0.amount".into(), "585".into())));
        assert!(rows.contains(&("warning".into(), String::new())));
    }

    #[test]
    fn test_empty_collections_render_as_none() {
        let mut rows = Vec::new();
        flatten(&json!({"framework_analysis": {}, "funds": []}), "", &mut rows);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|(_, v)| v == "(none)"));
    }

    #[test]
    fn test_result_section_falls_back_to_value() {
        let plain = json!({"framework": {}});
        assert_eq!(result_section(&plain), &plain);
        let wrapped = json!({"result": {"total_amount": "0"}});
        assert_eq!(result_section(&wrapped), &json!({"total_amount": "0"}));
    }

    #[test]
    fn test_analysis_rows_follow_category_order() {
        use idle_cash_core::analysis::portfolio::{analyze_portfolio, PortfolioSnapshot};
        use idle_cash_core::AllocationConfig;

        let snapshot = PortfolioSnapshot {
            bank_fixed_income: "600".parse().unwrap(),
            reserve_fund: "400".parse().unwrap(),
            ..Default::default()
        };
        let out = analyze_portfolio(&snapshot, &AllocationConfig::default()).unwrap();
        let value = serde_json::to_value(&out.result).unwrap();
        let mut rows = Vec::new();
        flatten(&value["framework_analysis"], "", &mut rows);
        let mut buckets: Vec<&str> = rows
            .iter()
            .filter_map(|(path, _)| path.split('.').next())
            .collect();
        buckets.dedup();
        assert_eq!(
            buckets,
            vec!["fund_portfolio", "bank_fixed_income", "physical_gold", "reserve_fund"]
        );
    }
}
