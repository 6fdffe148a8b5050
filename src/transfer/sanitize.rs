// tradesheet/src/transfer/sanitize.rs
use serde_json::Value;

/// Placeholder shown in the sheet for a missing value.
pub const MISSING_VALUE_PLACEHOLDER: &str = "-";

/// Replaces every missing cell (a SQL NULL read from the trade table) with
/// the display placeholder. Pure and total: row and column order are
/// preserved, non-missing cells pass through unchanged, and an empty dataset
/// stays empty.
pub fn sanitize_rows(rows: Vec<Vec<Value>>) -> Vec<Vec<Value>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(sanitize_cell).collect())
        .collect()
}

fn sanitize_cell(value: Value) -> Value {
    match value {
        Value::Null => Value::String(MISSING_VALUE_PLACEHOLDER.to_string()),
        other => other,
    }
}
