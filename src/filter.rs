//! Removal of empty values from mapped records.

use serde_json::Value;

/// Drops `null` values and empty arrays/objects from every object and array in
/// `value`, children first. Other scalars (including `0` and `""`) are kept.
pub fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, prune(value)))
                .filter(|(_, value)| !is_empty(value))
                .collect(),
        ),
        Value::Array(items) => Value::Array(prune_records(items)),
        scalar => scalar,
    }
}

/// Prunes each record and drops the ones left empty.
pub fn prune_records(records: Vec<Value>) -> Vec<Value> {
    records
        .into_iter()
        .map(prune)
        .filter(|record| !is_empty(record))
        .collect()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
