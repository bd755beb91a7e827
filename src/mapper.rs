//! Table-driven normalization of upstream records.
//!
//! Every function here is pure and total: a missing or malformed upstream
//! field becomes `null`, never an error or a missing output key.

use serde_json::{Map, Value};

use crate::schema::{self, Field};

// ---

/// Map one upstream record through `table`.
///
/// Non-object input yields an object whose leaves are all `null`.
pub fn map_record(record: &Value, table: &[(&str, Field)]) -> Value {
    // ---
    let mut out = Map::with_capacity(table.len());
    for (normalized, field) in table {
        let value = match field {
            Field::Key(spellings) => lookup(record, spellings),
            Field::Object(nested) => map_record(record, nested),
        };
        out.insert((*normalized).to_string(), value);
    }
    Value::Object(out)
}

/// First present, non-null value among `spellings`, or `null`.
fn lookup(record: &Value, spellings: &[&str]) -> Value {
    spellings
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

/// Map every record of `items` through `table`, keeping order.
pub fn map_records(items: &[Value], table: &[(&str, Field)]) -> Vec<Value> {
    items.iter().map(|r| map_record(r, table)).collect()
}

/// Unwrap `wrapper_key` and map its array, or return `body` unchanged when
/// the wrapper is missing.
pub fn map_wrapped_list(body: Value, wrapper_key: &str, table: &[(&str, Field)]) -> Value {
    // ---
    match body.get(wrapper_key).and_then(Value::as_array) {
        Some(items) => Value::Array(map_records(items, table)),
        None => {
            tracing::warn!("Upstream body lacks '{}', passing it through", wrapper_key);
            body
        }
    }
}

/// Build a `{key, values}` series from a measurement response.
///
/// The series key comes from the first record that names its measuring
/// position; an empty list gives `key: null, values: []`.
pub fn map_measurement_series(body: Value) -> Value {
    // ---
    let Some(records) = body.get(schema::MEASUREMENTS_KEY).and_then(Value::as_array) else {
        tracing::warn!(
            "Upstream body lacks '{}', passing it through",
            schema::MEASUREMENTS_KEY
        );
        return body;
    };

    let key = records
        .iter()
        .map(|r| lookup(r, schema::MEASUREMENT_SERIES_KEY))
        .find(|v| !v.is_null())
        .unwrap_or(Value::Null);

    let mut series = Map::new();
    series.insert("key".to_string(), key);
    series.insert(
        "values".to_string(),
        Value::Array(map_records(records, schema::MEASUREMENT_VALUE)),
    );
    Value::Object(series)
}

/// Fan the flat upstream index object out into the nested index shape.
pub fn map_aq_index(body: Value) -> Value {
    // ---
    match body.get(schema::AQ_INDEX_KEY) {
        Some(index) if index.is_object() => map_record(index, schema::AQ_INDEX),
        _ => {
            tracing::warn!(
                "Upstream body lacks '{}', passing it through",
                schema::AQ_INDEX_KEY
            );
            body
        }
    }
}
