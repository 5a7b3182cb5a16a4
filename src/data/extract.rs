//! Locating the dataset list and total inside marketplace responses
//!
//! The marketplace has shipped several response shapes over time and none of
//! them is documented. Rather than deserializing into a fixed schema, the
//! payload is kept as a [`serde_json::Value`] and checked against the known
//! shapes in a fixed priority order. An unrecognized shape yields no items;
//! it is never an error.

use serde_json::{Map, Value};

/// Keys that may carry the total record count
const TOTAL_KEYS: [&str; 3] = ["total", "totalCount", "count"];

/// Nested containers searched for a total when the top level has none
const TOTAL_CONTAINERS: [&str; 3] = ["items", "successObject", "meta"];

/// Returns the raw item values contained in `payload`
///
/// Shapes are tried in this order, first match wins:
///
/// 1. `successObject.items`, or `successObject` itself when it is list-like
/// 2. `items.data`, `items.items`, or `items` itself when it is list-like
/// 3. `data.items`, or `data` itself
/// 4. `results`
/// 5. an empty container yields nothing
/// 6. the payload itself when it is list-like
///
/// Anything else yields an empty list.
pub fn extract_items(payload: &Value) -> Vec<Value> {
    if let Value::Object(map) = payload {
        if let Some(items) = from_success_object(map) {
            return items;
        }
        if let Some(items) = from_items_field(map) {
            return items;
        }
        if let Some(items) = from_data_field(map) {
            return items;
        }
        if let Some(results) = container_field(map, "results") {
            return elements(results);
        }
    }

    if is_empty_container(payload) {
        return Vec::new();
    }

    if is_list(payload) {
        return elements(payload);
    }

    Vec::new()
}

/// Returns the total record count advertised by `payload`, if any
///
/// Top-level `total`, `totalCount` and `count` are checked first, then the
/// same keys inside `items`, `successObject` and `meta`. Numbers and numeric
/// strings are accepted and truncated toward zero.
pub fn extract_total(payload: &Value) -> Option<i64> {
    let Value::Object(map) = payload else {
        return None;
    };

    if let Some(total) = total_in(map) {
        return Some(total);
    }

    TOTAL_CONTAINERS
        .iter()
        .filter_map(|name| match map.get(*name) {
            Some(Value::Object(nested)) => total_in(nested),
            _ => None,
        })
        .next()
}

/// Whether a value has ordered-list semantics
///
/// JSON arrays always do. An object does when its keys are exactly `"0"`,
/// `"1"`, ... in order, which is how some encoders serialize sparse-free
/// lists.
pub fn is_list(value: &Value) -> bool {
    match value {
        Value::Array(_) => true,
        Value::Object(map) => map
            .keys()
            .enumerate()
            .all(|(index, key)| *key == index.to_string()),
        _ => false,
    }
}

fn from_success_object(map: &Map<String, Value>) -> Option<Vec<Value>> {
    let wrapper = container_field(map, "successObject")?;

    if let Value::Object(inner) = wrapper {
        if let Some(items) = container_field(inner, "items") {
            return Some(elements(items));
        }
    }

    is_list(wrapper).then(|| elements(wrapper))
}

fn from_items_field(map: &Map<String, Value>) -> Option<Vec<Value>> {
    let items = container_field(map, "items")?;

    if let Value::Object(inner) = items {
        if let Some(data) = container_field(inner, "data") {
            return Some(elements(data));
        }
        if let Some(nested) = container_field(inner, "items") {
            return Some(elements(nested));
        }
    }

    is_list(items).then(|| elements(items))
}

fn from_data_field(map: &Map<String, Value>) -> Option<Vec<Value>> {
    let data = container_field(map, "data")?;

    if let Value::Object(inner) = data {
        if let Some(items) = container_field(inner, "items") {
            return Some(elements(items));
        }
    }

    Some(elements(data))
}

/// Looks up `key` and returns it only when it is an array or object
fn container_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| value.is_array() || value.is_object())
}

/// Values of a container in order; scalars have none
fn elements(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values.clone(),
        Value::Object(map) => map.values().cloned().collect(),
        _ => Vec::new(),
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(values) => values.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn total_in(map: &Map<String, Value>) -> Option<i64> {
    TOTAL_KEYS.iter().find_map(|key| map.get(*key).and_then(numeric))
}

/// Integer value of a JSON number or numeric string
fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}
