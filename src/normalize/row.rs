//! Row Normalization
//!
//! Reduces the many response shapes of the store into plain field maps.

use serde_json::{Map, Value};

/// A normalized record: field name to untyped value.
pub type CanonicalRow = Map<String, Value>;

// Shape markers, tried in this order.
const DOC_JSON: &str = "doc_json";
const QUERY_TEXT_VALUES: &str = "query_text_values";
const COLUMNS: &str = "columns";

// Envelope keys that may hold a row set, tried in this order.
const ROW_SET_KEYS: [&str; 4] = ["value", "data", "rows", "values"];

// == Unwrap Value ==
/// Strips wrapper layers around a scalar.
///
/// `{"value": x}` and single-element arrays `[x]` are unwrapped recursively;
/// everything else is returned unchanged. Each step descends into a strictly
/// smaller value, so this always terminates.
pub fn unwrap_value(value: &Value) -> &Value {
    match value {
        Value::Object(map) => match map.get("value") {
            Some(inner) => unwrap_value(inner),
            None => value,
        },
        Value::Array(items) if items.len() == 1 => unwrap_value(&items[0]),
        _ => value,
    }
}

// == Normalize Row ==
/// Detects the encoding of one row and returns it as a flat field map.
///
/// Tried in order, first match wins:
/// 1. `doc_json`: a JSON-encoded document string. Undecodable strings fall
///    through to the next shape.
/// 2. `query_text_values`: a list of `{key, value}` pairs.
/// 3. `columns`: a list of `{name, value}` pairs, values unwrapped.
/// 4. anything else is already canonical and returned as-is.
pub fn normalize_row(row: &CanonicalRow) -> CanonicalRow {
    if let Some(doc) = decode_embedded_document(row) {
        return doc;
    }
    if let Some(items) = non_empty_array(row, QUERY_TEXT_VALUES) {
        return collect_pairs(items, "key", |v| v.clone());
    }
    if let Some(items) = non_empty_array(row, COLUMNS) {
        return collect_pairs(items, "name", |v| unwrap_value(v).clone());
    }
    row.clone()
}

fn decode_embedded_document(row: &CanonicalRow) -> Option<CanonicalRow> {
    let raw = row.get(DOC_JSON)?.as_str()?;
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str::<CanonicalRow>(raw).ok()
}

fn non_empty_array<'a>(row: &'a CanonicalRow, key: &str) -> Option<&'a Vec<Value>> {
    row.get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

/// Folds `[{<name_key>: .., value: ..}]` into a map. Items that are not
/// objects or carry no `value` are skipped; a missing or non-string name
/// maps to the empty key.
fn collect_pairs(
    items: &[Value],
    name_key: &str,
    convert: impl Fn(&Value) -> Value,
) -> CanonicalRow {
    let mut out = CanonicalRow::new();
    for item in items {
        let Value::Object(pair) = item else {
            continue;
        };
        let Some(value) = pair.get("value") else {
            continue;
        };
        let name = pair
            .get(name_key)
            .and_then(Value::as_str)
            .unwrap_or_default();
        out.insert(name.to_string(), convert(value));
    }
    out
}

// == Extract Rows ==
/// Pulls the row list out of a decoded response body.
///
/// Accepts a bare array, an array under one of `value`, `data`, `rows`,
/// `values`, or a Data API result `{data: {documents: [...]}}`. Non-object
/// items are dropped. Each row is passed through [`normalize_row`]. Unknown
/// shapes yield an empty list.
pub fn extract_rows(body: &Value) -> Vec<CanonicalRow> {
    let items: &[Value] = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => ROW_SET_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .or_else(|| documents(map))
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(normalize_row)
        .collect()
}

// == Extract Single ==
/// Pulls one record out of a single-row response body.
///
/// Looks under `data` (object, or first element of an array), then at the
/// first element of an array under `value`; a body with neither key is taken
/// to be the record itself. The result is passed through [`normalize_row`].
pub fn extract_single(body: &Value) -> Option<CanonicalRow> {
    let map = body.as_object()?;

    let record = if let Some(data) = map.get("data") {
        match data {
            Value::Object(obj) => Some(obj),
            Value::Array(items) => items.first().and_then(Value::as_object),
            _ => None,
        }
    } else if let Some(value) = map.get("value") {
        value
            .as_array()
            .and_then(|items| items.first())
            .and_then(Value::as_object)
    } else {
        Some(map)
    };

    record.map(normalize_row)
}

// == Extract Documents ==
/// Returns the documents of a Data API `find` result, or an empty list.
pub fn extract_documents(body: &Value) -> Vec<CanonicalRow> {
    body.as_object()
        .and_then(documents)
        .map(|items| items.iter().filter_map(Value::as_object).cloned().collect())
        .unwrap_or_default()
}

fn documents(map: &CanonicalRow) -> Option<&Vec<Value>> {
    map.get("data")?.get("documents")?.as_array()
}
