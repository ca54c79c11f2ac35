//! "Dot" notation access to nested JSON values.
//!
//! A key such as `"db.replicas.0.host"` addresses a value by walking one
//! segment per `.`: a segment selects a field in an object and, when it parses
//! as an index, an element in an array. Scalars (strings, numbers, booleans,
//! null) have no children.
//!
//! The path functions ([`get`], [`set`], [`has`], [`forget`], ...)
//! treat the key as a plain path, preferring an exact top-level match
//! (`"a.b"` as a literal field name) before splitting. The `data_*` functions
//! additionally understand `*`, which fans out over every child of the
//! current container.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use toolbelt::dot;
//!
//! let mut config = json!({ "db": { "host": "localhost" } });
//!
//! dot::set(&mut config, "db.port", json!(5432));
//! assert_eq!(dot::get(&config, "db.port"), Some(&json!(5432)));
//! assert!(dot::has(&config, &["db.host", "db.port"]));
//!
//! dot::forget(&mut config, &["db.host"]);
//! assert_eq!(config, json!({ "db": { "port": 5432 } }));
//! ```

use serde_json::{Map, Value};
use std::cmp::Ordering;

const DELIMITER: char = '.';
const WILDCARD: &str = "*";

/// How far past the end of an array a write may pad with `null`.
///
/// Larger indices are stored as object keys instead.
pub const MAX_INDEX_GAP: usize = 1024;

/// Returns `true` when `value` can hold children (object or array).
pub fn is_accessible(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Returns `true` when `key` is a direct child of `value`, without splitting.
pub fn exists(value: &Value, key: &str) -> bool {
    child(value, key).is_some()
}

/// Get the value at `key`.
///
/// An exact top-level match wins over path interpretation, so a field
/// literally named `"a.b"` is found before `a` → `b`.
pub fn get<'a>(target: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(value) = child(target, key) {
        return Some(value);
    }
    if !key.contains(DELIMITER) {
        return None;
    }

    key.split(DELIMITER)
        .try_fold(target, |current, segment| child(current, segment))
}

/// Get a copy of the value at `key`, or `default` when it is missing.
pub fn get_or(target: &Value, key: &str, default: Value) -> Value {
    get(target, key).cloned().unwrap_or(default)
}

/// Get the value at `key`, computing the fallback only when it is missing.
pub fn get_or_else<F>(target: &Value, key: &str, default: F) -> Value
where
    F: FnOnce() -> Value,
{
    get(target, key).cloned().unwrap_or_else(default)
}

/// Mutable counterpart of [`get`].
pub fn get_mut<'a>(target: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    if exists(target, key) {
        return child_mut(target, key);
    }
    if !key.contains(DELIMITER) {
        return None;
    }

    let mut current = target;
    for segment in key.split(DELIMITER) {
        current = child_mut(current, segment)?;
    }
    Some(current)
}

/// Check that every key in `keys` resolves.
///
/// Always `false` for an empty key list and for targets without children.
pub fn has(target: &Value, keys: &[&str]) -> bool {
    if keys.is_empty() || !has_children(target) {
        return false;
    }

    keys.iter().all(|key| get(target, key).is_some())
}

/// Set the value at `key`, creating intermediate objects as needed.
///
/// Any intermediate node that cannot hold children (including `null`) is
/// replaced by an empty object. A non-container `target` becomes an object.
/// In arrays, an index equal to the length appends; larger indices pad the
/// array with `null`.
pub fn set(target: &mut Value, key: &str, value: Value) {
    let (parents, last) = match key.rsplit_once(DELIMITER) {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };

    let mut current = target;
    for segment in parents.into_iter().flat_map(|p| p.split(DELIMITER)) {
        let next = slot(current, segment);
        if !is_accessible(next) {
            *next = Value::Object(Map::new());
        }
        current = next;
    }

    *slot(current, last) = value;
}

/// Set the value at `key` only when it is missing or `null`.
pub fn add(target: &mut Value, key: &str, value: Value) {
    if get(target, key).is_none_or(Value::is_null) {
        set(target, key, value);
    }
}

/// Remove every key in `keys`.
///
/// All keys are resolved against `target` before anything is removed, so
/// `["list.0", "list.1"]` drops the first two elements of `list`. Keys whose
/// parents do not exist are ignored. The remaining array elements close up.
pub fn forget(target: &mut Value, keys: &[&str]) {
    let mut paths: Vec<Vec<&str>> = keys.iter().filter_map(|key| resolve(target, *key)).collect();

    // Highest indices and children first: no removal shifts a later target.
    paths.sort_by(|a, b| compare_paths(b, a));
    paths.dedup();

    for path in &paths {
        remove_resolved(target, path);
    }
}

/// Remove the value at `key` and return it.
pub fn pull(target: &mut Value, key: &str) -> Option<Value> {
    let path = resolve(target, key)?;
    remove_resolved(target, &path)
}

/// A copy of `target` without `keys`.
pub fn except(target: &Value, keys: &[&str]) -> Value {
    let mut copy = target.clone();
    forget(&mut copy, keys);
    copy
}

/// Flatten `target` into a single-level map with dotted keys.
///
/// Empty objects and arrays are kept as leaves.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::dot;
///
/// let flat = dot::dot(&json!({ "a": { "b": 1, "c": [true] }, "d": {} }));
/// assert_eq!(flat["a.b"], json!(1));
/// assert_eq!(flat["a.c.0"], json!(true));
/// assert_eq!(flat["d"], json!({}));
/// ```
pub fn dot(target: &Value) -> Map<String, Value> {
    let mut results = Map::new();
    flatten_into(target, "", &mut results);
    results
}

/// Get the value at `key`, with `*` matching every child.
///
/// A wildcard produces an array with one entry per child; children missing the
/// rest of the path contribute `null`. When the rest of the key contains
/// another wildcard the nested arrays are collapsed one level.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::dot;
///
/// let users = json!({ "users": [{ "name": "ann" }, { "name": "bo" }, {}] });
/// assert_eq!(
///     dot::data_get(&users, "users.*.name"),
///     Some(json!(["ann", "bo", null]))
/// );
/// ```
pub fn data_get(target: &Value, key: &str) -> Option<Value> {
    let segments: Vec<&str> = key.split(DELIMITER).collect();
    data_get_segments(target, &segments)
}

/// Set the value at `key`, with `*` matching every child.
///
/// With `overwrite == false` existing entries are kept.
pub fn data_set(target: &mut Value, key: &str, value: Value, overwrite: bool) {
    let segments: Vec<&str> = key.split(DELIMITER).collect();
    data_set_segments(target, &segments, &value, overwrite);
}

/// Fill in `key` where it is missing; see [`data_set`].
pub fn data_fill(target: &mut Value, key: &str, value: Value) {
    data_set(target, key, value, false);
}

/// Method-call access to the functions of this module.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::dot::DotAccess;
///
/// let mut value = json!({});
/// value.dot_set("server.port", json!(8080));
/// assert_eq!(value.dot_get("server.port"), Some(&json!(8080)));
/// ```
pub trait DotAccess {
    /// See [`get`].
    fn dot_get(&self, key: &str) -> Option<&Value>;
    /// See [`get_mut`].
    fn dot_get_mut(&mut self, key: &str) -> Option<&mut Value>;
    /// See [`set`].
    fn dot_set(&mut self, key: &str, value: Value);
    /// See [`has`].
    fn dot_has(&self, key: &str) -> bool;
    /// See [`forget`].
    fn dot_forget(&mut self, key: &str);
    /// See [`pull`].
    fn dot_pull(&mut self, key: &str) -> Option<Value>;
}

impl DotAccess for Value {
    fn dot_get(&self, key: &str) -> Option<&Value> {
        get(self, key)
    }

    fn dot_get_mut(&mut self, key: &str) -> Option<&mut Value> {
        get_mut(self, key)
    }

    fn dot_set(&mut self, key: &str, value: Value) {
        set(self, key, value);
    }

    fn dot_has(&self, key: &str) -> bool {
        has(self, &[key])
    }

    fn dot_forget(&mut self, key: &str) {
        forget(self, &[key]);
    }

    fn dot_pull(&mut self, key: &str) -> Option<Value> {
        pull(self, key)
    }
}

fn has_children(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Parse `segment` as an array index.
///
/// Only canonical decimal forms qualify: `"0"` and `"12"` do, `"+1"`, `"01"`
/// and `""` do not.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    let canonical = segment == "0"
        || (!segment.starts_with('0')
            && !segment.is_empty()
            && segment.bytes().all(|b| b.is_ascii_digit()));

    if canonical { segment.parse().ok() } else { None }
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

fn children_mut(value: &mut Value) -> Vec<&mut Value> {
    match value {
        Value::Object(map) => map.values_mut().collect(),
        Value::Array(items) => items.iter_mut().collect(),
        _ => Vec::new(),
    }
}

/// The child slot for `segment`, created as `null` when absent.
///
/// Arrays accept index segments up to [`MAX_INDEX_GAP`] past their end; any
/// other segment turns the array into an object keyed by the former indices.
/// Scalars are replaced by an empty object.
fn slot<'a>(target: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*target {
        Value::Array(items) => parse_index(segment)
            .filter(|&index| index.saturating_sub(items.len()) <= MAX_INDEX_GAP),
        _ => None,
    };

    match (target, index) {
        (Value::Array(items), Some(index)) => {
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        (Value::Object(map), _) => map.entry(segment).or_insert(Value::Null),
        (target, _) => {
            let mapping = into_mapping(std::mem::take(target));
            *target = Value::Object(mapping);
            slot(target, segment)
        }
    }
}

fn into_mapping(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => Map::new(),
    }
}

fn remove_child(container: &mut Value, segment: &str) -> Option<Value> {
    match container {
        Value::Object(map) => map.remove(segment),
        Value::Array(items) => match parse_index(segment) {
            Some(index) if index < items.len() => Some(items.remove(index)),
            _ => None,
        },
        _ => None,
    }
}

/// The segments leading to an existing value at `key`, exact key first.
fn resolve<'k>(target: &Value, key: &'k str) -> Option<Vec<&'k str>> {
    if exists(target, key) {
        return Some(vec![key]);
    }
    if !key.contains(DELIMITER) {
        return None;
    }

    let segments: Vec<&str> = key.split(DELIMITER).collect();
    segments
        .iter()
        .try_fold(target, |current, segment| child(current, segment))?;
    Some(segments)
}

fn remove_resolved(target: &mut Value, path: &[&str]) -> Option<Value> {
    let (last, parents) = path.split_last()?;
    let mut current = target;
    for segment in parents {
        current = child_mut(current, segment)?;
    }
    remove_child(current, last)
}

/// Segment-wise order, comparing index segments numerically.
fn compare_paths(a: &[&str], b: &[&str]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let order = match (parse_index(x), parse_index(y)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.cmp(y),
        };
        if order != Ordering::Equal {
            return order;
        }
    }
    a.len().cmp(&b.len())
}

fn flatten_into(value: &Value, prefix: &str, results: &mut Map<String, Value>) {
    let entries: Vec<(String, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return,
    };

    for (key, item) in entries {
        let path = format!("{prefix}{key}");
        if has_children(item) {
            flatten_into(item, &format!("{path}{DELIMITER}"), results);
        } else {
            results.insert(path, item.clone());
        }
    }
}

fn data_get_segments(target: &Value, segments: &[&str]) -> Option<Value> {
    let mut current = target;

    for (position, segment) in segments.iter().enumerate() {
        if *segment == WILDCARD {
            let children: Vec<&Value> = match current {
                Value::Object(map) => map.values().collect(),
                Value::Array(items) => items.iter().collect(),
                _ => return None,
            };

            let rest = &segments[position + 1..];
            let results: Vec<Value> = children
                .into_iter()
                .map(|item| data_get_segments(item, rest).unwrap_or(Value::Null))
                .collect();

            return Some(if rest.contains(&WILDCARD) {
                Value::Array(crate::arr::collapse_items(results))
            } else {
                Value::Array(results)
            });
        }

        current = child(current, segment)?;
    }

    Some(current.clone())
}

fn data_set_segments(target: &mut Value, segments: &[&str], value: &Value, overwrite: bool) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };

    if *segment == WILDCARD {
        if !is_accessible(target) {
            *target = Value::Object(Map::new());
        }
        for inner in children_mut(target) {
            if !rest.is_empty() {
                data_set_segments(inner, rest, value, overwrite);
            } else if overwrite {
                *inner = value.clone();
            }
        }
        return;
    }

    if rest.is_empty() {
        if overwrite || child(target, segment).is_none() {
            *slot(target, segment) = value.clone();
        }
        return;
    }

    data_set_segments(slot(target, segment), rest, value, overwrite);
}
