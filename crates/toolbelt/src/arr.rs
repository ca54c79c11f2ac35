//! Collection helpers over JSON values.
//!
//! Objects and arrays are both treated as collections: an array's keys are its
//! indices, an object's keys are its field names. Helpers that keep a subset
//! return the same kind of container they were given, with array indices
//! renumbered. Scalars behave as empty collections unless noted.
//!
//! Object field order follows [`serde_json::Map`].
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use toolbelt::arr;
//!
//! let users = json!([
//!     { "id": 1, "name": "ann", "active": true },
//!     { "id": 2, "name": "bo", "active": false },
//! ]);
//!
//! assert_eq!(arr::pluck(&users, "name", None), json!(["ann", "bo"]));
//! assert_eq!(
//!     arr::filter(&users, |user, _| user["active"] == json!(true)),
//!     json!([{ "id": 1, "name": "ann", "active": true }])
//! );
//! ```

use crate::dot::{self, parse_index};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Key of an entry within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    /// Position in an array
    Index(usize),
    /// Field name in an object
    Name(&'a str),
}

impl Key<'_> {
    /// The key as a string, as used by dot notation.
    pub fn to_key_string(&self) -> String {
        match self {
            Key::Index(index) => index.to_string(),
            Key::Name(name) => (*name).to_string(),
        }
    }
}

fn entries(target: &Value) -> Vec<(Key<'_>, &Value)> {
    match target {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (Key::Index(index), item))
            .collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (Key::Name(k.as_str()), v)).collect(),
        _ => Vec::new(),
    }
}

fn values(target: &Value) -> Vec<&Value> {
    entries(target).into_iter().map(|(_, v)| v).collect()
}

/// Merge the children of each child into one array, skipping scalars.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::arr;
///
/// let nested = json!([[1, 2], 3, { "a": 4 }, []]);
/// assert_eq!(arr::collapse(&nested), json!([1, 2, 4]));
/// ```
pub fn collapse(target: &Value) -> Value {
    Value::Array(collapse_items(values(target).into_iter().cloned()))
}

pub(crate) fn collapse_items(items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut results = Vec::new();
    for item in items {
        match item {
            Value::Array(values) => results.extend(values),
            Value::Object(map) => results.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
    results
}

/// Flatten nested collections into a single array.
///
/// `depth` limits how many levels are opened; `None` flattens completely.
/// A depth of `Some(0)` behaves like `Some(1)`.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::arr;
///
/// let nested = json!([1, [2, [3, [4]]]]);
/// assert_eq!(arr::flatten(&nested, None), json!([1, 2, 3, 4]));
/// assert_eq!(arr::flatten(&nested, Some(1)), json!([1, 2, [3, [4]]]));
/// ```
pub fn flatten(target: &Value, depth: Option<usize>) -> Value {
    let mut results = Vec::new();
    flatten_into(target, depth, &mut results);
    Value::Array(results)
}

fn flatten_into(target: &Value, depth: Option<usize>, results: &mut Vec<Value>) {
    for item in values(target) {
        if !dot::is_accessible(item) {
            results.push(item.clone());
        } else if matches!(depth, Some(0 | 1)) {
            results.extend(values(item).into_iter().cloned());
        } else {
            flatten_into(item, depth.map(|d| d - 1), results);
        }
    }
}

/// Keep only the entries whose key is listed in `keys`.
///
/// Keys are direct keys, not dot paths.
pub fn only(target: &Value, keys: &[&str]) -> Value {
    let wanted: HashSet<&str> = keys.iter().copied().collect();
    match target {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .filter(|(index, _)| wanted.contains(index.to_string().as_str()))
                .map(|(_, item)| item.clone())
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| wanted.contains(key.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        _ => Value::Object(Map::new()),
    }
}

/// Collect the value at `value_key` from every child.
///
/// Both keys are [`data_get`](dot::data_get) paths, so `*` is allowed.
/// Children missing `value_key` contribute `null`. With `key_by` the result
/// is an object keyed by each child's value at that path; later children win
/// on duplicate keys and children whose key is a collection are skipped.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::arr;
///
/// let rows = json!([{ "id": 7, "user": { "name": "ann" } }, { "id": 9 }]);
/// assert_eq!(
///     arr::pluck(&rows, "user.name", Some("id")),
///     json!({ "7": "ann", "9": null })
/// );
/// ```
pub fn pluck(target: &Value, value_key: &str, key_by: Option<&str>) -> Value {
    let children = values(target);
    let pick = |item: &Value| dot::data_get(item, value_key).unwrap_or(Value::Null);

    match key_by {
        None => Value::Array(children.into_iter().map(pick).collect()),
        Some(key_path) => {
            let mut results = Map::new();
            for item in children {
                let key = dot::data_get(item, key_path).unwrap_or(Value::Null);
                if let Some(key) = key_string(&key) {
                    results.insert(key, pick(item));
                }
            }
            Value::Object(results)
        }
    }
}

/// The first child, or `None` for an empty collection.
pub fn first(target: &Value) -> Option<&Value> {
    values(target).into_iter().next()
}

/// The first child for which `predicate` returns `true`.
pub fn first_where<F>(target: &Value, mut predicate: F) -> Option<&Value>
where
    F: FnMut(&Value, Key<'_>) -> bool,
{
    entries(target)
        .into_iter()
        .find(|(key, value)| predicate(*value, *key))
        .map(|(_, value)| value)
}

/// The last child, or `None` for an empty collection.
pub fn last(target: &Value) -> Option<&Value> {
    values(target).into_iter().next_back()
}

/// The last child for which `predicate` returns `true`.
pub fn last_where<F>(target: &Value, mut predicate: F) -> Option<&Value>
where
    F: FnMut(&Value, Key<'_>) -> bool,
{
    entries(target)
        .into_iter()
        .rev()
        .find(|(key, value)| predicate(*value, *key))
        .map(|(_, value)| value)
}

/// Keep the children for which `predicate` returns `true`.
pub fn filter<F>(target: &Value, mut predicate: F) -> Value
where
    F: FnMut(&Value, Key<'_>) -> bool,
{
    match target {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .filter(|(index, item)| predicate(*item, Key::Index(*index)))
                .map(|(_, item)| item.clone())
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, value)| predicate(*value, Key::Name(key.as_str())))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        _ => Value::Object(Map::new()),
    }
}

/// Wrap a non-collection in an array.
///
/// `null` becomes an empty array; arrays and objects are returned as is.
pub fn wrap(value: Value) -> Value {
    match value {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(_) | Value::Object(_) => value,
        scalar => Value::Array(vec![scalar]),
    }
}

/// Put `value` at the front of `target`.
///
/// Without a key the value is inserted at index 0 of an array. With a key it
/// is stored under that key, replacing any existing entry; an array target
/// is first converted to an object keyed by its indices. A scalar target is
/// treated as empty.
pub fn prepend(target: Value, value: Value, key: Option<&str>) -> Value {
    match (target, key) {
        (Value::Array(mut items), None) => {
            items.insert(0, value);
            Value::Array(items)
        }
        (Value::Object(map), None) => {
            let mut results = Map::new();
            results.insert("0".to_string(), value);
            let mut next = 1usize;
            for (k, v) in map {
                if parse_index(&k).is_some() {
                    results.insert(next.to_string(), v);
                    next += 1;
                } else {
                    results.insert(k, v);
                }
            }
            Value::Object(results)
        }
        (target, Some(key)) => {
            let mut results = Map::new();
            results.insert(key.to_string(), value);
            for (k, v) in entries(&target) {
                let k = k.to_key_string();
                if k != key {
                    results.insert(k, v.clone());
                }
            }
            Value::Object(results)
        }
        (_, None) => Value::Array(vec![value]),
    }
}

/// Whether `target` is an object whose keys are not exactly the indices
/// `0..len`.
///
/// Arrays and scalars are never associative.
pub fn is_assoc(target: &Value) -> bool {
    match target {
        Value::Object(map) => !map
            .keys()
            .all(|key| parse_index(key).is_some_and(|index| index < map.len())),
        _ => false,
    }
}

/// Split a collection into its keys and its values.
pub fn divide(target: &Value) -> (Value, Value) {
    let (keys, values): (Vec<Value>, Vec<Value>) = entries(target)
        .into_iter()
        .map(|(key, value)| {
            let key = match key {
                Key::Index(index) => Value::from(index),
                Key::Name(name) => Value::from(name),
            };
            (key, value.clone())
        })
        .unzip();
    (Value::Array(keys), Value::Array(values))
}

/// Every combination taking one child from each collection, in order.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::arr;
///
/// let joined = arr::cross_join(&[json!([1, 2]), json!(["a", "b"])]);
/// assert_eq!(joined, json!([[1, "a"], [1, "b"], [2, "a"], [2, "b"]]));
/// ```
pub fn cross_join(collections: &[Value]) -> Value {
    let mut results: Vec<Vec<Value>> = vec![Vec::new()];
    for collection in collections {
        let items = values(collection);
        results = results
            .into_iter()
            .flat_map(|product| {
                items.iter().map(move |item| {
                    let mut product = product.clone();
                    product.push((*item).clone());
                    product
                })
            })
            .collect();
    }
    Value::Array(results.into_iter().map(Value::Array).collect())
}

/// Encode `target` as an RFC 3986 query string.
///
/// Nested collections use bracket keys (`a[b]=1`, `list[0]=x`). `true` and
/// `false` become `1` and `0`; `null` entries are omitted.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::arr;
///
/// let query = arr::query(&json!({ "q": "rust lang", "page": { "size": 10 } }));
/// assert_eq!(query, "page%5Bsize%5D=10&q=rust%20lang");
/// ```
pub fn query(target: &Value) -> String {
    let mut pairs = Vec::new();
    for (key, value) in entries(target) {
        query_pairs(&key.to_key_string(), value, &mut pairs);
    }
    pairs.join("&")
}

fn query_pairs(prefix: &str, value: &Value, pairs: &mut Vec<String>) {
    let scalar = match value {
        Value::Null => return,
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            for (key, child) in entries(value) {
                query_pairs(&format!("{prefix}[{}]", key.to_key_string()), child, pairs);
            }
            return;
        }
    };
    pairs.push(format!(
        "{}={}",
        urlencoding::encode(prefix),
        urlencoding::encode(&scalar)
    ));
}

/// Drop repeated values from arrays, recursively.
///
/// The first occurrence is kept. Objects keep all their fields; their values
/// are deduplicated in turn.
pub fn unique(target: &Value) -> Value {
    match target {
        Value::Array(items) => {
            let mut results: Vec<Value> = Vec::with_capacity(items.len());
            for item in items.iter().map(unique) {
                if !results.contains(&item) {
                    results.push(item);
                }
            }
            Value::Array(results)
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), unique(v)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Nest flat records under their parents.
///
/// Each child of `target` is a record with an id at `primary_key` and a
/// parent id at `parent_key`. Records whose parent is not present become
/// roots; the others are appended to their parent's `children_key` array.
/// Ids compare by their string form, so `1` and `"1"` match. Records without
/// an id, and records in a parent cycle, are left out.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::arr;
///
/// let rows = json!([
///     { "id": 1, "pid": 0 },
///     { "id": 2, "pid": 1 },
///     { "id": 3, "pid": 1 },
/// ]);
///
/// assert_eq!(
///     arr::children_tree(&rows, "id", "pid", "children"),
///     json!([{ "id": 1, "pid": 0, "children": [
///         { "id": 2, "pid": 1 },
///         { "id": 3, "pid": 1 },
///     ] }])
/// );
/// ```
pub fn children_tree(
    target: &Value,
    primary_key: &str,
    parent_key: &str,
    children_key: &str,
) -> Value {
    let records: Vec<(String, &Value)> = values(target)
        .into_iter()
        .filter_map(|record| record_id(record, primary_key).map(|id| (id, record)))
        .collect();
    let ids: HashSet<&str> = records.iter().map(|(id, _)| id.as_str()).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<String, Vec<usize>> = HashMap::new();
    for (position, (_, record)) in records.iter().enumerate() {
        match record_id(record, parent_key) {
            Some(parent) if ids.contains(parent.as_str()) => {
                children.entry(parent).or_default().push(position);
            }
            _ => roots.push(position),
        }
    }

    Value::Array(
        roots
            .into_iter()
            .map(|root| build_node(root, &records, &children, children_key))
            .collect(),
    )
}

fn build_node(
    position: usize,
    records: &[(String, &Value)],
    children: &HashMap<String, Vec<usize>>,
    children_key: &str,
) -> Value {
    let (id, record) = &records[position];
    let mut node = (*record).clone();

    if let Some(positions) = children.get(id) {
        let nested: Vec<Value> = positions
            .iter()
            .map(|&child| build_node(child, records, children, children_key))
            .collect();
        if let Value::Object(map) = &mut node {
            map.insert(children_key.to_string(), Value::Array(nested));
        }
    }
    node
}

/// List records depth-first from `root_parent` down, tagging each with its
/// depth under `"level"`.
///
/// Records are matched on `parent_key == root_parent` at level 0, then on
/// their parent's `primary_key` at each further level, in input order. Ids
/// compare by their string form. A record is listed at most once.
///
/// ```rust
/// use serde_json::json;
/// use toolbelt::arr;
///
/// let rows = json!([
///     { "id": 2, "pid": 1 },
///     { "id": 1, "pid": 0 },
/// ]);
///
/// assert_eq!(
///     arr::level_tree(&rows, "0", "id", "pid"),
///     json!([
///         { "id": 1, "pid": 0, "level": 0 },
///         { "id": 2, "pid": 1, "level": 1 },
///     ])
/// );
/// ```
pub fn level_tree(target: &Value, root_parent: &str, primary_key: &str, parent_key: &str) -> Value {
    let records = values(target);
    let mut visited = vec![false; records.len()];
    let mut results = Vec::new();
    collect_level(
        &records,
        root_parent,
        0,
        primary_key,
        parent_key,
        &mut visited,
        &mut results,
    );
    Value::Array(results)
}

fn collect_level(
    records: &[&Value],
    parent: &str,
    level: usize,
    primary_key: &str,
    parent_key: &str,
    visited: &mut [bool],
    results: &mut Vec<Value>,
) {
    for (position, record) in records.iter().enumerate() {
        if visited[position] || record_id(record, parent_key).as_deref() != Some(parent) {
            continue;
        }
        visited[position] = true;

        let mut entry = (*record).clone();
        if let Value::Object(map) = &mut entry {
            map.insert("level".to_string(), Value::from(level));
        }
        results.push(entry);

        if let Some(id) = record_id(record, primary_key) {
            collect_level(
                records,
                &id,
                level + 1,
                primary_key,
                parent_key,
                visited,
                results,
            );
        }
    }
}

fn record_id(record: &Value, key: &str) -> Option<String> {
    match record {
        Value::Object(map) => map.get(key).and_then(key_string),
        _ => None,
    }
}

/// A scalar rendered the way it would be as a collection key.
fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some((if *b { "1" } else { "0" }).to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Value {
        json!([
            { "id": 1, "name": "ann", "role": "admin" },
            { "id": 2, "name": "bo", "role": "user" },
            { "id": 3, "name": "cy", "role": "user" }
        ])
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse(&json!([[1], [2, 3], "x", null])), json!([1, 2, 3]));
        assert_eq!(collapse(&json!({ "a": [1], "b": { "k": 2 } })), json!([1, 2]));
        assert_eq!(collapse(&json!(7)), json!([]));
    }

    #[test]
    fn test_flatten_depths() {
        let nested = json!(["a", ["b", ["c", ["d"]]], { "k": "e" }]);
        assert_eq!(flatten(&nested, None), json!(["a", "b", "c", "d", "e"]));
        assert_eq!(flatten(&nested, Some(1)), json!(["a", "b", ["c", ["d"]], "e"]));
        assert_eq!(flatten(&nested, Some(2)), json!(["a", "b", "c", ["d"], "e"]));
        assert_eq!(flatten(&json!([[]]), None), json!([]));
    }

    #[test]
    fn test_only() {
        let record = json!({ "id": 1, "name": "ann", "secret": "x" });
        assert_eq!(only(&record, &["id", "name", "missing"]), json!({ "id": 1, "name": "ann" }));
        assert_eq!(only(&json!(["a", "b", "c"]), &["0", "2"]), json!(["a", "c"]));
        assert_eq!(only(&json!("text"), &["0"]), json!({}));
    }

    #[test]
    fn test_pluck() {
        let data = users();
        assert_eq!(pluck(&data, "name", None), json!(["ann", "bo", "cy"]));
        assert_eq!(
            pluck(&data, "name", Some("id")),
            json!({ "1": "ann", "2": "bo", "3": "cy" })
        );
        // Later rows win on a shared key.
        assert_eq!(pluck(&data, "name", Some("role")), json!({ "admin": "ann", "user": "cy" }));
        assert_eq!(pluck(&data, "email", None), json!([null, null, null]));
    }

    #[test]
    fn test_pluck_wildcard_path() {
        let data = json!([{ "tags": [{ "n": "a" }, { "n": "b" }] }, { "tags": [] }]);
        assert_eq!(pluck(&data, "tags.*.n", None), json!([["a", "b"], []]));
    }

    fn is_plain_user(user: &Value, _: Key<'_>) -> bool {
        user["role"] == json!("user")
    }

    #[test]
    fn test_first_and_last() {
        let data = users();
        assert_eq!(first(&data), Some(&data[0]));
        assert_eq!(last(&data), Some(&data[2]));
        assert_eq!(first(&json!([])), None);
        assert_eq!(last(&json!(null)), None);

        assert_eq!(first_where(&data, is_plain_user), Some(&data[1]));
        assert_eq!(last_where(&data, is_plain_user), Some(&data[2]));
        assert_eq!(first_where(&data, |_, key| key == Key::Index(5)), None);
    }

    #[test]
    fn test_predicate_sees_object_keys() {
        let config = json!({ "host": "db", "port": 5432, "user": "app" });
        assert_eq!(
            last_where(&config, |_, key| matches!(key, Key::Name(name) if name.starts_with('p'))),
            Some(&json!(5432))
        );
    }

    #[test]
    fn test_filter_keeps_container_kind() {
        assert_eq!(
            filter(&json!([1, 2, 3, 4]), |v, _| v.as_i64().is_some_and(|n| n % 2 == 0)),
            json!([2, 4])
        );
        assert_eq!(
            filter(&json!({ "a": 1, "b": 2 }), |_, key| key != Key::Name("a")),
            json!({ "b": 2 })
        );
        assert_eq!(filter(&json!(3), |_, _| true), json!({}));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(Value::Null), json!([]));
        assert_eq!(wrap(json!("x")), json!(["x"]));
        assert_eq!(wrap(json!([1])), json!([1]));
        assert_eq!(wrap(json!({ "a": 1 })), json!({ "a": 1 }));
    }

    #[test]
    fn test_prepend() {
        assert_eq!(prepend(json!([2, 3]), json!(1), None), json!([1, 2, 3]));
        assert_eq!(
            prepend(json!({ "b": 2 }), json!(1), Some("a")),
            json!({ "a": 1, "b": 2 })
        );
        assert_eq!(
            prepend(json!({ "a": 0, "b": 2 }), json!(1), Some("a")),
            json!({ "a": 1, "b": 2 })
        );
        assert_eq!(
            prepend(json!(["x"]), json!("y"), Some("k")),
            json!({ "k": "y", "0": "x" })
        );
        assert_eq!(
            prepend(json!({ "0": "a", "name": "n" }), json!("z"), None),
            json!({ "0": "z", "1": "a", "name": "n" })
        );
        assert_eq!(prepend(json!(null), json!(1), None), json!([1]));
    }

    #[test]
    fn test_is_assoc() {
        assert!(is_assoc(&json!({ "a": 1 })));
        assert!(is_assoc(&json!({ "1": "x" })));
        assert!(!is_assoc(&json!({ "0": "x", "1": "y" })));
        assert!(!is_assoc(&json!({ "0": 0, "1": 1, "2": 2, "3": 3, "4": 4, "5": 5, "6": 6, "7": 7, "8": 8, "9": 9, "10": 10 })));
        assert!(is_assoc(&json!({ "0": "x", "01": "y" })));
        assert!(!is_assoc(&json!({})));
        assert!(!is_assoc(&json!([1, 2])));
        assert!(!is_assoc(&json!("a")));
    }

    #[test]
    fn test_divide() {
        assert_eq!(
            divide(&json!({ "a": 1, "b": [2] })),
            (json!(["a", "b"]), json!([1, [2]]))
        );
        assert_eq!(divide(&json!(["x", "y"])), (json!([0, 1]), json!(["x", "y"])));
    }

    #[test]
    fn test_cross_join() {
        assert_eq!(
            cross_join(&[json!([1, 2]), json!(["a"]), json!([true, false])]),
            json!([[1, "a", true], [1, "a", false], [2, "a", true], [2, "a", false]])
        );
        assert_eq!(cross_join(&[json!([1]), json!([])]), json!([]));
        assert_eq!(cross_join(&[]), json!([[]]));
    }

    #[test]
    fn test_query() {
        let data = json!({
            "filter": { "tags": ["a b", "c&d"] },
            "flag": true,
            "off": false,
            "skip": null,
            "n": 1.5
        });
        assert_eq!(
            query(&data),
            "filter%5Btags%5D%5B0%5D=a%20b&filter%5Btags%5D%5B1%5D=c%26d&flag=1&n=1.5&off=0"
        );
        assert_eq!(query(&json!(["x", "y"])), "0=x&1=y");
        assert_eq!(query(&json!({})), "");
    }

    #[test]
    fn test_unique() {
        assert_eq!(unique(&json!([1, 2, 1, "1", 2])), json!([1, 2, "1"]));
        assert_eq!(
            unique(&json!({ "a": [1, 1], "b": { "c": ["x", "x", "y"] } })),
            json!({ "a": [1], "b": { "c": ["x", "y"] } })
        );
        assert_eq!(unique(&json!([[1, 1], [1]])), json!([[1]]));
    }

    #[test]
    fn test_children_tree() {
        let rows = json!([
            { "id": 1, "pid": 0, "name": "root" },
            { "id": 2, "pid": 1, "name": "a" },
            { "id": 3, "pid": "2", "name": "a1" },
            { "id": 4, "pid": 9, "name": "orphan" },
            { "name": "no id" }
        ]);

        assert_eq!(
            children_tree(&rows, "id", "pid", "children"),
            json!([
                { "id": 1, "pid": 0, "name": "root", "children": [
                    { "id": 2, "pid": 1, "name": "a", "children": [
                        { "id": 3, "pid": "2", "name": "a1" }
                    ] }
                ] },
                { "id": 4, "pid": 9, "name": "orphan" }
            ])
        );
    }

    #[test]
    fn test_children_tree_drops_cycles() {
        let rows = json!([
            { "id": 1, "pid": 2 },
            { "id": 2, "pid": 1 },
            { "id": 3, "pid": 3 },
            { "id": 4, "pid": 0 }
        ]);
        assert_eq!(children_tree(&rows, "id", "pid", "kids"), json!([{ "id": 4, "pid": 0 }]));
    }

    #[test]
    fn test_level_tree() {
        let rows = json!([
            { "id": 1, "pid": 0 },
            { "id": 2, "pid": 1 },
            { "id": 3, "pid": 0 },
            { "id": 4, "pid": 2 },
            { "id": 5, "pid": 3 }
        ]);

        assert_eq!(
            level_tree(&rows, "0", "id", "pid"),
            json!([
                { "id": 1, "pid": 0, "level": 0 },
                { "id": 2, "pid": 1, "level": 1 },
                { "id": 4, "pid": 2, "level": 2 },
                { "id": 3, "pid": 0, "level": 0 },
                { "id": 5, "pid": 3, "level": 1 }
            ])
        );
        assert_eq!(
            level_tree(&rows, "2", "id", "pid"),
            json!([{ "id": 4, "pid": 2, "level": 0 }])
        );
    }

    #[test]
    fn test_level_tree_terminates_on_cycle() {
        let rows = json!([{ "id": 1, "pid": 1 }]);
        assert_eq!(
            level_tree(&rows, "1", "id", "pid"),
            json!([{ "id": 1, "pid": 1, "level": 0 }])
        );
    }
}
