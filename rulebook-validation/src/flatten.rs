//! Input flattening.
//!
//! Raw form input arrives as nested maps and lists (`name[]` fields, nested
//! objects, PHP-style `$_FILES` blocks). Rules address it by dotted paths,
//! so everything is flattened into one ordered map from path to scalar.
//!
//! Array-shaped fields are recorded separately as *groups* rather than as a
//! marker entry in the value map, so wildcard bookkeeping can never be
//! mistaken for data.

use crate::value::FlatValue;
use indexmap::{IndexMap, IndexSet};
use rulebook_files::UploadedFile;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Ordered mapping from dotted attribute path to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedData {
    values: IndexMap<String, FlatValue>,
    groups: IndexSet<String>,
}

impl FlattenedData {
    /// Create empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value at `path`.
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<FlatValue>) {
        self.values.insert(path.into(), value.into());
    }

    /// Record `path` as array-shaped.
    pub fn mark_group(&mut self, path: impl Into<String>) {
        self.groups.insert(path.into());
    }

    /// Get the value at `path`.
    pub fn get(&self, path: &str) -> Option<&FlatValue> {
        self.values.get(path)
    }

    /// Whether `path` holds a value or names a group.
    pub fn contains(&self, path: &str) -> bool {
        self.values.contains_key(path) || self.groups.contains(path)
    }

    /// Whether `path` names an array-shaped field.
    pub fn is_group(&self, path: &str) -> bool {
        self.groups.contains(path)
    }

    /// The group `path` belongs to: the path itself when it names a group,
    /// or its parent when `path` is a numbered element of one.
    pub fn group_of<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.is_group(path) {
            return Some(path);
        }
        let (parent, index) = path.rsplit_once('.')?;
        (is_index(index) && self.is_group(parent)).then_some(parent)
    }

    /// All values nested under `group`.
    pub fn group_elements<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a FlatValue)> + 'a {
        self.values.iter().filter_map(move |(key, value)| {
            key.strip_prefix(group)
                .filter(|rest| rest.starts_with('.'))
                .map(|_| (key.as_str(), value))
        })
    }

    /// Flattened paths, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Flattened entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlatValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Array-shaped field names.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    /// Number of flattened values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are neither values nor groups.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.groups.is_empty()
    }

    /// Merge `other` on top of `self`; its values win on collision.
    pub fn merge(&mut self, other: FlattenedData) {
        self.values.extend(other.values);
        self.groups.extend(other.groups);
    }
}

/// Flatten raw fields and raw uploads into one map.
///
/// Upload entries are merged on top of field entries.
pub fn flatten(fields: &Value, files: &Value) -> FlattenedData {
    let mut data = flatten_fields(fields);
    data.merge(flatten_files(files));
    data
}

/// Flatten raw field input.
///
/// Nested collections get dotted keys (`user.email`, `tags.0`). A numeric
/// top-level key holding a map is a row of repeated inputs, so
/// `[{"name": "a"}, {"name": "b"}]` becomes `name.0` and `name.1`. Numeric
/// top-level keys holding anything else are dropped.
pub fn flatten_fields(fields: &Value) -> FlattenedData {
    let mut data = FlattenedData::new();
    let mut rows = RowCounter::default();

    for (key, value) in top_level(fields) {
        if !is_index(&key) {
            walk(&mut data, key, value);
            continue;
        }
        match value {
            Value::Object(row) => {
                for (field, value) in row {
                    let path = rows.next(field);
                    data.mark_group(field.as_str());
                    walk(&mut data, path, value);
                }
            }
            _ => debug!(key = %key, "Dropping numeric top-level field"),
        }
    }

    data
}

/// Flatten a raw upload structure shaped like PHP's `$_FILES`.
///
/// Each field maps to `{name, tmp_name, size, ...}` where every property is
/// either a scalar (one file) or a list (several files under one name).
/// Uploads with a size of zero or less, or whose temporary file is gone,
/// are left out.
pub fn flatten_files(files: &Value) -> FlattenedData {
    let mut data = FlattenedData::new();
    let mut rows = RowCounter::default();

    for (key, value) in top_level(files) {
        if !is_index(&key) || is_descriptor(value) {
            add_upload(&mut data, key, value);
            continue;
        }
        if let Value::Object(row) = value {
            for (field, descriptor) in row {
                let path = rows.next(field);
                data.mark_group(field.as_str());
                add_upload(&mut data, path, descriptor);
            }
        }
    }

    data
}

fn top_level(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Value::Null => Vec::new(),
        _ => {
            debug!("Ignoring scalar input root");
            Vec::new()
        }
    }
}

fn walk(data: &mut FlattenedData, path: String, value: &Value) {
    match value {
        Value::Object(map) => {
            data.mark_group(path.as_str());
            for (key, child) in map {
                walk(data, format!("{}.{}", path, key), child);
            }
        }
        Value::Array(items) => {
            data.mark_group(path.as_str());
            for (index, child) in items.iter().enumerate() {
                walk(data, format!("{}.{}", path, index), child);
            }
        }
        scalar => data.insert(path, FlatValue::from(scalar)),
    }
}

fn add_upload(data: &mut FlattenedData, path: String, descriptor: &Value) {
    let Value::Object(descriptor) = descriptor else {
        debug!(field = %path, "Ignoring malformed upload entry");
        return;
    };

    match descriptor.get("size") {
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            data.mark_group(path.as_str());
            for index in indices(descriptor.get("size")) {
                let element = format!("{}.{}", path, index);
                add_single(data, element, descriptor, Some(index.as_str()));
            }
        }
        _ => add_single(data, path, descriptor, None),
    }
}

fn add_single(
    data: &mut FlattenedData,
    path: String,
    descriptor: &Map<String, Value>,
    index: Option<&str>,
) {
    let property = |name: &str| {
        let value = descriptor.get(name)?;
        match index {
            Some(index) => element(value, index),
            None => Some(value),
        }
    };

    let size = property("size").and_then(as_size).unwrap_or(0);
    if size <= 0 {
        debug!(field = %path, "Skipping empty upload");
        return;
    }

    let Some(tmp_name) = property("tmp_name").and_then(Value::as_str) else {
        debug!(field = %path, "Skipping upload without a temporary path");
        return;
    };
    let original_name = property("name").and_then(Value::as_str).unwrap_or_default();

    match UploadedFile::new(tmp_name, original_name, size as u64) {
        Ok(file) => data.insert(path, file),
        Err(e) => debug!(field = %path, error = %e, "Dropping upload"),
    }
}

fn is_descriptor(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("tmp_name") || map.contains_key("size"))
}

fn indices(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

fn element<'a>(value: &'a Value, index: &str) -> Option<&'a Value> {
    match value {
        Value::Array(items) => items.get(index.parse::<usize>().ok()?),
        Value::Object(map) => map.get(index),
        scalar => Some(scalar),
    }
}

fn as_size(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a path segment is a numeric index.
pub(crate) fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Hands out `field.0`, `field.1`, ... for repeated-input rows.
#[derive(Default)]
struct RowCounter(HashMap<String, usize>);

impl RowCounter {
    fn next(&mut self, field: &str) -> String {
        let counter = self.0.entry(field.to_string()).or_insert(0);
        let path = format!("{}.{}", field, counter);
        *counter += 1;
        path
    }
}
