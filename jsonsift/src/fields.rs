//! Field inference for builder UIs: walk one representative record and list
//! every addressable node with its runtime type and a sample value.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path;

/// The runtime type tag of a JSON node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl FieldType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => FieldType::Null,
            Value::Bool(_) => FieldType::Boolean,
            Value::Number(_) => FieldType::Number,
            Value::String(_) => FieldType::String,
            Value::Array(_) => FieldType::Array,
            Value::Object(_) => FieldType::Object,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Null => "null",
        };
        f.write_str(name)
    }
}

/// An addressable field discovered in a representative record. Derived and
/// ephemeral: recomputed whenever the dataset changes, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub path: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<Value>,
}

/// Walk one record depth-first and list every reachable leaf and every
/// intermediate array/object node. Object keys are visited in encounter
/// order; arrays are sampled at element 0 only (treated as homogeneous).
/// Never errors.
pub fn inspect(record: &Value) -> Vec<FieldInfo> {
    let mut out = Vec::new();
    collect(record, "", &mut out);
    out
}

fn collect(value: &Value, current_path: &str, out: &mut Vec<FieldInfo>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if current_path.is_empty() { key.clone() } else { format!("{current_path}.{key}") };
                match child {
                    Value::Object(_) => {
                        out.push(FieldInfo { path: child_path.clone(), ty: FieldType::Object, sample: None });
                        collect(child, &child_path, out);
                    }
                    Value::Array(items) => {
                        out.push(FieldInfo { path: child_path.clone(), ty: FieldType::Array, sample: None });
                        if let Some(first) = items.first() {
                            collect(first, &format!("{child_path}[0]"), out);
                        }
                    }
                    Value::Null => out.push(FieldInfo { path: child_path, ty: FieldType::Null, sample: None }),
                    primitive => out.push(FieldInfo { path: child_path, ty: FieldType::of(primitive), sample: Some(primitive.clone()) }),
                }
            }
        }
        Value::Array(items) => {
            out.push(FieldInfo { path: current_path.to_owned(), ty: FieldType::Array, sample: None });
            if let Some(first) = items.first() {
                collect(first, &format!("{current_path}[0]"), out);
            }
        }
        Value::Null => out.push(FieldInfo { path: current_path.to_owned(), ty: FieldType::Null, sample: None }),
        primitive => out.push(FieldInfo { path: current_path.to_owned(), ty: FieldType::of(primitive), sample: Some(primitive.clone()) }),
    }
}

/// Derive builder fields from a dataset by sampling its first record.
/// An empty dataset yields an empty field list.
pub fn inspect_dataset(data: &[Value]) -> Vec<FieldInfo> {
    let Some(first) = data.first() else {
        return Vec::new();
    };
    let fields = inspect(first);
    tracing::debug!(fields = fields.len(), "inspected representative record");
    fields
}

/// Distinct values reachable at `field_path` across the dataset, in
/// first-seen order. Composite values are deduplicated by their JSON text.
pub fn unique_values(data: &[Value], field_path: &str) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in data {
        if let Some(value) = path::resolve(record, field_path) {
            if seen.insert(value.to_string()) {
                out.push(value.clone());
            }
        }
    }
    out
}
