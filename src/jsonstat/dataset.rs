//! Reading the JSON-stat dataset shape: dataset body, dimension order, category keys and labels.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{ToolError, ToolResult};

/// Metadata keys inside the dimension container that never name a dimension.
const RESERVED_DIMENSION_KEYS: [&str; 3] = ["id", "size", "role"];

/// One categorical axis of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name as used in the header row.
    pub name: String,
    /// Category keys in coordinate order.
    pub keys: Vec<String>,
    /// Display labels by key. Keys whose label is null are absent.
    pub labels: HashMap<String, String>,
}

impl Dimension {
    pub fn size(&self) -> usize {
        self.keys.len()
    }

    /// Cell text for the category at `coordinate`: its label if one exists, else the raw key.
    pub fn cell(&self, coordinate: usize) -> &str {
        let key = self.keys[coordinate].as_str();
        self.labels.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// A parsed dataset: dimensions in resolved order plus the flat value array.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonStatDataset {
    pub dimensions: Vec<Dimension>,
    pub values: Vec<Value>,
}

impl JsonStatDataset {
    /// Parse a JSON-stat document.
    ///
    /// Uses the nested `"dataset"` object when there is one, otherwise the document root.
    /// Fails with [`ToolError::MalformedInput`] when the body has no `"dimension"` object, or
    /// when `"value"` is absent or not an array.
    pub fn from_value(doc: &Value) -> ToolResult<Self> {
        let body = dataset_body(doc);

        let container = body
            .get("dimension")
            .and_then(Value::as_object)
            .ok_or_else(|| ToolError::malformed("dimension", "dataset has no dimension object"))?;

        let dimensions = dimension_order(body, container)
            .into_iter()
            .map(|name| {
                let category = container.get(&name).and_then(|d| d.get("category"));
                Dimension {
                    keys: category.map(category_keys).unwrap_or_default(),
                    labels: category.map(category_labels).unwrap_or_default(),
                    name,
                }
            })
            .collect();

        let values = match body.get("value") {
            Some(Value::Array(values)) => values.clone(),
            Some(_) => return Err(ToolError::malformed("value", "value is not an array")),
            None => return Err(ToolError::malformed("value", "dataset has no value array")),
        };

        Ok(Self { dimensions, values })
    }

    /// Parse a JSON-stat document from text.
    pub fn parse_str(input: &str) -> ToolResult<Self> {
        let doc: Value = serde_json::from_str(input)?;
        Self::from_value(&doc)
    }

    pub fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }
}

fn dataset_body(doc: &Value) -> &Value {
    match doc.get("dataset") {
        Some(body) if body.is_object() => body,
        _ => doc,
    }
}

/// First non-empty of: body `id`, container `id`, container keys minus reserved metadata keys.
fn dimension_order(body: &Value, container: &Map<String, Value>) -> Vec<String> {
    let from_body = string_list(body.get("id"));
    if !from_body.is_empty() {
        return from_body;
    }

    let from_container = string_list(container.get("id"));
    if !from_container.is_empty() {
        return from_container;
    }

    container
        .keys()
        .filter(|k| {
            !RESERVED_DIMENSION_KEYS
                .iter()
                .any(|reserved| k.eq_ignore_ascii_case(reserved))
        })
        .cloned()
        .collect()
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

/// Category keys by priority: `index` array, `index` object keys, `label` object keys, none.
fn category_keys(category: &Value) -> Vec<String> {
    match category.get("index") {
        Some(Value::Array(items)) => items.iter().map(render_cell).collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => category
            .get("label")
            .and_then(Value::as_object)
            .map(|labels| labels.keys().cloned().collect())
            .unwrap_or_default(),
    }
}

fn category_labels(category: &Value) -> HashMap<String, String> {
    category
        .get("label")
        .and_then(Value::as_object)
        .map(|labels| {
            labels
                .iter()
                .filter(|(_, label)| !label.is_null())
                .map(|(key, label)| (key.clone(), render_cell(label)))
                .collect()
        })
        .unwrap_or_default()
}

/// Text for one JSON value as a CSV cell.
///
/// Null is empty, strings are their contents, numbers keep their source text, anything else is
/// its compact JSON rendering.
pub fn render_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
