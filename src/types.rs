use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document identifier, the `objectID` of the source JSON.
pub type DocumentId = String;

/// A repository document as seen by the search engine: an identifier, the
/// repository path it lives at and a set of named property values.
///
/// Use [`Document::from_json`] to parse from a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub path: String,
    pub fields: HashMap<String, FieldValue>,
}

impl Document {
    /// Parse a [`Document`] from a JSON object.
    ///
    /// Accepts either `"_id"` or `"objectID"` as the identifier and `"_path"`
    /// as the repository path (defaults to `/<id>`). All other fields are
    /// converted to [`FieldValue`]s; strings in RFC 3339 form become dates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FacetNavError::InvalidQuery`] if the value is not a JSON
    /// object or carries no identifier.
    pub fn from_json(json: &serde_json::Value) -> crate::error::Result<Self> {
        use crate::error::FacetNavError;

        let obj = json
            .as_object()
            .ok_or_else(|| FacetNavError::InvalidQuery("Expected JSON object".to_string()))?;

        let id = obj
            .get("_id")
            .or_else(|| obj.get("objectID"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| FacetNavError::InvalidQuery("Missing objectID".to_string()))?
            .to_string();

        let path = match obj.get("_path").and_then(|v| v.as_str()) {
            Some(p) => p.trim_end_matches('/').to_string(),
            None => format!("/{}", id),
        };

        let mut fields = HashMap::new();
        for (key, val) in obj {
            if key == "_id" || key == "objectID" || key == "_path" {
                continue;
            }
            if let Some(field_value) = json_value_to_field_value(val) {
                fields.insert(key.clone(), field_value);
            }
        }

        Ok(Document { id, path, fields })
    }

    /// Parse a JSON array of document objects.
    pub fn list_from_json(json: &serde_json::Value) -> crate::error::Result<Vec<Self>> {
        let items = json.as_array().ok_or_else(|| {
            crate::error::FacetNavError::InvalidQuery("Expected JSON array of documents".into())
        })?;
        items.iter().map(Document::from_json).collect()
    }

    /// Convert back to flat JSON: `{"_id": .., "_path": .., "field": value, ..}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "_id".to_string(),
            serde_json::Value::String(self.id.clone()),
        );
        map.insert(
            "_path".to_string(),
            serde_json::Value::String(self.path.clone()),
        );

        for (key, field_value) in &self.fields {
            map.insert(key.clone(), field_value_to_json_value(field_value));
        }

        serde_json::Value::Object(map)
    }

    /// The handle a document variant belongs to: its parent path.
    pub fn handle(&self) -> &str {
        match self.path.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &self.path[..idx],
        }
    }

    /// True when the document lives at `base` or anywhere below it.
    pub fn is_under(&self, base: &str) -> bool {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return true;
        }
        self.path == base
            || (self.path.starts_with(base) && self.path.as_bytes().get(base.len()) == Some(&b'/'))
    }
}

pub fn json_value_to_field_value(val: &serde_json::Value) -> Option<FieldValue> {
    match val {
        serde_json::Value::String(s) => match chrono::DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Some(FieldValue::Date(dt.timestamp_millis())),
            Err(_) => Some(FieldValue::Text(s.clone())),
        },
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(FieldValue::Integer(i))
            } else {
                n.as_f64().map(FieldValue::Float)
            }
        }
        serde_json::Value::Array(arr) => {
            let items: Vec<FieldValue> = arr.iter().filter_map(json_value_to_field_value).collect();
            if items.is_empty() {
                None
            } else {
                Some(FieldValue::Array(items))
            }
        }
        serde_json::Value::Object(_) | serde_json::Value::Null | serde_json::Value::Bool(_) => {
            None
        }
    }
}

pub fn field_value_to_json_value(field_value: &FieldValue) -> serde_json::Value {
    match field_value {
        FieldValue::Text(s) => serde_json::Value::String(s.clone()),
        FieldValue::Integer(i) => serde_json::json!(i),
        FieldValue::Float(f) => serde_json::json!(f),
        FieldValue::Date(d) => match chrono::DateTime::from_timestamp_millis(*d) {
            Some(dt) => serde_json::Value::String(dt.to_rfc3339()),
            None => serde_json::json!(d),
        },
        FieldValue::Array(arr) => {
            let items: Vec<serde_json::Value> = arr.iter().map(field_value_to_json_value).collect();
            serde_json::Value::Array(items)
        }
    }
}

/// A dynamically-typed property value stored in a [`Document`].
///
/// `Array` is a multi-valued property; every element is a value of its own
/// for faceting purposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Array(Vec<FieldValue>),
    Text(String),
    Integer(i64),
    Float(f64),
    Date(i64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<i64> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Single values of this property, flattening multi-valued arrays.
    pub fn values(&self) -> Vec<&FieldValue> {
        match self {
            FieldValue::Array(items) => items.iter().flat_map(|v| v.values()).collect(),
            other => vec![other],
        }
    }

    /// Plain string rendering used for result-set properties and sorting.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Date(d) => match chrono::DateTime::from_timestamp_millis(*d) {
                Some(dt) => dt.to_rfc3339(),
                None => d.to_string(),
            },
            FieldValue::Array(items) => items
                .iter()
                .map(|v| v.to_display_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}
