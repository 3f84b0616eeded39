//! Typed model of a JSON Schema document.
//!
//! Only the structural keywords that contain sub-schemas (plus `type` and
//! `required`) get their own fields. Everything else, including `default`,
//! `$ref`, `title` and `enum`, lives in [`SchemaObject::extra`] and is
//! written back untouched on serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{LayerError, Result};

/// Named sub-schemas keyed by property name, pattern, or definition name.
pub type SchemaMap = BTreeMap<String, Schema>;

/// A schema node: either the degenerate `true`/`false` schema or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Schema {
    Bool(bool),
    Object(Box<SchemaObject>),
}

/// `items` is a single schema for every element, or a tuple of schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Single(Schema),
    Tuple(Vec<Schema>),
}

/// A `dependencies` entry: co-required property names, or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Properties(Vec<String>),
    Schema(Schema),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    #[serde(rename = "type", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub properties: Option<SchemaMap>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<SchemaMap>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub definitions: Option<SchemaMap>,
    #[serde(rename = "$defs", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub defs: Option<SchemaMap>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Schema>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub contains: Option<Schema>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Schema>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Schema>,
    #[serde(rename = "if", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub if_schema: Option<Schema>,
    #[serde(rename = "then", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub then_schema: Option<Schema>,
    #[serde(rename = "else", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub else_schema: Option<Schema>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub not: Option<Schema>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, Dependency>>,

    /// Every keyword without a dedicated field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize a keyword that is present. Absent keywords fall back to
/// `None` through `#[serde(default)]`; an explicit `null` is an error unless
/// `T` itself accepts it.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

type MapAccessor = fn(&mut SchemaObject) -> Option<&mut SchemaMap>;
type ListAccessor = fn(&mut SchemaObject) -> Option<&mut Vec<Schema>>;
type SingleAccessor = fn(&mut SchemaObject) -> Option<&mut Schema>;

/// Keywords holding a map of named sub-schemas. The map key names the entry.
pub(crate) const NAMED_SCHEMA_MAPS: [MapAccessor; 4] = [
    |s| s.properties.as_mut(),
    |s| s.pattern_properties.as_mut(),
    |s| s.definitions.as_mut(),
    |s| s.defs.as_mut(),
];

/// Composition keywords holding an unnamed list of sub-schemas.
pub(crate) const SCHEMA_LISTS: [ListAccessor; 3] = [
    |s| s.all_of.as_mut(),
    |s| s.any_of.as_mut(),
    |s| s.one_of.as_mut(),
];

/// Keywords holding exactly one sub-schema, named after the keyword itself.
pub(crate) const SINGLE_SCHEMAS: [(&str, SingleAccessor); 8] = [
    ("additionalItems", |s| s.additional_items.as_mut()),
    ("contains", |s| s.contains.as_mut()),
    ("additionalProperties", |s| s.additional_properties.as_mut()),
    ("propertyNames", |s| s.property_names.as_mut()),
    ("if", |s| s.if_schema.as_mut()),
    ("then", |s| s.then_schema.as_mut()),
    ("else", |s| s.else_schema.as_mut()),
    ("not", |s| s.not.as_mut()),
];

impl Schema {
    /// Parse a schema from an arbitrary JSON value.
    ///
    /// Anything that is not a boolean or a well-formed schema object is
    /// rejected, e.g. a `required` that is not an array of strings.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| LayerError::InvalidSchema(e.to_string()))
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Bool(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut SchemaObject> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Bool(_) => None,
        }
    }
}

impl SchemaObject {
    /// True when `type` is exactly the given string (not a list of types).
    pub fn is_type(&self, name: &str) -> bool {
        matches!(&self.instance_type, Some(Value::String(t)) if t == name)
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.extra.get("default")
    }

    pub fn set_default(&mut self, value: Value) {
        self.extra.insert("default".to_string(), value);
    }
}
