//! OpenAPI document structs for serde deserialization.
//!
//! Only the subset of OpenAPI 3.0/3.1 that drives type and operation synthesis
//! is modelled. Every map is an [`IndexMap`] so declaration order survives
//! decoding and drives output order.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Root API document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenApiDocument {
    /// Route template to path item, in declaration order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components.
    #[serde(default)]
    pub components: Components,
}

impl OpenApiDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Parse a document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Parse(e.to_string()))
    }
}

/// The `components` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    #[serde(default)]
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
}

/// Either an inline object or a `$ref` to one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

/// A bare `{"$ref": "..."}` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

/// Keys of a path item that hold operations.
const OPERATION_KEYS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A path item: shared parameters plus its operations in declaration order.
///
/// Decoded through an ordered map so that verb order is whatever the document
/// declares, not a fixed struct field order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "IndexMap<String, serde_json::Value>")]
pub struct PathItem {
    /// Path-level parameters inherited by every operation.
    pub parameters: Vec<RefOr<Parameter>>,
    /// `(lowercase verb, operation)` pairs.
    pub operations: Vec<(String, Operation)>,
}

impl TryFrom<IndexMap<String, serde_json::Value>> for PathItem {
    type Error = String;

    fn try_from(raw: IndexMap<String, serde_json::Value>) -> std::result::Result<Self, String> {
        let mut item = Self::default();
        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = serde_json::from_value(value)
                    .map_err(|e| format!("invalid path-level parameters: {e}"))?;
            } else if OPERATION_KEYS.contains(&key.as_str()) {
                let operation = serde_json::from_value(value)
                    .map_err(|e| format!("invalid `{key}` operation: {e}"))?;
                item.operations.push((key, operation));
            }
        }
        Ok(item)
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
    pub request_body: Option<RefOr<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
    #[serde(default)]
    pub deprecated: bool,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// A parameter (path, query, header or cookie).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content (e.g. `application/json`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// Pick the media type whose schema should be used.
///
/// The first `application/json*` entry wins (case-insensitive, media type
/// parameters ignored); otherwise the first declared entry.
pub fn preferred_media(content: &IndexMap<String, MediaType>) -> Option<&MediaType> {
    content
        .iter()
        .find(|(media, _)| is_json_media(media))
        .or_else(|| content.first())
        .map(|(_, media)| media)
}

fn is_json_media(media: &str) -> bool {
    media
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
        .starts_with("application/json")
}

/// JSON Schema node as used by OpenAPI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `type`, either a single type or an OpenAPI 3.1 type array.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another component.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Format hint (e.g. date-time, int64).
    pub format: Option<String>,

    pub description: Option<String>,

    /// Properties for object types.
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    #[serde(default)]
    pub required: Vec<String>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    pub all_of: Option<Vec<Schema>>,
    pub one_of: Option<Vec<Schema>>,
    pub any_of: Option<Vec<Schema>>,

    /// `additionalProperties`, a boolean or a value schema.
    pub additional_properties: Option<AdditionalProperties>,

    /// Discriminator for polymorphic composites.
    pub discriminator: Option<Discriminator>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    #[serde(default)]
    pub nullable: bool,
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// The property carrying the variant tag.
    pub property_name: String,
    /// Variant tag to schema reference.
    #[serde(default)]
    pub mapping: IndexMap<String, String>,
}

/// Schema type can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

/// Composition keyword of a composite schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    AllOf,
    OneOf,
    AnyOf,
}

/// Structural classification of a [`Schema`] node.
#[derive(Debug, Clone, Copy)]
pub enum SchemaShape<'a> {
    /// `$ref`; any sibling keywords are ignored.
    Reference(&'a str),
    /// `allOf` / `oneOf` / `anyOf`.
    Composite {
        kind: CompositeKind,
        members: &'a [Schema],
    },
    /// `type: array`, or `items` without a type.
    Array(Option<&'a Schema>),
    /// `type: object`, or `properties`/`additionalProperties` without a type.
    Object,
    /// Any other single type name, including unrecognized ones.
    Primitive(&'a str),
    /// Several non-null types (`type: [string, number]`).
    MultiType,
    /// No type and no structural keyword: `{}`.
    Empty,
}

impl Schema {
    /// Classify this node. Composition keywords take precedence over `type`.
    pub fn shape(&self) -> SchemaShape<'_> {
        if let Some(target) = &self.ref_path {
            return SchemaShape::Reference(target);
        }
        for (kind, members) in [
            (CompositeKind::AllOf, &self.all_of),
            (CompositeKind::OneOf, &self.one_of),
            (CompositeKind::AnyOf, &self.any_of),
        ] {
            if let Some(members) = members {
                return SchemaShape::Composite { kind, members };
            }
        }

        let non_null = self.non_null_types();
        match non_null.as_slice() {
            [] => {}
            ["array"] => return SchemaShape::Array(self.items.as_deref()),
            ["object"] => return SchemaShape::Object,
            [single] => return SchemaShape::Primitive(*single),
            _ => return SchemaShape::MultiType,
        }

        if self.properties.is_some() || self.additional_properties.is_some() {
            SchemaShape::Object
        } else if let Some(items) = &self.items {
            SchemaShape::Array(Some(items))
        } else if self.enum_values.is_some() {
            SchemaShape::Primitive("string")
        } else if self.is_null_type() {
            SchemaShape::Primitive("null")
        } else {
            SchemaShape::Empty
        }
    }

    /// Declared type names other than `null`.
    pub fn non_null_types(&self) -> Vec<&str> {
        match &self.schema_type {
            Some(SchemaType::Single(t)) if t != "null" => vec![t.as_str()],
            Some(SchemaType::Multiple(types)) => types
                .iter()
                .map(String::as_str)
                .filter(|t| *t != "null")
                .collect(),
            _ => Vec::new(),
        }
    }

    /// True for `type: "null"` (or a type array holding only `null`).
    pub fn is_null_type(&self) -> bool {
        match &self.schema_type {
            Some(SchemaType::Single(t)) => t == "null",
            Some(SchemaType::Multiple(types)) => {
                !types.is_empty() && types.iter().all(|t| t == "null")
            }
            None => false,
        }
    }

    /// Whether the node admits `null`: the 3.0 flag or a 3.1 type array.
    ///
    /// References never carry nullability themselves.
    pub fn is_nullable(&self) -> bool {
        if self.ref_path.is_some() {
            return false;
        }
        self.nullable
            || matches!(&self.schema_type, Some(SchemaType::Multiple(types))
                if types.iter().any(|t| t == "null") && types.len() > 1)
    }
}
