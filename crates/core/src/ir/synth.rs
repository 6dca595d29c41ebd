//! Schema node to [`TypeExpr`] synthesis.
//!
//! References are never inlined: a `$ref` becomes a [`TypeExpr::Named`] on
//! sight, so recursion only walks inline structure and cyclic schema graphs
//! terminate.

use tracing::{debug, warn};

use crate::error::Result;
use crate::spec::{AdditionalProperties, CompositeKind, EnumValue, Schema, SchemaShape};

use super::resolve::RefResolver;
use super::types::{Field, ObjectShape, Scalar, TypeExpr};

/// Converts schema nodes into type expressions.
#[derive(Debug, Clone, Copy)]
pub struct TypeSynthesizer<'a> {
    resolver: RefResolver<'a>,
}

impl<'a> TypeSynthesizer<'a> {
    pub fn new(resolver: RefResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &RefResolver<'a> {
        &self.resolver
    }

    /// Synthesize `schema`. `name_hint` locates the node in logs
    /// (e.g. `Pet.tags[]`); it never affects the result.
    pub fn synthesize(&self, schema: &Schema, name_hint: &str) -> Result<TypeExpr> {
        let ty = self.synthesize_inner(schema, name_hint)?;
        Ok(if schema.is_nullable() { ty.nullable() } else { ty })
    }

    fn synthesize_inner(&self, schema: &Schema, name_hint: &str) -> Result<TypeExpr> {
        match schema.shape() {
            SchemaShape::Reference(target) => Ok(TypeExpr::Named(self.resolver.resolve(target)?)),
            SchemaShape::Composite { kind, members } => {
                self.composite(schema, kind, members, name_hint)
            }
            SchemaShape::Array(items) => {
                let items = match items {
                    Some(items) => self.synthesize(items, &format!("{name_hint}[]"))?,
                    None => TypeExpr::Scalar(Scalar::Any),
                };
                Ok(TypeExpr::array_of(items))
            }
            SchemaShape::Object => self.object(schema, name_hint).map(TypeExpr::Object),
            SchemaShape::Primitive(kind) => Ok(self.primitive(schema, kind, name_hint)),
            SchemaShape::MultiType => {
                let members = schema
                    .non_null_types()
                    .into_iter()
                    .map(|kind| self.primitive_kind(kind, name_hint))
                    .collect::<Vec<_>>();
                Ok(TypeExpr::union(members))
            }
            SchemaShape::Empty => Ok(TypeExpr::Object(ObjectShape::default())),
        }
    }

    fn composite(
        &self,
        schema: &Schema,
        kind: CompositeKind,
        members: &[Schema],
        name_hint: &str,
    ) -> Result<TypeExpr> {
        let mut admits_null = false;
        let mut types = Vec::with_capacity(members.len() + 1);
        for (i, member) in members.iter().enumerate() {
            if member.is_null_type() {
                admits_null = true;
                continue;
            }
            types.push(self.synthesize(member, &format!("{name_hint}/{i}"))?);
        }

        let combined = match kind {
            CompositeKind::AllOf => {
                if schema.properties.is_some() {
                    types.push(TypeExpr::Object(self.object(schema, name_hint)?));
                }
                TypeExpr::intersection(types)
            }
            CompositeKind::OneOf | CompositeKind::AnyOf => TypeExpr::union(types),
        };
        Ok(if admits_null { combined.nullable() } else { combined })
    }

    fn object(&self, schema: &Schema, name_hint: &str) -> Result<ObjectShape> {
        let open_index = match &schema.additional_properties {
            None | Some(AdditionalProperties::Bool(false)) => None,
            Some(AdditionalProperties::Bool(true)) => Some(TypeExpr::Scalar(Scalar::Any)),
            Some(AdditionalProperties::Schema(values)) => match values.shape() {
                SchemaShape::Empty => Some(TypeExpr::Scalar(Scalar::Any)),
                _ => Some(self.synthesize(values, &format!("{name_hint}[*]"))?),
            },
        };

        let Some(properties) = &schema.properties else {
            // No declared properties: a free-form map unless explicitly closed.
            return Ok(match schema.additional_properties {
                Some(AdditionalProperties::Bool(false)) => ObjectShape::default(),
                _ => ObjectShape {
                    fields: Vec::new(),
                    open_index: Some(Box::new(
                        open_index.unwrap_or(TypeExpr::Scalar(Scalar::Any)),
                    )),
                },
            });
        };

        let mut fields = Vec::with_capacity(properties.len());
        for (name, property) in properties {
            fields.push(Field {
                name: name.clone(),
                ty: self.synthesize(property, &format!("{name_hint}.{name}"))?,
                optional: open_index.is_some() || !schema.required.contains(name),
                doc: property.description.clone(),
            });
        }
        Ok(ObjectShape {
            fields,
            open_index: open_index.map(Box::new),
        })
    }

    fn primitive(&self, schema: &Schema, kind: &str, name_hint: &str) -> TypeExpr {
        let base = self.primitive_kind(kind, name_hint);
        let Some(values) = &schema.enum_values else {
            return base;
        };
        if base != TypeExpr::Scalar(Scalar::String) {
            return base;
        }

        let admits_null = values.iter().any(|value| matches!(value, EnumValue::Null));
        let literals = TypeExpr::literals(values.iter().filter_map(enum_literal));
        if admits_null { literals.nullable() } else { literals }
    }

    fn primitive_kind(&self, kind: &str, name_hint: &str) -> TypeExpr {
        match kind {
            "integer" | "long" | "float" | "double" | "number" => TypeExpr::Scalar(Scalar::Number),
            "boolean" => TypeExpr::Scalar(Scalar::Boolean),
            "string" | "byte" | "binary" | "date" | "dateTime" | "date-time" | "password" => {
                TypeExpr::Scalar(Scalar::String)
            }
            "null" => {
                debug!(schema = %name_hint, "bare null type synthesized as any");
                TypeExpr::Scalar(Scalar::Any)
            }
            other => {
                warn!(schema = %name_hint, kind = %other, "unrecognized schema type, using any");
                TypeExpr::Scalar(Scalar::Any)
            }
        }
    }
}

fn enum_literal(value: &EnumValue) -> Option<String> {
    match value {
        EnumValue::String(s) => Some(s.clone()),
        EnumValue::Integer(i) => Some(i.to_string()),
        EnumValue::Float(f) => Some(f.to_string()),
        EnumValue::Bool(b) => Some(b.to_string()),
        EnumValue::Null => None,
    }
}
