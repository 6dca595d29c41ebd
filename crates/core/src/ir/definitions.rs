//! Named type definitions for the document's components.
//!
//! One definition per entry of `components.schemas`, `components.responses`
//! (as `<Key>Response`) and `components.requestBodies` (as `<Key>RequestBody`).

use tracing::debug;

use crate::error::Result;
use crate::spec::{RefOr, Schema, SchemaShape, preferred_media};

use super::registry::{TypeRegistry, TypeSource};
use super::resolve::{RefRoot, type_name_for_key};
use super::synth::TypeSynthesizer;
use super::types::{NamedTypeDefinition, Scalar, TypeExpr};
use super::utils::doc_block;

/// Register every component definition, schemas first.
pub fn add_component_definitions(
    synth: &TypeSynthesizer<'_>,
    registry: &mut TypeRegistry,
) -> Result<()> {
    let resolver = synth.resolver();

    for (key, schema) in resolver.schemas() {
        let definition = schema_definition(synth, key, schema)?;
        registry.insert(definition, TypeSource::Schema(key.clone()));
    }

    for (key, item) in &resolver.components().responses {
        let name = type_name_for_key(RefRoot::Response, key);
        let definition = match item {
            RefOr::Ref(reference) => {
                NamedTypeDefinition::new(name, TypeExpr::Named(resolver.resolve(&reference.ref_path)?), None)
            }
            RefOr::Item(response) => {
                let schema = preferred_media(&response.content).and_then(|m| m.schema.as_ref());
                let expression = match schema {
                    Some(schema) => synth.synthesize(schema, &name)?,
                    None => TypeExpr::Scalar(Scalar::Void),
                };
                let doc = doc_block(
                    [
                        response.description.as_deref(),
                        schema.and_then(|s| s.description.as_deref()),
                    ]
                    .into_iter()
                    .flatten(),
                );
                NamedTypeDefinition::new(name, expression, doc)
            }
        };
        registry.insert(definition, TypeSource::Response(key.clone()));
    }

    for (key, item) in &resolver.components().request_bodies {
        let name = type_name_for_key(RefRoot::RequestBody, key);
        let definition = match item {
            RefOr::Ref(reference) => {
                NamedTypeDefinition::new(name, TypeExpr::Named(resolver.resolve(&reference.ref_path)?), None)
            }
            RefOr::Item(body) => {
                let expression = match preferred_media(&body.content).and_then(|m| m.schema.as_ref()) {
                    Some(schema) => synth.synthesize(schema, &name)?,
                    None => TypeExpr::Scalar(Scalar::Any),
                };
                let doc = doc_block(body.description.as_deref());
                NamedTypeDefinition::new(name, expression, doc)
            }
        };
        registry.insert(definition, TypeSource::RequestBody(key.clone()));
    }

    debug!(count = registry.len(), "component definitions registered");
    Ok(())
}

/// Definition for one `components.schemas` entry.
///
/// A schema that is only a `$ref` becomes an alias of its target.
pub fn schema_definition(
    synth: &TypeSynthesizer<'_>,
    key: &str,
    schema: &Schema,
) -> Result<NamedTypeDefinition> {
    let name = type_name_for_key(RefRoot::Schema, key);
    let expression = match schema.shape() {
        SchemaShape::Reference(target) => TypeExpr::Named(synth.resolver().resolve(target)?),
        _ => synth.synthesize(schema, &name)?,
    };
    let doc = doc_block(schema.description.as_deref());
    Ok(NamedTypeDefinition::new(name, expression, doc))
}
