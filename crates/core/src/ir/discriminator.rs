//! Discriminator normalization.
//!
//! Before synthesis, every variant named in a discriminator mapping gets its
//! discriminating property pinned to a single-value string enum, so a
//! discriminated `oneOf` synthesizes like any other union of tagged objects.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::spec::{EnumValue, Schema, SchemaType};

use super::resolve::{RefRoot, parse_ref};

/// Inject discriminator literals into the mapped variant schemas.
///
/// Running this twice leaves the map as after the first run. Variants that
/// the mapping does not name are left alone.
pub fn normalize_discriminators(schemas: &mut IndexMap<String, Schema>) -> Result<()> {
    let mut pins: Vec<(String, String, String)> = Vec::new();
    for schema in schemas.values() {
        let Some(discriminator) = &schema.discriminator else {
            continue;
        };
        if schema.one_of.is_none() && schema.any_of.is_none() && schema.all_of.is_none() {
            continue;
        }
        for (variant, target) in &discriminator.mapping {
            let key = mapping_key(target)?;
            if !schemas.contains_key(key) {
                return Err(Error::DanglingReference(target.clone()));
            }
            pins.push((
                key.to_string(),
                discriminator.property_name.clone(),
                variant.clone(),
            ));
        }
    }

    for (key, property, variant) in pins {
        debug!(schema = %key, %property, %variant, "pinning discriminator value");
        if let Some(target) = schemas.get_mut(&key) {
            pin_property(target, &property, &variant);
        }
    }
    Ok(())
}

/// Schema key a mapping value points to. Bare keys are allowed.
fn mapping_key(target: &str) -> Result<&str> {
    if !target.starts_with('#') {
        return Ok(target);
    }
    match parse_ref(target)? {
        (RefRoot::Schema, key) => Ok(key),
        _ => Err(Error::UnsupportedReference(target.to_string())),
    }
}

fn pin_property(target: &mut Schema, property: &str, variant: &str) {
    let properties = target.properties.get_or_insert_with(IndexMap::new);
    let slot = properties.entry(property.to_string()).or_default();
    // Only the literal survives; composites or refs would shadow the enum.
    *slot = Schema {
        schema_type: Some(SchemaType::Single("string".to_string())),
        enum_values: Some(vec![EnumValue::String(variant.to_string())]),
        description: slot.description.take(),
        nullable: slot.nullable,
        ..Schema::default()
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::spec::OpenApiDocument;

    fn schemas() -> IndexMap<String, Schema> {
        OpenApiDocument::from_json(
            r##"{
              "components": {
                "schemas": {
                  "Pet": {
                    "oneOf": [
                      { "$ref": "#/components/schemas/Dog" },
                      { "$ref": "#/components/schemas/Cat" },
                      { "$ref": "#/components/schemas/Bird" }
                    ],
                    "discriminator": {
                      "propertyName": "kind",
                      "mapping": { "dog": "#/components/schemas/Dog", "cat": "Cat" }
                    }
                  },
                  "Dog": {
                    "type": "object",
                    "required": ["kind"],
                    "properties": {
                      "kind": { "type": "string", "description": "Pet kind" },
                      "barks": { "type": "boolean" }
                    }
                  },
                  "Cat": { "type": "object" },
                  "Bird": { "type": "object", "properties": { "kind": { "type": "string" } } }
                }
              }
            }"##,
        )
        .unwrap()
        .components
        .schemas
    }

    fn kind_enum(schemas: &IndexMap<String, Schema>, key: &str) -> Option<Vec<EnumValue>> {
        schemas[key].properties.as_ref()?.get("kind")?.enum_values.clone()
    }

    #[test]
    fn test_pins_mapped_variants() {
        let mut schemas = schemas();
        normalize_discriminators(&mut schemas).unwrap();

        assert_eq!(
            kind_enum(&schemas, "Dog"),
            Some(vec![EnumValue::String("dog".into())])
        );
        assert_eq!(
            kind_enum(&schemas, "Cat"),
            Some(vec![EnumValue::String("cat".into())])
        );
        assert_eq!(kind_enum(&schemas, "Bird"), None);

        let dog_kind = &schemas["Dog"].properties.as_ref().unwrap()["kind"];
        assert_eq!(dog_kind.description.as_deref(), Some("Pet kind"));
        assert_eq!(schemas["Dog"].required, vec!["kind".to_string()]);
        let dog_fields: Vec<_> = schemas["Dog"].properties.as_ref().unwrap().keys().cloned().collect();
        assert_eq!(dog_fields, vec!["kind", "barks"]);
    }

    #[test]
    fn test_is_idempotent() {
        let mut once = schemas();
        normalize_discriminators(&mut once).unwrap();
        let mut twice = once.clone();
        normalize_discriminators(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pin_replaces_wrapped_reference() {
        let mut schemas = schemas();
        let dog = schemas.get_mut("Dog").unwrap();
        let kind: Schema = serde_json::from_str(
            r##"{ "allOf": [{ "$ref": "#/components/schemas/Kind" }], "description": "Pet kind" }"##,
        )
        .unwrap();
        dog.properties.as_mut().unwrap().insert("kind".into(), kind);
        normalize_discriminators(&mut schemas).unwrap();

        let dog_kind = &schemas["Dog"].properties.as_ref().unwrap()["kind"];
        assert!(dog_kind.all_of.is_none());
        assert_eq!(dog_kind.description.as_deref(), Some("Pet kind"));
        assert_eq!(
            kind_enum(&schemas, "Dog"),
            Some(vec![EnumValue::String("dog".into())])
        );
        assert!(matches!(dog_kind.shape(), crate::spec::SchemaShape::Primitive("string")));
    }

    #[test]
    fn test_dangling_mapping_target() {
        let mut schemas = schemas();
        let pet = schemas.get_mut("Pet").unwrap();
        pet.discriminator
            .as_mut()
            .unwrap()
            .mapping
            .insert("fish".into(), "#/components/schemas/Fish".into());
        assert!(matches!(
            normalize_discriminators(&mut schemas),
            Err(Error::DanglingReference(_))
        ));
    }
}
