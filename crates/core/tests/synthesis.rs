//! End-to-end synthesis behavior through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use apigen_core::ir::{
    HttpVerb, NamedTypeDefinition, ObjectShape, RefResolver, Scalar, TypeExpr, TypeSynthesizer,
    normalize_discriminators, type_name_for_ref,
};
use apigen_core::render::FetchRenderer;
use apigen_core::spec::{Components, EnumValue, Schema};
use apigen_core::{Error, OpenApiDocument, RenderMode, generate, synthesize_document};
use indexmap::IndexMap;

fn schema(json: &str) -> Schema {
    serde_json::from_str(json).unwrap()
}

fn synthesize(json: &str) -> TypeExpr {
    let components = Components::default();
    let schemas = IndexMap::new();
    let synth = TypeSynthesizer::new(RefResolver::new(&components, &schemas));
    synth.synthesize(&schema(json), "Test").unwrap()
}

fn document(json: &str) -> OpenApiDocument {
    OpenApiDocument::from_json(json).unwrap()
}

#[test]
fn reference_names_follow_their_root() {
    assert_eq!(type_name_for_ref("#/components/schemas/foo").unwrap(), "Foo");
    assert_eq!(
        type_name_for_ref("#/components/responses/foo").unwrap(),
        "FooResponse"
    );
    assert_eq!(
        type_name_for_ref("#/components/parameters/foo").unwrap(),
        "FooParameter"
    );
    assert_eq!(
        type_name_for_ref("#/components/requestBodies/foo").unwrap(),
        "FooRequestBody"
    );
    for other in [
        "#/components/headers/foo",
        "#/definitions/foo",
        "other.yaml#/components/schemas/foo",
    ] {
        assert!(
            matches!(type_name_for_ref(other), Err(Error::UnsupportedReference(r)) if r == other)
        );
    }
}

#[test]
fn array_of_one_of_keeps_declared_order() {
    let ty = synthesize(
        r#"{"type": "array", "items": {"oneOf": [{"type": "boolean"}, {"type": "number"}, {"type": "string"}]}}"#,
    );
    assert_eq!(
        ty,
        TypeExpr::array_of(TypeExpr::Union(vec![
            TypeExpr::Scalar(Scalar::Boolean),
            TypeExpr::Scalar(Scalar::Number),
            TypeExpr::Scalar(Scalar::String),
        ]))
    );
}

#[test]
fn open_and_closed_objects_stay_distinct() {
    let open = TypeExpr::Object(ObjectShape::open_map());
    let closed = TypeExpr::Object(ObjectShape::default());

    assert_eq!(synthesize(r#"{"type": "object", "additionalProperties": true}"#), open);
    assert_eq!(synthesize(r#"{"type": "object"}"#), open);
    assert_eq!(synthesize(r#"{"properties": {}}"#), closed);
    assert_eq!(synthesize("{}"), closed);
    assert_ne!(open, closed);
}

#[test]
fn synthesis_is_repeatable() {
    let json = r#"{
      "type": "object",
      "required": ["id"],
      "properties": {
        "id": {"type": "integer"},
        "tags": {"type": "array", "items": {"type": "string", "enum": ["a", "b"]}},
        "meta": {"anyOf": [{"type": "object"}, {"type": "null"}]}
      }
    }"#;
    assert_eq!(synthesize(json), synthesize(json));

    let doc = document(PETS);
    let first = synthesize_document(&doc, &FetchRenderer).unwrap();
    let second = synthesize_document(&doc, &FetchRenderer).unwrap();
    assert_eq!(first.components, second.components);
    let defs = |g: &apigen_core::Generation| -> Vec<NamedTypeDefinition> {
        g.types.definitions().cloned().collect()
    };
    assert_eq!(defs(&first), defs(&second));
    assert_eq!(
        generate(&doc, &FetchRenderer, RenderMode::PerOperation).unwrap(),
        generate(&doc, &FetchRenderer, RenderMode::PerOperation).unwrap()
    );
}

#[test]
fn discriminator_normalization_is_idempotent() {
    let mut schemas: IndexMap<String, Schema> = serde_json::from_str(
        r##"{
          "Shape": {
            "oneOf": [{"$ref": "#/components/schemas/Circle"}, {"$ref": "#/components/schemas/Square"}],
            "discriminator": {"propertyName": "kind", "mapping": {"circle": "#/components/schemas/Circle", "square": "Square"}}
          },
          "Circle": {"type": "object", "properties": {"radius": {"type": "number"}}},
          "Square": {"type": "object", "properties": {"kind": {"type": "string", "description": "tag"}}}
        }"##,
    )
    .unwrap();

    normalize_discriminators(&mut schemas).unwrap();
    let once = schemas.clone();
    normalize_discriminators(&mut schemas).unwrap();
    assert_eq!(once, schemas);

    for (variant, key) in [("Circle", "circle"), ("Square", "square")] {
        let kind = &schemas[variant].properties.as_ref().unwrap()["kind"];
        assert_eq!(
            kind.enum_values.as_deref(),
            Some(&[EnumValue::String(key.into())][..])
        );
    }
}

#[test]
fn duplicate_success_responses_collapse_to_one_name() {
    let doc = document(
        r##"{
          "paths": {
            "/pets": {
              "put": {
                "operationId": "upsertPet",
                "responses": {
                  "200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}},
                  "201": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}}
                }
              },
              "post": {
                "operationId": "importPets",
                "responses": {
                  "200": {"content": {"application/json": {"schema": {"type": "object", "properties": {"count": {"type": "integer"}}}}}},
                  "202": {"content": {"application/json": {"schema": {"type": "object", "properties": {"job": {"type": "string"}}}}}}
                }
              }
            }
          },
          "components": {"schemas": {"Pet": {"type": "object"}}}
        }"##,
    );
    let generation = synthesize_document(&doc, &FetchRenderer).unwrap();

    let upsert = &generation.components[0];
    assert_eq!(upsert.response_type, TypeExpr::Named("Pet".into()));
    assert!(generation.types.get("UpsertPetResponse").is_none());

    let import = &generation.components[1];
    assert_eq!(
        import.response_type,
        TypeExpr::Named("ImportPetsResponse".into())
    );
    let TypeExpr::Union(members) = &generation.types.get("ImportPetsResponse").unwrap().expression
    else {
        panic!("expected a union response");
    };
    assert_eq!(members.len(), 2);
}

#[test]
fn delete_drops_only_a_trailing_identifier() {
    let doc = document(
        r#"{
          "paths": {
            "/use-cases/{useCaseId}": {
              "delete": {"parameters": [{"name": "useCaseId", "in": "path", "required": true, "schema": {"type": "string"}}]}
            },
            "/use-cases/{useCaseId}/secret": {
              "delete": {"parameters": [{"name": "useCaseId", "in": "path", "required": true, "schema": {"type": "string"}}]}
            }
          }
        }"#,
    );
    let generation = synthesize_document(&doc, &FetchRenderer).unwrap();

    let trailing = &generation.components[0];
    assert_eq!(trailing.verb, HttpVerb::Delete);
    assert!(trailing.path_params.iter().all(|p| p.name != "useCaseId"));
    assert_eq!(trailing.trailing_id.as_ref().unwrap().name, "useCaseId");

    let nested = &generation.components[1];
    assert_eq!(nested.name, "DeleteUseCasesByUseCaseIdSecret");
    assert_eq!(nested.path_params.len(), 1);
    assert_eq!(nested.path_params[0].name, "useCaseId");
    assert!(nested.trailing_id.is_none());
    assert_eq!(nested.route, "/use-cases/${useCaseId}/secret");
}

#[test]
fn redirects_contribute_nothing() {
    let doc = document(
        r#"{
          "paths": {
            "/login": {
              "get": {
                "operationId": "login",
                "responses": {
                  "200": {"content": {"application/json": {"schema": {"type": "string"}}}},
                  "302": {"content": {"application/json": {"schema": {"type": "number"}}}},
                  "default": {"content": {"application/json": {"schema": {"type": "boolean"}}}}
                }
              }
            }
          }
        }"#,
    );
    let generation = synthesize_document(&doc, &FetchRenderer).unwrap();
    let login = &generation.components[0];

    assert_eq!(
        generation.types.get("LoginResponse").unwrap().expression,
        TypeExpr::Scalar(Scalar::String)
    );
    assert_eq!(login.error_type, TypeExpr::Scalar(Scalar::Boolean));
}

const PETS: &str = r##"{
  "paths": {
    "/pets": {
      "get": {
        "operationId": "listPets",
        "parameters": [{"name": "limit", "in": "query", "schema": {"type": "integer"}}],
        "responses": {"200": {"content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}}}}}
      }
    },
    "/pets/{petId}": {
      "get": {
        "parameters": [{"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}],
        "responses": {"200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}}}
      }
    }
  },
  "components": {
    "schemas": {
      "Pet": {"type": "object", "required": ["name"], "properties": {"name": {"type": "string"}, "owner": {"$ref": "#/components/schemas/Owner"}}},
      "Owner": {"type": "object", "properties": {"pets": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}}}
    }
  }
}"##;
