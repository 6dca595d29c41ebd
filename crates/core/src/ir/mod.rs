//! Intermediate representation for API document synthesis.
//!
//! The synthesis pipeline, leaves first:
//! 1. `resolve`: `$ref` strings to canonical type names
//! 2. `discriminator`: pin discriminator values onto mapped variants
//! 3. `synth`: schema nodes to [`TypeExpr`] values
//! 4. `definitions`: named definitions for schemas, responses and request bodies
//! 5. `operations`: operations to [`ComponentDescriptor`] values
//!
//! Definitions are collected in a [`TypeRegistry`], which records name
//! collisions as diagnostics instead of failing.
//!
//! ## Module Structure
//!
//! - `types`: the type expression algebra (TypeExpr, ObjectShape, NamedTypeDefinition)
//! - `api`: operation-level IR (HttpVerb, PathParam, ComponentDescriptor)
//! - `registry`: TypeRegistry, TypeSource, Diagnostic
//! - `utils`: naming and quoting helpers shared with rendering

mod api;
mod definitions;
mod discriminator;
mod operations;
mod registry;
mod resolve;
mod synth;
mod types;
pub mod utils;

pub use api::{ComponentDescriptor, HttpVerb, PathParam};
pub use definitions::{add_component_definitions, schema_definition};
pub use discriminator::normalize_discriminators;
pub use operations::{
    NamingHook, OperationContext, OperationSynthesizer, RoutePart, SynthesizedOperation,
    default_operation_name, parse_route,
};
pub use registry::{AuxRole, Diagnostic, TypeRegistry, TypeSource};
pub use resolve::{RefResolver, RefRoot, parse_ref, type_name_for_key, type_name_for_ref};
pub use synth::TypeSynthesizer;
pub use types::{DeclarationShape, Field, NamedTypeDefinition, ObjectShape, Scalar, TypeExpr};
