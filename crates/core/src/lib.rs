//! API document to typed client synthesis.
//!
//! Parses an OpenAPI document and produces:
//! - Named type definitions for component schemas, responses and request bodies
//! - One component descriptor per operation (naming, routing, parameter and
//!   response typing)
//! - Rendered client code through a pluggable [`Renderer`]

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

mod error;
mod generator;
pub mod ir;
pub mod render;
pub mod spec;

pub use error::{Error, Result};
pub use generator::{Generation, generate, synthesize_document};
pub use ir::{ComponentDescriptor, Diagnostic, NamedTypeDefinition, TypeExpr};
pub use render::{CustomPreamble, Flavor, RenderMode, Renderer, render};
pub use spec::OpenApiDocument;
