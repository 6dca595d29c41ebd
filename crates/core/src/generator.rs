//! Generation pipeline entry points.
//!
//! The pipeline is:
//! 1. Normalize: discriminator values pinned onto a copy of the schema map
//! 2. Definitions: schemas, responses and request bodies -> TypeRegistry
//! 3. Operations: (route, verb) pairs -> ComponentDescriptor, in parallel
//! 4. Render: Generation -> String (via the Renderer)

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::ir::{
    ComponentDescriptor, Diagnostic, HttpVerb, NamingHook, OperationContext, OperationSynthesizer,
    RefResolver, SynthesizedOperation, TypeRegistry, TypeSynthesizer, add_component_definitions,
    normalize_discriminators,
};
use crate::render::{RenderMode, Renderer, render};
use crate::spec::OpenApiDocument;

/// Everything synthesized from one document.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Named definitions, in output order.
    pub types: TypeRegistry,
    /// One descriptor per operation, in path then verb declaration order.
    pub components: Vec<ComponentDescriptor>,
}

impl Generation {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.types.diagnostics()
    }
}

/// Synthesize the named types and component descriptors of a document.
///
/// `renderer` is consulted only for operation naming. Fails on the first
/// unsupported or dangling reference.
pub fn synthesize_document(doc: &OpenApiDocument, renderer: &dyn Renderer) -> Result<Generation> {
    let mut schemas = doc.components.schemas.clone();
    normalize_discriminators(&mut schemas)?;

    let resolver = RefResolver::new(&doc.components, &schemas);
    let synth = TypeSynthesizer::new(resolver);

    let mut types = TypeRegistry::new();
    add_component_definitions(&synth, &mut types)?;

    let mut jobs = Vec::new();
    for (route, item) in &doc.paths {
        for (key, operation) in &item.operations {
            let Some(verb) = HttpVerb::from_key(key) else {
                debug!(%route, method = %key, "skipping unsupported method");
                continue;
            };
            jobs.push(OperationContext {
                route,
                verb,
                operation,
                inherited: &item.parameters,
            });
        }
    }

    let naming = |verb: HttpVerb, route: &str| renderer.name_operation(verb, route);
    let naming: NamingHook<'_> = &naming;
    let operations = OperationSynthesizer::new(synth, Some(naming));

    let synthesized: Vec<SynthesizedOperation> = jobs
        .par_iter()
        .map(|ctx| operations.synthesize(ctx))
        .collect::<Result<_>>()?;

    let mut components = Vec::with_capacity(synthesized.len());
    for SynthesizedOperation {
        descriptor,
        auxiliary,
    } in synthesized
    {
        for (definition, source) in auxiliary {
            types.insert(definition, source);
        }
        components.push(descriptor);
    }

    debug!(
        types = types.len(),
        operations = components.len(),
        collisions = types.diagnostics().len(),
        "synthesis complete"
    );
    Ok(Generation { types, components })
}

/// Synthesize and render a document in one step.
pub fn generate(doc: &OpenApiDocument, renderer: &dyn Renderer, mode: RenderMode) -> Result<String> {
    let generation = synthesize_document(doc, renderer)?;
    Ok(render(&generation, renderer, mode))
}
