//! Rendering of synthesized IR into client code.
//!
//! A [`Renderer`] turns component descriptors into text; the core only
//! invokes it and concatenates results. Two TypeScript flavors ship built in:
//! - `fetch`: typed `async` functions over `fetch`
//! - `react-query`: the fetch functions plus `useQuery` / `useMutation` hooks

mod emit;
mod fetch;
mod hooks;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::generator::Generation;
use crate::ir::{ComponentDescriptor, HttpVerb, NamedTypeDefinition};

pub use emit::{Emit, TsFunction, TsParam};
pub use fetch::FetchRenderer;
pub use hooks::QueryHooksRenderer;

/// Pluggable output stage.
pub trait Renderer: Send + Sync {
    /// Render one operation.
    fn render(&self, descriptor: &ComponentDescriptor) -> String;

    /// Render every operation at once (aggregate mode).
    fn render_all(&self, descriptors: &[ComponentDescriptor]) -> String {
        descriptors
            .iter()
            .map(|d| self.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the named type declarations.
    fn render_types(&self, definitions: &[&NamedTypeDefinition]) -> String {
        definitions
            .iter()
            .map(|d| d.emit())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Override the component name of an operation.
    fn name_operation(&self, _verb: HttpVerb, _route: &str) -> Option<String> {
        None
    }

    /// Text emitted once before everything else.
    fn preamble(&self) -> Option<String> {
        None
    }
}

/// How operations are handed to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// `render` once per operation.
    #[default]
    PerOperation,
    /// `render_all` once with every operation.
    Aggregate,
}

/// Built-in renderer flavors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
    #[default]
    Fetch,
    ReactQuery,
}

impl Flavor {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Flavor::Fetch => Box::new(FetchRenderer::new()),
            Flavor::ReactQuery => Box::new(QueryHooksRenderer::new()),
        }
    }
}

impl FromStr for Flavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fetch" => Ok(Flavor::Fetch),
            "react-query" => Ok(Flavor::ReactQuery),
            other => Err(format!("unknown flavor `{other}` (expected `fetch` or `react-query`)")),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flavor::Fetch => "fetch",
            Flavor::ReactQuery => "react-query",
        })
    }
}

/// Wraps a renderer and replaces its preamble.
pub struct CustomPreamble<R: ?Sized> {
    preamble: String,
    inner: Box<R>,
}

impl<R: Renderer + ?Sized> CustomPreamble<R> {
    pub fn new(inner: Box<R>, preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
            inner,
        }
    }
}

impl<R: Renderer + ?Sized> Renderer for CustomPreamble<R> {
    fn render(&self, descriptor: &ComponentDescriptor) -> String {
        self.inner.render(descriptor)
    }

    fn render_all(&self, descriptors: &[ComponentDescriptor]) -> String {
        self.inner.render_all(descriptors)
    }

    fn render_types(&self, definitions: &[&NamedTypeDefinition]) -> String {
        self.inner.render_types(definitions)
    }

    fn name_operation(&self, verb: HttpVerb, route: &str) -> Option<String> {
        self.inner.name_operation(verb, route)
    }

    fn preamble(&self) -> Option<String> {
        Some(self.preamble.clone())
    }
}

/// Render a generation: preamble, type declarations, then operations.
pub fn render(generation: &Generation, renderer: &dyn Renderer, mode: RenderMode) -> String {
    let mut sections = Vec::new();

    if let Some(preamble) = renderer.preamble() {
        sections.push(preamble.trim_end().to_string());
    }

    let definitions: Vec<&NamedTypeDefinition> = generation.types.definitions().collect();
    if !definitions.is_empty() {
        sections.push(renderer.render_types(&definitions).trim_end().to_string());
    }

    if !generation.components.is_empty() {
        let operations = match mode {
            RenderMode::PerOperation => generation
                .components
                .iter()
                .map(|d| renderer.render(d).trim_end().to_string())
                .collect::<Vec<_>>()
                .join("\n\n"),
            RenderMode::Aggregate => renderer.render_all(&generation.components),
        };
        sections.push(operations.trim_end().to_string());
    }

    let mut output = sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    output.push('\n');
    output
}
