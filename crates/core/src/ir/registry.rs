//! Registry of named type definitions.
//!
//! Names are global across schema, response, request-body and auxiliary
//! operation types. A second definition under an existing name from a
//! different source replaces the first in place and is recorded as a
//! [`Diagnostic::NameCollision`].

use std::fmt;

use indexmap::IndexMap;
use tracing::warn;

use super::types::NamedTypeDefinition;

/// Which part of an operation an auxiliary type was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxRole {
    QueryParams,
    RequestBody,
    Response,
}

/// Where a named definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSource {
    Schema(String),
    Response(String),
    RequestBody(String),
    Operation { operation: String, role: AuxRole },
}

impl fmt::Display for TypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSource::Schema(key) => write!(f, "#/components/schemas/{key}"),
            TypeSource::Response(key) => write!(f, "#/components/responses/{key}"),
            TypeSource::RequestBody(key) => write!(f, "#/components/requestBodies/{key}"),
            TypeSource::Operation { operation, role } => {
                let role = match role {
                    AuxRole::QueryParams => "query parameters",
                    AuxRole::RequestBody => "request body",
                    AuxRole::Response => "success response",
                };
                write!(f, "{role} of operation {operation}")
            }
        }
    }
}

/// Non-fatal findings collected during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `replacement` overwrote the definition previously registered by `previous`.
    NameCollision {
        name: String,
        previous: TypeSource,
        replacement: TypeSource,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NameCollision {
                name,
                previous,
                replacement,
            } => write!(
                f,
                "type name `{name}` from {replacement} overwrites the one from {previous}"
            ),
        }
    }
}

/// Ordered `name -> definition` map plus collision diagnostics.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: IndexMap<String, (NamedTypeDefinition, TypeSource)>,
    diagnostics: Vec<Diagnostic>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Insertion order is output order; a replaced
    /// definition keeps its original position.
    pub fn insert(&mut self, definition: NamedTypeDefinition, source: TypeSource) {
        let name = definition.name.clone();
        match self.entries.get_mut(&name) {
            Some(slot) => {
                if slot.1 != source {
                    let diagnostic = Diagnostic::NameCollision {
                        name,
                        previous: slot.1.clone(),
                        replacement: source.clone(),
                    };
                    warn!("{diagnostic}");
                    self.diagnostics.push(diagnostic);
                }
                *slot = (definition, source);
            }
            None => {
                self.entries.insert(name, (definition, source));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NamedTypeDefinition> {
        self.entries.get(name).map(|(definition, _)| definition)
    }

    pub fn source(&self, name: &str) -> Option<&TypeSource> {
        self.entries.get(name).map(|(_, source)| source)
    }

    /// Definitions in output order.
    pub fn definitions(&self) -> impl Iterator<Item = &NamedTypeDefinition> {
        self.entries.values().map(|(definition, _)| definition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
