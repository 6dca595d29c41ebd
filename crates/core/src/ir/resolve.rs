//! `$ref` resolution against the document's components.
//!
//! Only local references of the form `#/components/<root>/<key>` are
//! supported, for the four roots in [`RefRoot`]. Anything else is rejected
//! with [`Error::UnsupportedReference`].

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::spec::{Components, Parameter, RefOr, RequestBody, Response, Schema};

use super::utils::pascal_identifier;

/// Longest `$ref` chain followed before it is treated as a cycle.
const MAX_REF_DEPTH: usize = 32;

/// Component section a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefRoot {
    Schema,
    Response,
    Parameter,
    RequestBody,
}

impl RefRoot {
    const ALL: [RefRoot; 4] = [
        RefRoot::Schema,
        RefRoot::Response,
        RefRoot::Parameter,
        RefRoot::RequestBody,
    ];

    fn prefix(self) -> &'static str {
        match self {
            RefRoot::Schema => "#/components/schemas/",
            RefRoot::Response => "#/components/responses/",
            RefRoot::Parameter => "#/components/parameters/",
            RefRoot::RequestBody => "#/components/requestBodies/",
        }
    }

    /// Appended to the PascalCase key to form the type name.
    pub fn suffix(self) -> &'static str {
        match self {
            RefRoot::Schema => "",
            RefRoot::Response => "Response",
            RefRoot::Parameter => "Parameter",
            RefRoot::RequestBody => "RequestBody",
        }
    }
}

/// Split a reference into its root and component key.
pub fn parse_ref(reference: &str) -> Result<(RefRoot, &str)> {
    RefRoot::ALL
        .iter()
        .find_map(|root| {
            reference
                .strip_prefix(root.prefix())
                .map(|key| (*root, key))
        })
        .filter(|(_, key)| !key.is_empty() && !key.contains('/'))
        .ok_or_else(|| Error::UnsupportedReference(reference.to_string()))
}

/// Type name a reference maps to, without checking that the target exists.
///
/// `#/components/schemas/foo` is `Foo`, `#/components/responses/foo` is
/// `FooResponse`, and so on.
pub fn type_name_for_ref(reference: &str) -> Result<String> {
    let (root, key) = parse_ref(reference)?;
    Ok(format!("{}{}", pascal_identifier(key), root.suffix()))
}

/// Type name for a component key under `root`.
pub fn type_name_for_key(root: RefRoot, key: &str) -> String {
    format!("{}{}", pascal_identifier(key), root.suffix())
}

/// Resolves references against one document's components.
///
/// Schemas are looked up in a separate map so that the discriminator-normalized
/// copy is what synthesis sees.
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    components: &'a Components,
    schemas: &'a IndexMap<String, Schema>,
}

impl<'a> RefResolver<'a> {
    pub fn new(components: &'a Components, schemas: &'a IndexMap<String, Schema>) -> Self {
        Self {
            components,
            schemas,
        }
    }

    /// Normalized schema components.
    pub fn schemas(&self) -> &'a IndexMap<String, Schema> {
        self.schemas
    }

    pub fn components(&self) -> &'a Components {
        self.components
    }

    fn exists(&self, root: RefRoot, key: &str) -> bool {
        match root {
            RefRoot::Schema => self.schemas.contains_key(key),
            RefRoot::Response => self.components.responses.contains_key(key),
            RefRoot::Parameter => self.components.parameters.contains_key(key),
            RefRoot::RequestBody => self.components.request_bodies.contains_key(key),
        }
    }

    /// Resolve a reference to the type name of its target.
    pub fn resolve(&self, reference: &str) -> Result<String> {
        let (root, key) = parse_ref(reference)?;
        if !self.exists(root, key) {
            return Err(Error::DanglingReference(reference.to_string()));
        }
        Ok(type_name_for_key(root, key))
    }

    /// The schema a schema reference points at.
    pub fn schema(&self, reference: &str) -> Result<&'a Schema> {
        match parse_ref(reference)? {
            (RefRoot::Schema, key) => self
                .schemas
                .get(key)
                .ok_or_else(|| Error::DanglingReference(reference.to_string())),
            _ => Err(Error::UnsupportedReference(reference.to_string())),
        }
    }

    /// Follow a parameter reference chain to the inline parameter.
    pub fn parameter<'s>(&self, item: &'s RefOr<Parameter>) -> Result<&'s Parameter>
    where
        'a: 's,
    {
        follow(item, RefRoot::Parameter, |key| self.components.parameters.get(key))
    }

    /// Follow a request body reference chain to the inline body.
    pub fn request_body<'s>(&self, item: &'s RefOr<RequestBody>) -> Result<&'s RequestBody>
    where
        'a: 's,
    {
        follow(item, RefRoot::RequestBody, |key| {
            self.components.request_bodies.get(key)
        })
    }

    /// Follow a response reference chain to the inline response.
    pub fn response<'s>(&self, item: &'s RefOr<Response>) -> Result<&'s Response>
    where
        'a: 's,
    {
        follow(item, RefRoot::Response, |key| self.components.responses.get(key))
    }
}

fn follow<'s, T>(
    item: &'s RefOr<T>,
    expected: RefRoot,
    lookup: impl Fn(&str) -> Option<&'s RefOr<T>>,
) -> Result<&'s T> {
    let mut current = item;
    for _ in 0..MAX_REF_DEPTH {
        match current {
            RefOr::Item(inner) => return Ok(inner),
            RefOr::Ref(reference) => {
                let path = &reference.ref_path;
                let (root, key) = parse_ref(path)?;
                if root != expected {
                    return Err(Error::UnsupportedReference(path.clone()));
                }
                current = lookup(key).ok_or_else(|| Error::DanglingReference(path.clone()))?;
            }
        }
    }
    let last = match current {
        RefOr::Ref(reference) => reference.ref_path.clone(),
        RefOr::Item(_) => String::new(),
    };
    Err(Error::DanglingReference(last))
}
