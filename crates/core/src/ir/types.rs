//! Type expression algebra produced by synthesis.
//!
//! A closed set of structural types that renderers walk without ever looking
//! at the source schema again:
//! - `TypeExpr`: scalars, literal unions, arrays, objects, unions,
//!   intersections, named references and nullable wrappers
//! - `NamedTypeDefinition`: a top-level declaration of a `TypeExpr`

/// Scalar types. `Void` and `Unknown` are sentinels for "no declared body"
/// and "no declared error contract".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Number,
    String,
    Boolean,
    Any,
    Void,
    Unknown,
}

/// One field of an [`ObjectShape`].
///
/// Equality is structural: `doc` does not take part, so fields that differ
/// only in their description compare equal.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
    pub doc: Option<String>,
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty && self.optional == other.optional
    }
}

/// Object type: named fields plus an optional index signature.
///
/// No fields and no index is the closed empty object `{}`; no fields with an
/// index of `any` is the free-form map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    pub fields: Vec<Field>,
    pub open_index: Option<Box<TypeExpr>>,
}

impl ObjectShape {
    /// Free-form map: `{ [key: string]: any }`.
    pub fn open_map() -> Self {
        Self {
            fields: Vec::new(),
            open_index: Some(Box::new(TypeExpr::Scalar(Scalar::Any))),
        }
    }
}

/// A synthesized type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Scalar(Scalar),
    /// Ordered set of string literals: `"a" | "b"`.
    LiteralUnion(Vec<String>),
    ArrayOf(Box<TypeExpr>),
    Object(ObjectShape),
    /// Never holds fewer than two distinct members.
    Union(Vec<TypeExpr>),
    /// Never holds fewer than two distinct members.
    Intersection(Vec<TypeExpr>),
    /// Reference to a named type definition.
    Named(String),
    Nullable(Box<TypeExpr>),
}

impl TypeExpr {
    /// Build a union, flattening nested unions and dropping duplicates.
    ///
    /// A single distinct member collapses to itself; no members at all
    /// degrades to `any`.
    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                TypeExpr::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Self::collapse(dedup(flat), TypeExpr::Union)
    }

    /// Build an intersection, dropping duplicates.
    pub fn intersection(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        Self::collapse(dedup(members), TypeExpr::Intersection)
    }

    fn collapse(mut members: Vec<TypeExpr>, wrap: fn(Vec<TypeExpr>) -> TypeExpr) -> Self {
        match members.len() {
            0 => TypeExpr::Scalar(Scalar::Any),
            1 => members.pop().unwrap_or(TypeExpr::Scalar(Scalar::Any)),
            _ => wrap(members),
        }
    }

    /// Literal union with duplicates removed, first occurrence wins.
    pub fn literals(values: impl IntoIterator<Item = String>) -> Self {
        TypeExpr::LiteralUnion(dedup(values))
    }

    pub fn array_of(items: TypeExpr) -> Self {
        TypeExpr::ArrayOf(Box::new(items))
    }

    /// Wrap in `Nullable`, never twice.
    pub fn nullable(self) -> Self {
        match self {
            TypeExpr::Nullable(_) => self,
            other => TypeExpr::Nullable(Box::new(other)),
        }
    }
}

/// Order-preserving de-duplication by structural equality.
fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// How a named definition is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationShape {
    /// `type Foo = ...`
    Alias,
    /// `interface Foo { ... }`
    Structural,
}

/// A top-level named type.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTypeDefinition {
    pub name: String,
    pub expression: TypeExpr,
    pub shape: DeclarationShape,
    /// Preformatted `/** ... */` block.
    pub doc: Option<String>,
}

impl NamedTypeDefinition {
    /// Declare `expression` under `name`; only a bare object shape is
    /// structural, everything else is an alias.
    pub fn new(name: impl Into<String>, expression: TypeExpr, doc: Option<String>) -> Self {
        let shape = if matches!(expression, TypeExpr::Object(_)) {
            DeclarationShape::Structural
        } else {
            DeclarationShape::Alias
        };
        Self {
            name: name.into(),
            expression,
            shape,
            doc,
        }
    }
}
