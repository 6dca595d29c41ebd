//! TypeScript emission via the Emit trait.
//!
//! Every IR node that can appear in output implements `Emit`; renderers
//! compose these rather than formatting types by hand.

use crate::ir::utils::{doc_block, escape_js_string, quote_if_needed};
use crate::ir::{DeclarationShape, Field, NamedTypeDefinition, ObjectShape, Scalar, TypeExpr};

/// Trait for emitting TypeScript code from IR nodes.
pub trait Emit {
    /// Convert the node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Types
// =============================================================================

impl Emit for Scalar {
    fn emit(&self) -> String {
        match self {
            Scalar::Number => "number",
            Scalar::String => "string",
            Scalar::Boolean => "boolean",
            Scalar::Any => "any",
            Scalar::Void => "void",
            Scalar::Unknown => "unknown",
        }
        .to_string()
    }
}

impl Emit for TypeExpr {
    fn emit(&self) -> String {
        match self {
            TypeExpr::Scalar(scalar) => scalar.emit(),
            TypeExpr::LiteralUnion(values) if values.is_empty() => "never".to_string(),
            TypeExpr::LiteralUnion(values) => values
                .iter()
                .map(|v| format!("\"{}\"", escape_js_string(v)))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeExpr::ArrayOf(inner) => format!("{}[]", wrap_compound(inner)),
            TypeExpr::Object(shape) => shape.emit(),
            TypeExpr::Union(members) => members.iter().map(Emit::emit).collect::<Vec<_>>().join(" | "),
            TypeExpr::Intersection(members) => members
                .iter()
                .map(wrap_compound)
                .collect::<Vec<_>>()
                .join(" & "),
            TypeExpr::Named(name) => name.clone(),
            TypeExpr::Nullable(inner) => format!("{} | null", inner.emit()),
        }
    }
}

/// Parenthesize types that would otherwise bind wrongly under `[]` or `&`.
fn wrap_compound(ty: &TypeExpr) -> String {
    let compound = match ty {
        TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::Nullable(_) => true,
        TypeExpr::LiteralUnion(values) => values.len() > 1,
        _ => false,
    };
    if compound {
        format!("({})", ty.emit())
    } else {
        ty.emit()
    }
}

impl Emit for Field {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", quote_if_needed(&self.name), opt, self.ty.emit())
    }
}

/// Type of the index signature, widened to admit the declared fields.
fn index_type(shape: &ObjectShape) -> Option<TypeExpr> {
    let index = shape.open_index.as_deref()?;
    if shape.fields.is_empty() || matches!(index, TypeExpr::Scalar(Scalar::Any | Scalar::Unknown)) {
        return Some(index.clone());
    }
    Some(TypeExpr::union(
        std::iter::once(index.clone()).chain(shape.fields.iter().map(|f| f.ty.clone())),
    ))
}

impl Emit for ObjectShape {
    fn emit(&self) -> String {
        let mut parts: Vec<String> = self.fields.iter().map(Emit::emit).collect();
        if let Some(index) = index_type(self) {
            parts.push(format!("[key: string]: {}", index.emit()));
        }
        if parts.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", parts.join("; "))
        }
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for NamedTypeDefinition {
    fn emit(&self) -> String {
        let mut output = String::new();
        if let Some(doc) = &self.doc {
            output.push_str(doc);
            output.push('\n');
        }
        match (&self.shape, &self.expression) {
            (DeclarationShape::Structural, TypeExpr::Object(shape)) => {
                output.push_str(&format!("export interface {} {{\n", self.name));
                for field in &shape.fields {
                    if let Some(doc) = field.doc.as_deref().and_then(|d| doc_block([d])) {
                        for line in doc.lines() {
                            output.push_str(&format!("  {line}\n"));
                        }
                    }
                    output.push_str(&format!("  {};\n", field.emit()));
                }
                if let Some(index) = index_type(shape) {
                    output.push_str(&format!("  [key: string]: {};\n", index.emit()));
                }
                output.push_str("}\n");
            }
            (_, expression) => {
                output.push_str(&format!("export type {} = {};\n", self.name, expression.emit()));
            }
        }
        output
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", self.name, opt, self.ty.emit())
    }
}

/// Exported function declaration with a raw body.
#[derive(Debug, Clone)]
pub struct TsFunction {
    pub doc: String,
    pub name: String,
    pub params: Vec<TsParam>,
    pub return_type: Option<String>,
    /// Body lines, emitted one indent level deep.
    pub body: Vec<String>,
    pub is_async: bool,
}

impl Emit for TsFunction {
    fn emit(&self) -> String {
        let mut output = String::new();
        if !self.doc.is_empty() {
            output.push_str(&self.doc);
            output.push('\n');
        }
        let async_str = if self.is_async { "async " } else { "" };
        let params_str = self.params.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
        let return_type_str = self
            .return_type
            .as_ref()
            .map(|t| format!(": {t}"))
            .unwrap_or_default();
        output.push_str(&format!(
            "export {}function {}({}){} {{\n",
            async_str, self.name, params_str, return_type_str
        ));
        for line in &self.body {
            if line.is_empty() {
                output.push('\n');
            } else {
                output.push_str(&format!("  {line}\n"));
            }
        }
        output.push_str("}\n");
        output
    }
}
