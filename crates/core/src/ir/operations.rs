//! Operation to [`ComponentDescriptor`] synthesis.
//!
//! Each `(route, verb)` pair is synthesized independently from the shared,
//! read-only components. Auxiliary definitions (query params, inline request
//! bodies, composite success responses) are returned alongside the descriptor
//! rather than registered here, so operations can be synthesized in parallel.

use tracing::{debug, warn};

use crate::error::Result;
use crate::spec::{
    Operation, Parameter, ParameterLocation, RefOr, Response, Schema, preferred_media,
};

use super::api::{ComponentDescriptor, HttpVerb, PathParam};
use super::registry::{AuxRole, TypeSource};
use super::synth::TypeSynthesizer;
use super::types::{Field, NamedTypeDefinition, ObjectShape, Scalar, TypeExpr};
use super::utils::{capitalize_first, doc_block, pascal_identifier, sanitize_ts_identifier, to_snake_case};

/// Optional override for operation names: `(verb, route) -> name`.
pub type NamingHook<'h> = &'h (dyn Fn(HttpVerb, &str) -> Option<String> + Sync);

/// One operation to synthesize.
#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    pub route: &'a str,
    pub verb: HttpVerb,
    pub operation: &'a Operation,
    /// Path-level parameters.
    pub inherited: &'a [RefOr<Parameter>],
}

/// A descriptor and the auxiliary definitions it refers to.
#[derive(Debug, Clone)]
pub struct SynthesizedOperation {
    pub descriptor: ComponentDescriptor,
    pub auxiliary: Vec<(NamedTypeDefinition, TypeSource)>,
}

/// A segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePart {
    Static(String),
    Param(String),
}

/// Split a route template into static text and `{param}` placeholders.
pub fn parse_route(route: &str) -> Vec<RoutePart> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_param = false;

    for c in route.chars() {
        match c {
            '{' if !in_param => {
                if !current.is_empty() {
                    parts.push(RoutePart::Static(std::mem::take(&mut current)));
                }
                in_param = true;
            }
            '}' if in_param => {
                parts.push(RoutePart::Param(std::mem::take(&mut current)));
                in_param = false;
            }
            _ => current.push(c),
        }
    }
    if in_param {
        // An unterminated placeholder is kept as literal text.
        current.insert(0, '{');
        if let Some(RoutePart::Static(previous)) = parts.last_mut() {
            previous.push_str(&current);
            return parts;
        }
    }
    if !current.is_empty() {
        parts.push(RoutePart::Static(current));
    }
    parts
}

/// Default name: verb followed by the PascalCase path segments, with
/// placeholders spelled `By<Param>` (`GET /pets/{petId}` is `GetPetsByPetId`).
pub fn default_operation_name(verb: HttpVerb, route: &str) -> String {
    let mut name = capitalize_first(&verb.as_str().to_ascii_lowercase());
    let mut has_segment = false;
    for segment in route.split('/').filter(|s| !s.is_empty()) {
        for part in parse_route(segment) {
            match part {
                RoutePart::Static(text) => {
                    let word: String = text
                        .split(|c: char| !c.is_ascii_alphanumeric())
                        .map(capitalize_first)
                        .collect();
                    if !word.is_empty() {
                        name.push_str(&word);
                        has_segment = true;
                    }
                }
                RoutePart::Param(param) => {
                    name.push_str("By");
                    name.push_str(&pascal_identifier(&param));
                    has_segment = true;
                }
            }
        }
    }
    if !has_segment {
        name.push_str("Root");
    }
    name
}

/// Synthesizes component descriptors.
#[derive(Clone, Copy)]
pub struct OperationSynthesizer<'a> {
    synth: TypeSynthesizer<'a>,
    naming: Option<NamingHook<'a>>,
}

impl<'a> OperationSynthesizer<'a> {
    pub fn new(synth: TypeSynthesizer<'a>, naming: Option<NamingHook<'a>>) -> Self {
        Self { synth, naming }
    }

    /// Component name: the naming hook, then `operationId`, then the
    /// verb-and-path default.
    pub fn component_name(&self, ctx: &OperationContext<'_>) -> String {
        if let Some(name) = self.naming.and_then(|hook| hook(ctx.verb, ctx.route)) {
            return name;
        }
        match ctx.operation.operation_id.as_deref() {
            Some(id) if !id.is_empty() => capitalize_first(id),
            _ => default_operation_name(ctx.verb, ctx.route),
        }
    }

    pub fn synthesize(&self, ctx: &OperationContext<'a>) -> Result<SynthesizedOperation> {
        let name = self.component_name(ctx);
        let op = ctx.operation;
        let mut auxiliary = Vec::new();
        let aux_source = |role| TypeSource::Operation {
            operation: name.clone(),
            role,
        };

        let params = self.merge_parameters(ctx)?;
        let path_defs: Vec<&Parameter> = params
            .iter()
            .copied()
            .filter(|p| p.location == ParameterLocation::Path)
            .collect();

        // Path parameters, in route order.
        let mut parts = parse_route(ctx.route);
        let mut path_params = Vec::new();
        for part in &parts {
            if let RoutePart::Param(placeholder) = part {
                path_params.push(self.path_param(&name, placeholder, &path_defs)?);
            }
        }

        let mut trailing_id = None;
        if ctx.verb == HttpVerb::Delete && ends_with_param_segment(&parts) {
            parts.pop();
            trailing_id = path_params.pop();
        }
        let route = interpolate(&parts, &path_params);

        // Query parameters.
        let mut query_fields = Vec::new();
        for param in params.iter().filter(|p| p.location == ParameterLocation::Query) {
            query_fields.push(Field {
                name: param.name.clone(),
                ty: self.param_type(param, &name, TypeExpr::Scalar(Scalar::Any))?,
                optional: !param.required,
                doc: param.description.clone(),
            });
        }
        let query_required = query_fields.iter().any(|f| !f.optional);
        let query_params_type = if query_fields.is_empty() {
            None
        } else {
            let type_name = format!("{name}QueryParams");
            let shape = ObjectShape {
                fields: query_fields,
                open_index: None,
            };
            auxiliary.push((
                NamedTypeDefinition::new(type_name.clone(), TypeExpr::Object(shape), None),
                aux_source(AuxRole::QueryParams),
            ));
            Some(type_name)
        };

        let header_params: Vec<Parameter> = params
            .iter()
            .filter(|p| p.location == ParameterLocation::Header)
            .map(|p| (*p).clone())
            .collect();

        // Request body.
        let (body_type, body_required) = match op.request_body.as_ref() {
            None => (TypeExpr::Scalar(Scalar::Void), false),
            Some(item @ RefOr::Ref(reference)) => {
                let body = self.synth.resolver().request_body(item)?;
                let body_type = TypeExpr::Named(self.synth.resolver().resolve(&reference.ref_path)?);
                (body_type, body.required)
            }
            Some(RefOr::Item(body)) => {
                let schema = preferred_media(&body.content).and_then(|m| m.schema.as_ref());
                let body_type = match schema {
                    None => TypeExpr::Scalar(Scalar::Any),
                    Some(schema) if schema.ref_path.is_some() => {
                        self.synth.synthesize(schema, &name)?
                    }
                    Some(schema) => {
                        let type_name = format!("{name}RequestBody");
                        let expression = self.synth.synthesize(schema, &type_name)?;
                        auxiliary.push((
                            NamedTypeDefinition::new(
                                type_name.clone(),
                                expression,
                                doc_block(body.description.as_deref()),
                            ),
                            aux_source(AuxRole::RequestBody),
                        ));
                        TypeExpr::Named(type_name)
                    }
                };
                (body_type, body.required)
            }
        };

        // Responses.
        let mut success = Vec::new();
        let mut errors = Vec::new();
        for (status, item) in &op.responses {
            let bucket = match classify_status(status) {
                StatusClass::Success => &mut success,
                StatusClass::Error => &mut errors,
                StatusClass::Ignored => {
                    debug!(operation = %name, %status, "ignoring 3xx response");
                    continue;
                }
            };
            if let Some(ty) = self.response_member(item, &format!("{name}.{status}"))? {
                bucket.push(ty);
            }
        }

        let response_type = if success.is_empty() {
            TypeExpr::Scalar(Scalar::Void)
        } else {
            match TypeExpr::union(success) {
                named @ TypeExpr::Named(_) => named,
                other => {
                    let type_name = format!("{name}Response");
                    auxiliary.push((
                        NamedTypeDefinition::new(type_name.clone(), other, None),
                        aux_source(AuxRole::Response),
                    ));
                    TypeExpr::Named(type_name)
                }
            }
        };
        let error_type = if errors.is_empty() {
            TypeExpr::Scalar(Scalar::Unknown)
        } else {
            TypeExpr::union(errors)
        };

        let deprecated_note = op.deprecated.then_some("@deprecated");
        let doc = doc_block(
            [op.summary.as_deref(), op.description.as_deref(), deprecated_note]
                .into_iter()
                .flatten(),
        )
        .unwrap_or_default();

        let descriptor = ComponentDescriptor {
            name,
            verb: ctx.verb,
            path: ctx.route.to_string(),
            route,
            path_params,
            trailing_id,
            query_params_type,
            query_required,
            header_params,
            body_type,
            body_required,
            response_type,
            error_type,
            doc,
            tags: op.tags.clone(),
            deprecated: op.deprecated,
        };
        Ok(SynthesizedOperation {
            descriptor,
            auxiliary,
        })
    }

    /// Path-level parameters overridden by operation-level ones with the same
    /// name. Cookie parameters are dropped.
    fn merge_parameters(&self, ctx: &OperationContext<'a>) -> Result<Vec<&'a Parameter>> {
        let resolver = self.synth.resolver();
        let mut merged: Vec<&'a Parameter> = Vec::new();
        for item in ctx.inherited.iter().chain(&ctx.operation.parameters) {
            let param = resolver.parameter(item)?;
            if param.location == ParameterLocation::Cookie {
                continue;
            }
            merged.retain(|p| p.name != param.name);
            merged.push(param);
        }
        Ok(merged)
    }

    fn path_param(&self, operation: &str, placeholder: &str, defs: &[&Parameter]) -> Result<PathParam> {
        let Some(def) = find_matching_param(placeholder, defs) else {
            warn!(%operation, %placeholder, "path placeholder has no matching parameter, assuming string");
            return Ok(PathParam {
                name: placeholder.to_string(),
                ident: sanitize_ts_identifier(placeholder),
                required: true,
                ty: TypeExpr::Scalar(Scalar::String),
            });
        };
        Ok(PathParam {
            name: placeholder.to_string(),
            ident: sanitize_ts_identifier(&def.name),
            // A path parameter is always required, whatever the document says.
            required: true,
            ty: self.param_type(def, operation, TypeExpr::Scalar(Scalar::String))?,
        })
    }

    fn param_type(&self, param: &Parameter, operation: &str, fallback: TypeExpr) -> Result<TypeExpr> {
        match &param.schema {
            Some(schema) => self
                .synth
                .synthesize(schema, &format!("{operation}({})", param.name)),
            None => Ok(fallback),
        }
    }

    /// Type contributed by one response, `None` when it declares no content.
    fn response_member(&self, item: &RefOr<Response>, hint: &str) -> Result<Option<TypeExpr>> {
        let resolver = self.synth.resolver();
        let response = resolver.response(item)?;
        let Some(schema) = content_schema(response) else {
            return Ok(None);
        };
        match item {
            RefOr::Ref(reference) => Ok(Some(TypeExpr::Named(resolver.resolve(&reference.ref_path)?))),
            RefOr::Item(_) => self.synth.synthesize(schema, hint).map(Some),
        }
    }
}

fn content_schema(response: &Response) -> Option<&Schema> {
    preferred_media(&response.content).and_then(|m| m.schema.as_ref())
}

/// Exact name match first, then snake_case equivalence (`item_id` ~ `itemId`).
fn find_matching_param<'p>(placeholder: &str, defs: &[&'p Parameter]) -> Option<&'p Parameter> {
    if let Some(def) = defs.iter().find(|p| p.name == placeholder) {
        return Some(*def);
    }
    let placeholder_snake = to_snake_case(placeholder);
    defs.iter()
        .find(|p| to_snake_case(&p.name) == placeholder_snake)
        .copied()
}

/// True when the route's final segment is exactly one placeholder.
fn ends_with_param_segment(parts: &[RoutePart]) -> bool {
    match parts {
        [.., RoutePart::Static(before), RoutePart::Param(_)] => before.ends_with('/'),
        _ => false,
    }
}

/// Rebuild the route with `${ident}` in place of each placeholder.
fn interpolate(parts: &[RoutePart], params: &[PathParam]) -> String {
    let mut idents = params.iter().map(|p| p.ident.as_str());
    let mut out = String::new();
    for part in parts {
        match part {
            RoutePart::Static(text) => out.push_str(text),
            RoutePart::Param(placeholder) => {
                let ident = idents.next().unwrap_or(placeholder.as_str());
                out.push_str("${");
                out.push_str(ident);
                out.push('}');
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    Success,
    Error,
    Ignored,
}

fn classify_status(status: &str) -> StatusClass {
    match status.as_bytes().first() {
        _ if status == "default" => StatusClass::Error,
        Some(b'2') => StatusClass::Success,
        Some(b'3') => StatusClass::Ignored,
        _ => StatusClass::Error,
    }
}
