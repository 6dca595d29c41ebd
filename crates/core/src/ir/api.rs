//! Operation-level IR handed to renderers.
//!
//! - `HttpVerb`: the synthesized HTTP methods
//! - `PathParam`: one interpolated path parameter
//! - `ComponentDescriptor`: everything a renderer needs for one operation

use crate::spec::Parameter;

use super::types::{Scalar, TypeExpr};

/// HTTP method of a synthesized operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl HttpVerb {
    /// Map a lowercase path item key to a verb. `head`, `options` and
    /// `trace` are not synthesized.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// GET is a read; everything else mutates.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Get)
    }
}

/// A path parameter, in route order.
#[derive(Debug, Clone, PartialEq)]
pub struct PathParam {
    /// Name as written in the route placeholder.
    pub name: String,
    /// Identifier used in the interpolated route.
    pub ident: String,
    pub required: bool,
    pub ty: TypeExpr,
}

/// Synthesized description of one REST operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    /// PascalCase component name (e.g. "GetUseCase").
    pub name: String,
    pub verb: HttpVerb,
    /// Route template as declared (e.g. "/use-cases/{useCaseId}").
    pub path: String,
    /// Route with placeholders rewritten to `${ident}`.
    ///
    /// For a DELETE whose last segment is a parameter, that segment is cut
    /// off and carried in `trailing_id` instead.
    pub route: String,
    pub path_params: Vec<PathParam>,
    /// The trailing identifier dropped from a DELETE route.
    pub trailing_id: Option<PathParam>,
    /// Name of the `<Name>QueryParams` definition, when there are query params.
    pub query_params_type: Option<String>,
    /// Whether any query parameter is required.
    pub query_required: bool,
    /// Header parameters, passed through untouched.
    pub header_params: Vec<Parameter>,
    /// `void` when the operation takes no body.
    pub body_type: TypeExpr,
    pub body_required: bool,
    /// `void` when no success response declares content.
    pub response_type: TypeExpr,
    /// `unknown` when no error response declares content.
    pub error_type: TypeExpr,
    /// Preformatted doc block, empty when the operation has no summary or description.
    pub doc: String,
    pub tags: Vec<String>,
    pub deprecated: bool,
}

impl ComponentDescriptor {
    /// Type of the query argument: the named params type, or `any`.
    pub fn query_type(&self) -> TypeExpr {
        self.query_params_type
            .as_ref()
            .map_or(TypeExpr::Scalar(Scalar::Any), |name| {
                TypeExpr::Named(name.clone())
            })
    }

    /// Whether a body is sent.
    pub fn has_body(&self) -> bool {
        self.body_type != TypeExpr::Scalar(Scalar::Void)
    }
}
