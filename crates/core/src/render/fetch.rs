//! Plain `fetch` client flavor.
//!
//! One exported `async` function per operation. Path parameters come first,
//! then the body, query params and headers, then `options?: RequestInit`;
//! required arguments always precede optional ones.

use crate::ir::utils::{lower_first, sanitize_ts_identifier};
use crate::ir::{ComponentDescriptor, Field, ObjectShape, Scalar, TypeExpr};

use super::Renderer;
use super::emit::{Emit, TsFunction, TsParam};

const FETCH_PREAMBLE: &str = r#"export class ApiError<TBody = unknown> extends Error {
  status: number;
  statusText: string;
  body: TBody;

  constructor(status: number, statusText: string, body: TBody) {
    super(`HTTP ${status}: ${statusText}`);
    this.name = "ApiError";
    this.status = status;
    this.statusText = statusText;
    this.body = body;
  }
}

async function readBody(res: Response): Promise<unknown> {
  const text = await res.text();
  if (!text) return undefined;
  try { return JSON.parse(text); } catch { return text; }
}

function toQueryString(params?: object): string {
  if (!params) return "";
  const searchParams = new URLSearchParams();
  for (const [key, value] of Object.entries(params)) {
    if (value == null) continue;
    if (Array.isArray(value)) {
      value.forEach((v) => searchParams.append(key, String(v)));
    } else {
      searchParams.set(key, String(value));
    }
  }
  const queryString = searchParams.toString();
  return queryString ? `?${queryString}` : "";
}"#;

/// Renders each operation as a typed `fetch` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchRenderer;

impl FetchRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Name of the generated function for an operation.
pub(crate) fn function_name(descriptor: &ComponentDescriptor) -> String {
    sanitize_ts_identifier(&lower_first(&descriptor.name))
}

/// Type of the `headers` argument: one string field per header parameter.
fn headers_type(descriptor: &ComponentDescriptor) -> TypeExpr {
    TypeExpr::Object(ObjectShape {
        fields: descriptor
            .header_params
            .iter()
            .map(|p| Field {
                name: p.name.clone(),
                ty: TypeExpr::Scalar(Scalar::String),
                optional: !p.required,
                doc: None,
            })
            .collect(),
        open_index: None,
    })
}

/// `base`, prefixed with `_` until no path parameter uses it.
pub(crate) fn free_name(descriptor: &ComponentDescriptor, base: &str) -> String {
    let mut name = base.to_string();
    while descriptor
        .path_params
        .iter()
        .chain(&descriptor.trailing_id)
        .any(|p| p.ident == name)
    {
        name.insert(0, '_');
    }
    name
}

/// Names of the fixed arguments and locals of a generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgNames {
    pub data: String,
    pub params: String,
    pub headers: String,
    pub options: String,
    pub res: String,
}

impl ArgNames {
    pub(crate) fn for_descriptor(descriptor: &ComponentDescriptor) -> Self {
        Self {
            data: free_name(descriptor, "data"),
            params: free_name(descriptor, "params"),
            headers: free_name(descriptor, "headers"),
            options: free_name(descriptor, "options"),
            res: free_name(descriptor, "res"),
        }
    }
}

/// Call arguments, excluding the trailing `options`, required ones first.
pub(crate) fn call_params(descriptor: &ComponentDescriptor) -> Vec<TsParam> {
    let names = ArgNames::for_descriptor(descriptor);
    let mut required = Vec::new();
    let mut optional = Vec::new();

    for param in descriptor.path_params.iter().chain(&descriptor.trailing_id) {
        required.push(TsParam {
            name: param.ident.clone(),
            ty: param.ty.clone(),
            optional: false,
        });
    }

    let mut push = |param: TsParam| {
        if param.optional {
            optional.push(param);
        } else {
            required.push(param);
        }
    };
    if descriptor.has_body() {
        push(TsParam {
            name: names.data.clone(),
            ty: descriptor.body_type.clone(),
            optional: !descriptor.body_required,
        });
    }
    if descriptor.query_params_type.is_some() {
        push(TsParam {
            name: names.params.clone(),
            ty: descriptor.query_type(),
            optional: !descriptor.query_required,
        });
    }
    if !descriptor.header_params.is_empty() {
        push(TsParam {
            name: names.headers.clone(),
            ty: headers_type(descriptor),
            optional: !descriptor.header_params.iter().any(|p| p.required),
        });
    }

    required.extend(optional);
    required
}

fn url_expression(descriptor: &ComponentDescriptor, names: &ArgNames) -> String {
    let mut path = descriptor.route.replace('`', "\\`");
    if let Some(id) = &descriptor.trailing_id {
        path.push_str(&format!("${{{}}}", id.ident));
    }
    if descriptor.query_params_type.is_some() {
        path.push_str(&format!("${{toQueryString({})}}", names.params));
    }
    format!("`{path}`")
}

/// The function declaration for one operation.
pub(crate) fn fetch_function(descriptor: &ComponentDescriptor) -> TsFunction {
    let names = ArgNames::for_descriptor(descriptor);
    let mut params = call_params(descriptor);
    params.push(TsParam {
        name: names.options.clone(),
        ty: TypeExpr::Named("RequestInit".into()),
        optional: true,
    });

    let mut init = vec![
        format!("...{},", names.options),
        format!("method: \"{}\",", descriptor.verb.as_str()),
    ];
    let mut headers = Vec::new();
    if descriptor.has_body() {
        headers.push("\"Content-Type\": \"application/json\"".to_string());
    }
    if !descriptor.header_params.is_empty() {
        headers.push(format!("...{}", names.headers));
    }
    if !headers.is_empty() {
        headers.push(format!("...{}?.headers", names.options));
        init.push(format!("headers: {{ {} }},", headers.join(", ")));
    }
    if descriptor.has_body() {
        init.push(format!("body: JSON.stringify({}),", names.data));
    }

    let res = &names.res;
    let mut body = vec![format!(
        "const {res} = await fetch({}, {{",
        url_expression(descriptor, &names)
    )];
    body.extend(init.into_iter().map(|line| format!("  {line}")));
    body.push("});".to_string());
    body.push(format!("if (!{res}.ok) {{"));
    let error = descriptor.error_type.emit();
    body.push(format!(
        "  throw new ApiError<{error}>({res}.status, {res}.statusText, (await readBody({res})) as {error});"
    ));
    body.push("}".to_string());

    let response = descriptor.response_type.emit();
    if descriptor.response_type == TypeExpr::Scalar(Scalar::Void) {
        body.push("return;".to_string());
    } else {
        body.push(format!("return (await readBody({res})) as {response};"));
    }

    TsFunction {
        doc: descriptor.doc.clone(),
        name: function_name(descriptor),
        params,
        return_type: Some(format!("Promise<{response}>")),
        body,
        is_async: true,
    }
}

impl Renderer for FetchRenderer {
    fn render(&self, descriptor: &ComponentDescriptor) -> String {
        fetch_function(descriptor).emit()
    }

    fn render_all(&self, descriptors: &[ComponentDescriptor]) -> String {
        let mut output = descriptors
            .iter()
            .map(|d| self.render(d))
            .collect::<Vec<_>>()
            .join("\n");
        output.push_str("\nexport const api = {\n");
        for descriptor in descriptors {
            output.push_str(&format!("  {},\n", function_name(descriptor)));
        }
        output.push_str("};\n");
        output
    }

    fn preamble(&self) -> Option<String> {
        Some(FETCH_PREAMBLE.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::generator::synthesize_document;
    use crate::spec::OpenApiDocument;

    fn descriptors(json: &str) -> Vec<ComponentDescriptor> {
        let doc = OpenApiDocument::from_json(json).unwrap();
        synthesize_document(&doc, &FetchRenderer).unwrap().components
    }

    #[test]
    fn test_get_with_path_and_query() {
        let ops = descriptors(
            r##"{
              "paths": {
                "/pets/{petId}": {
                  "get": {
                    "operationId": "getPet",
                    "summary": "Fetch a pet.",
                    "parameters": [
                      { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } },
                      { "name": "expand", "in": "query", "schema": { "type": "boolean" } }
                    ],
                    "responses": {
                      "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } },
                      "404": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Problem" } } } }
                    }
                  }
                }
              },
              "components": { "schemas": { "Pet": { "type": "object" }, "Problem": { "type": "object" } } }
            }"##,
        );
        let out = FetchRenderer.render(&ops[0]);
        assert_eq!(
            out,
            r#"/**
 * Fetch a pet.
 */
export async function getPet(petId: string, params?: GetPetQueryParams, options?: RequestInit): Promise<Pet> {
  const res = await fetch(`/pets/${petId}${toQueryString(params)}`, {
    ...options,
    method: "GET",
  });
  if (!res.ok) {
    throw new ApiError<Problem>(res.status, res.statusText, (await readBody(res)) as Problem);
  }
  return (await readBody(res)) as Pet;
}
"#
        );
    }

    #[test]
    fn test_required_arguments_come_first() {
        let ops = descriptors(
            r##"{
              "paths": {
                "/pets/{petId}": {
                  "put": {
                    "operationId": "updatePet",
                    "parameters": [
                      { "name": "petId", "in": "path", "required": true },
                      { "name": "dryRun", "in": "query" },
                      { "name": "x-request-id", "in": "header", "required": true }
                    ],
                    "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
                  }
                }
              },
              "components": { "schemas": { "Pet": { "type": "object" } } }
            }"##,
        );
        let names: Vec<_> = call_params(&ops[0])
            .into_iter()
            .map(|p| (p.name, p.optional))
            .collect();
        assert_eq!(
            names,
            vec![
                ("petId".to_string(), false),
                ("headers".to_string(), false),
                ("data".to_string(), true),
                ("params".to_string(), true),
            ]
        );
        let out = FetchRenderer.render(&ops[0]);
        assert!(out.contains("headers: { \"x-request-id\": string }"));
        assert!(out.contains(
            "headers: { \"Content-Type\": \"application/json\", ...headers, ...options?.headers },"
        ));
        assert!(out.contains("body: JSON.stringify(data),"));
        assert!(out.contains("): Promise<void> {"));
        assert!(out.contains("throw new ApiError<unknown>("));
    }

    #[test]
    fn test_delete_appends_trailing_id() {
        let ops = descriptors(
            r#"{"paths": {"/use-cases/{useCaseId}": {"delete": {"operationId": "deleteUseCase"}}}}"#,
        );
        let out = FetchRenderer.render(&ops[0]);
        assert!(out.contains("deleteUseCase(useCaseId: string, options?: RequestInit)"));
        assert!(out.contains("fetch(`/use-cases/${useCaseId}`, {"));
    }

    #[test]
    fn test_path_param_named_like_fixed_argument() {
        let ops = descriptors(
            r##"{
              "paths": {
                "/x/{data}/{res}": {
                  "put": {
                    "operationId": "putX",
                    "parameters": [
                      { "name": "data", "in": "path", "required": true },
                      { "name": "res", "in": "path", "required": true },
                      { "name": "q", "in": "query" }
                    ],
                    "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
                  }
                }
              },
              "components": { "schemas": { "Pet": { "type": "object" } } }
            }"##,
        );
        let out = FetchRenderer.render(&ops[0]);
        assert!(out.contains(
            "putX(data: string, res: string, _data: Pet, params?: PutXQueryParams, options?: RequestInit)"
        ));
        assert!(out.contains("const _res = await fetch(`/x/${data}/${res}${toQueryString(params)}`, {"));
        assert!(out.contains("body: JSON.stringify(_data),"));
        assert!(out.contains("if (!_res.ok) {"));
        assert!(out.contains("return;"));
    }

    #[test]
    fn test_aggregate_exports_client_object() {
        let ops = descriptors(
            r#"{"paths": {"/pets": {"get": {"operationId": "listPets"}, "post": {"operationId": "addPet"}}}}"#,
        );
        let out = FetchRenderer.render_all(&ops);
        assert!(out.ends_with("export const api = {\n  listPets,\n  addPet,\n};\n"));
    }
}
