//! React Query flavor: the fetch client plus data-fetching hooks.
//!
//! GET operations get a query key function and a `useQuery` hook; every other
//! verb gets a `useMutation` hook. A GET carrying a `prefer` header is a
//! long-polling endpoint and its hook refetches on an interval.

use crate::ir::utils::{capitalize_first, escape_js_string};
use crate::ir::{ComponentDescriptor, Field, ObjectShape, TypeExpr};

use super::Renderer;
use super::emit::{Emit, TsParam};
use super::fetch::{ArgNames, FetchRenderer, call_params, fetch_function, free_name, function_name};

const HOOKS_IMPORT: &str = "import { useMutation, useQuery, type UseMutationOptions, type UseQueryOptions } from \"@tanstack/react-query\";";

/// Refetch period for long-polling queries, in milliseconds.
const POLL_INTERVAL_MS: u32 = 1000;

/// Renders fetch functions followed by their hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryHooksRenderer {
    fetch: FetchRenderer,
}

impl QueryHooksRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_polling(descriptor: &ComponentDescriptor) -> bool {
    descriptor
        .header_params
        .iter()
        .any(|p| p.name.eq_ignore_ascii_case("prefer"))
}

fn emit_params(params: &[TsParam]) -> String {
    params.iter().map(Emit::emit).collect::<Vec<_>>().join(", ")
}

fn query_hook(descriptor: &ComponentDescriptor) -> String {
    let fetch_fn = function_name(descriptor);
    let key_fn = format!("{fetch_fn}Key");
    let hook_name = format!("use{}", capitalize_first(&fetch_fn));
    let response = descriptor.response_type.emit();
    let error = descriptor.error_type.emit();

    let params = call_params(descriptor);
    let args = params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
    let headers = ArgNames::for_descriptor(descriptor).headers;
    let query_options = free_name(descriptor, "queryOptions");

    // Key covers path params and query params; headers do not identify data.
    let key_params: Vec<&TsParam> = params.iter().filter(|p| p.name != headers).collect();
    let key_args = key_params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    let key_signature = key_params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");
    let key_items = std::iter::once(format!("\"{}\"", escape_js_string(&descriptor.path)))
        .chain(key_args.iter().map(|a| (*a).to_string()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut hook_params = params.clone();
    hook_params.push(TsParam {
        name: query_options.clone(),
        ty: TypeExpr::Named(format!(
            "Omit<UseQueryOptions<{response}, ApiError<{error}>>, \"queryKey\" | \"queryFn\">"
        )),
        optional: true,
    });

    let mut output = format!(
        "export const {key_fn} = ({key_signature}) => [{key_items}] as const;\n\n"
    );
    if !descriptor.doc.is_empty() {
        output.push_str(&descriptor.doc);
        output.push('\n');
    }
    output.push_str(&format!(
        "export function {hook_name}({}) {{\n",
        emit_params(&hook_params)
    ));
    output.push_str("  return useQuery({\n");
    output.push_str(&format!("    queryKey: {key_fn}({}),\n", key_args.join(", ")));
    output.push_str(&format!("    queryFn: () => {fetch_fn}({args}),\n"));
    if is_polling(descriptor) {
        output.push_str(&format!("    refetchInterval: {POLL_INTERVAL_MS},\n"));
    }
    output.push_str(&format!("    ...{query_options},\n"));
    output.push_str("  });\n}\n");
    output
}

fn mutation_hook(descriptor: &ComponentDescriptor) -> String {
    let fetch_fn = function_name(descriptor);
    let hook_name = format!("use{}", capitalize_first(&fetch_fn));
    let response = descriptor.response_type.emit();
    let error = descriptor.error_type.emit();

    let params = call_params(descriptor);
    let (vars_type, mutation_fn) = if params.is_empty() {
        ("void".to_string(), format!("() => {fetch_fn}()"))
    } else {
        let vars = TypeExpr::Object(ObjectShape {
            fields: params
                .iter()
                .map(|p| Field {
                    name: p.name.clone(),
                    ty: p.ty.clone(),
                    optional: p.optional,
                    doc: None,
                })
                .collect(),
            open_index: None,
        });
        let args = params
            .iter()
            .map(|p| format!("vars.{}", p.name))
            .collect::<Vec<_>>()
            .join(", ");
        (vars.emit(), format!("(vars) => {fetch_fn}({args})"))
    };

    let mut output = String::new();
    if !descriptor.doc.is_empty() {
        output.push_str(&descriptor.doc);
        output.push('\n');
    }
    output.push_str(&format!(
        "export function {hook_name}(mutationOptions?: Omit<UseMutationOptions<{response}, ApiError<{error}>, {vars_type}>, \"mutationFn\">) {{\n"
    ));
    output.push_str("  return useMutation({\n");
    output.push_str(&format!("    mutationFn: {mutation_fn},\n"));
    output.push_str("    ...mutationOptions,\n");
    output.push_str("  });\n}\n");
    output
}

impl Renderer for QueryHooksRenderer {
    fn render(&self, descriptor: &ComponentDescriptor) -> String {
        let hook = if descriptor.verb.is_query() {
            query_hook(descriptor)
        } else {
            mutation_hook(descriptor)
        };
        format!("{}\n{}", fetch_function(descriptor).emit(), hook)
    }

    fn preamble(&self) -> Option<String> {
        let fetch = self.fetch.preamble().unwrap_or_default();
        Some(format!("{HOOKS_IMPORT}\n\n{fetch}"))
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
        synthesize_document(&doc, &QueryHooksRenderer::new())
            .unwrap()
            .components
    }

    #[test]
    fn test_query_hook() {
        let ops = descriptors(
            r##"{
              "paths": {
                "/pets/{petId}": {
                  "get": {
                    "operationId": "getPet",
                    "parameters": [{ "name": "petId", "in": "path", "required": true }],
                    "responses": { "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } } }
                  }
                }
              },
              "components": { "schemas": { "Pet": { "type": "object" } } }
            }"##,
        );
        let out = QueryHooksRenderer::new().render(&ops[0]);
        assert!(out.contains("export async function getPet(petId: string, options?: RequestInit): Promise<Pet>"));
        assert!(out.contains("export const getPetKey = (petId: string) => [\"/pets/{petId}\", petId] as const;"));
        assert!(out.contains(
            "export function useGetPet(petId: string, queryOptions?: Omit<UseQueryOptions<Pet, ApiError<unknown>>, \"queryKey\" | \"queryFn\">) {"
        ));
        assert!(out.contains("    queryKey: getPetKey(petId),\n    queryFn: () => getPet(petId),\n"));
        assert!(!out.contains("refetchInterval"));
    }

    #[test]
    fn test_prefer_header_polls() {
        let ops = descriptors(
            r#"{"paths": {"/jobs/{jobId}": {"get": {
                "operationId": "getJob",
                "parameters": [
                  { "name": "jobId", "in": "path", "required": true },
                  { "name": "Prefer", "in": "header" }
                ]
            }}}}"#,
        );
        let out = QueryHooksRenderer::new().render(&ops[0]);
        assert!(out.contains("refetchInterval: 1000,"));
        assert!(out.contains("queryFn: () => getJob(jobId, headers),"));
        assert!(out.contains("queryKey: getJobKey(jobId),"));
    }

    #[test]
    fn test_hook_arguments_avoid_path_param_names() {
        let ops = descriptors(
            r#"{"paths": {
              "/x/{headers}": {"get": {
                "operationId": "getX",
                "parameters": [
                  { "name": "headers", "in": "path", "required": true },
                  { "name": "queryOptions", "in": "header" }
                ]
              }},
              "/y/{data}": {"post": {
                "operationId": "postY",
                "parameters": [{ "name": "data", "in": "path", "required": true }],
                "requestBody": { "content": { "application/json": { "schema": { "type": "string" } } } }
              }}
            }}"#,
        );
        let renderer = QueryHooksRenderer::new();
        let get = renderer.render(&ops[0]);
        assert!(get.contains("export const getXKey = (headers: string) => [\"/x/{headers}\", headers] as const;"));
        assert!(get.contains("export function useGetX(headers: string, _headers?: { queryOptions?: string }, queryOptions?: Omit<"));
        assert!(get.contains("queryFn: () => getX(headers, _headers),"));

        let post = renderer.render(&ops[1]);
        assert!(post.contains("{ data: string; _data?: PostYRequestBody }"));
        assert!(post.contains("mutationFn: (vars) => postY(vars.data, vars._data),"));
    }

    #[test]
    fn test_mutation_hook() {
        let ops = descriptors(
            r##"{
              "paths": {
                "/pets": {
                  "post": {
                    "operationId": "createPet",
                    "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
                  }
                },
                "/ping": { "post": { "operationId": "ping" } }
              },
              "components": { "schemas": { "Pet": { "type": "object" } } }
            }"##,
        );
        let renderer = QueryHooksRenderer::new();
        let create = renderer.render(&ops[0]);
        assert!(create.contains(
            "export function useCreatePet(mutationOptions?: Omit<UseMutationOptions<void, ApiError<unknown>, { data: Pet }>, \"mutationFn\">) {"
        ));
        assert!(create.contains("mutationFn: (vars) => createPet(vars.data),"));

        let ping = renderer.render(&ops[1]);
        assert!(ping.contains("UseMutationOptions<void, ApiError<unknown>, void>"));
        assert!(ping.contains("mutationFn: () => ping(),"));
    }

    #[test]
    fn test_preamble_imports_first() {
        let preamble = QueryHooksRenderer::new().preamble().unwrap();
        assert!(preamble.starts_with("import { useMutation, useQuery"));
        assert!(preamble.contains("export class ApiError"));
    }
}
