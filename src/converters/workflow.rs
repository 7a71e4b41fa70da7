//! Workflow converter
//!
//! Traverses every path (in document order) and every method within it,
//! builds one step per operation and routes it into the suite of each tag
//! the operation declares. Untagged operations land in a fallback suite.

use super::Converter;
use crate::config::{FallbackSuitePolicy, GenerateOptions};
use crate::error::Result;
use crate::generator::{ValueResolver, bind, compose, compose_checks};
use crate::models::openapi::Tag;
use crate::models::workflow::{HttpConfig, WORKFLOW_VERSION, WorkflowComponents, WorkflowConfig};
use crate::models::{ApiDocument, HttpStep, Operation, Step, Suite, WorkflowDocument};
use indexmap::IndexMap;

/// Suite key for operations without tags
pub const FALLBACK_SUITE_KEY: &str = "default";

/// Display name of the fallback suite
pub const FALLBACK_SUITE_NAME: &str = "Default";

/// Converter producing a `WorkflowDocument`
#[derive(Debug, Clone, Default)]
pub struct WorkflowConverter;

impl WorkflowConverter {
    /// Create a new WorkflowConverter
    pub fn new() -> Self {
        Self
    }

    /// Build the step for one operation
    fn build_step(
        path: &str,
        method: &str,
        operation: &Operation,
        resolver: &mut ValueResolver<'_>,
        options: &GenerateOptions,
    ) -> Result<Step> {
        // An operation-level server replaces the path template entirely
        let url_template = operation
            .servers
            .as_ref()
            .and_then(|servers| servers.first())
            .map(|server| server.url.as_str())
            .unwrap_or(path);

        let bound = bind(operation, url_template, resolver, options)?;

        let mut http = HttpStep {
            url: bound.url,
            method: method.to_uppercase(),
            params: bound.query,
            headers: bound.headers,
            cookies: bound.cookies,
            ..Default::default()
        };

        if let Some(body) = compose(operation, resolver, options)? {
            http.set_header("Content-Type", body.content_type.as_str());
            if body.negotiated {
                http.set_header("Accept", body.content_type.as_str());
            }
            http.body = Some(body.payload);
        }

        http.check = compose_checks(operation, options);

        Ok(Step {
            id: operation.operation_id.clone(),
            name: operation.summary.clone(),
            http,
        })
    }
}

impl Converter for WorkflowConverter {
    type Output = WorkflowDocument;

    #[tracing::instrument(skip_all, fields(title = %document.info.title))]
    fn convert(&self, document: &ApiDocument, options: &GenerateOptions) -> Result<Self::Output> {
        let no_schemas = IndexMap::new();
        let schemas = document.component_schemas().unwrap_or(&no_schemas);

        let mut resolver = ValueResolver::new(schemas, &options.generator);
        let mut router = SuiteRouter::new(document.tags.as_deref(), options.generator.fallback_suite);

        for (path, method, operation) in document.operations() {
            let step = Self::build_step(path, method, operation, &mut resolver, options)?;
            tracing::debug!(path, method, id = ?step.id, "Built step");
            router.route(operation.tags.as_deref(), step);
        }

        let components = (options.embeds_schemas() && !schemas.is_empty()).then(|| {
            WorkflowComponents {
                schemas: schemas.clone(),
            }
        });

        let workflow = WorkflowDocument {
            version: WORKFLOW_VERSION.to_string(),
            name: document.info.title.clone(),
            config: WorkflowConfig {
                http: HttpConfig {
                    base_url: document.servers.first().map(|server| server.url.clone()),
                },
            },
            tests: router.finish(),
            components,
        };

        tracing::info!(
            suites = workflow.tests.len(),
            steps = workflow.step_count(),
            "Workflow assembled"
        );

        Ok(workflow)
    }
}

/// Groups steps into suites keyed by tag name
struct SuiteRouter {
    suites: IndexMap<String, Suite>,
}

impl SuiteRouter {
    fn new(tags: Option<&[Tag]>, fallback: FallbackSuitePolicy) -> Self {
        let mut suites = IndexMap::new();

        match tags {
            Some(tags) if !tags.is_empty() => {
                for tag in tags {
                    let name = tag.description.clone().unwrap_or_else(|| tag.name.clone());
                    suites.insert(tag.name.clone(), Suite::new(name));
                }
            }
            _ => {
                if fallback == FallbackSuitePolicy::Eager {
                    suites.insert(FALLBACK_SUITE_KEY.to_string(), Suite::new(FALLBACK_SUITE_NAME));
                }
            }
        }

        Self { suites }
    }

    /// Route `step` into every suite named by `tags`, or the fallback suite
    fn route(&mut self, tags: Option<&[String]>, step: Step) {
        let mut targets: Vec<&str> = Vec::new();
        for tag in tags.unwrap_or_default() {
            if !targets.contains(&tag.as_str()) {
                targets.push(tag.as_str());
            }
        }

        if targets.is_empty() {
            self.fallback_suite().steps.push(step);
            return;
        }

        for tag in targets {
            let suite = self.suites.entry(tag.to_string()).or_insert_with(|| {
                tracing::warn!(tag, "Tag is not declared at document level, creating suite");
                Suite::new(tag)
            });
            suite.steps.push(step.clone());
        }
    }

    fn fallback_suite(&mut self) -> &mut Suite {
        self.suites
            .entry(FALLBACK_SUITE_KEY.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating fallback suite for untagged operation");
                Suite::new(FALLBACK_SUITE_NAME)
            })
    }

    fn finish(self) -> IndexMap<String, Suite> {
        self.suites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestPayload;
    use serde_json::{Value, json};

    fn document(value: Value) -> ApiDocument {
        serde_json::from_value(value).unwrap()
    }

    fn options(overrides: Value) -> GenerateOptions {
        let mut options = GenerateOptions::merged(&overrides).unwrap();
        options.generator.seed = Some(99);
        options
    }

    fn convert(doc: &ApiDocument, overrides: Value) -> WorkflowDocument {
        WorkflowConverter::new().convert(doc, &options(overrides)).unwrap()
    }

    fn pets_document() -> ApiDocument {
        document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Pets", "version": "1.0.0" },
            "tags": [ { "name": "pets", "description": "Everything about pets" } ],
            "paths": {
                "/pets/{id}": {
                    "get": {
                        "operationId": "getPet",
                        "summary": "Find pet by ID",
                        "tags": ["pets"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true,
                              "schema": { "type": "integer", "example": 7 } }
                        ],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "application/json": { "schema": { "type": "object" } } }
                            }
                        }
                    }
                }
            }
        }))
    }

    #[test]
    fn test_single_tagged_operation() {
        let workflow = convert(&pets_document(), json!({}));

        assert_eq!(workflow.version, "1.0");
        assert_eq!(workflow.name, "Pets");
        assert_eq!(workflow.tests.keys().collect::<Vec<_>>(), vec!["pets"]);

        let suite = &workflow.tests["pets"];
        assert_eq!(suite.name, "Everything about pets");
        assert_eq!(suite.steps.len(), 1);

        let step = &suite.steps[0];
        assert_eq!(step.id.as_deref(), Some("getPet"));
        assert_eq!(step.name.as_deref(), Some("Find pet by ID"));
        assert_eq!(step.http.method, "GET");
        assert_eq!(step.http.url, "/pets/7");

        let check = step.http.check.as_ref().unwrap();
        assert_eq!(check.status, Some(200));
        assert_eq!(check.schema, Some(json!({ "type": "object" })));
        assert!(check.json.is_none());
    }

    #[test]
    fn test_multi_tag_routing_and_order() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Store", "version": "1.0.0" },
            "tags": [ { "name": "pets" }, { "name": "store" } ],
            "paths": {
                "/pets": {
                    "post": { "operationId": "addPet", "tags": ["pets", "store", "pets"] },
                    "get": { "operationId": "listPets", "tags": ["pets"] }
                },
                "/orders": {
                    "get": { "operationId": "listOrders", "tags": ["store"] }
                }
            }
        }));

        let workflow = convert(&doc, json!({}));
        let ids = |key: &str| -> Vec<String> {
            workflow.tests[key]
                .steps
                .iter()
                .filter_map(|s| s.id.clone())
                .collect()
        };

        assert_eq!(ids("pets"), vec!["addPet", "listPets"]);
        assert_eq!(ids("store"), vec!["addPet", "listOrders"]);
        assert_eq!(workflow.tests["pets"].name, "pets");
        assert!(!workflow.tests.contains_key(FALLBACK_SUITE_KEY));
    }

    #[test]
    fn test_eager_fallback_suite() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Empty", "version": "1.0.0" },
            "paths": {}
        }));

        let workflow = convert(&doc, json!({}));
        assert_eq!(workflow.tests.len(), 1);
        assert_eq!(workflow.tests[FALLBACK_SUITE_KEY].name, "Default");
        assert!(workflow.tests[FALLBACK_SUITE_KEY].steps.is_empty());
    }

    #[test]
    fn test_lazy_fallback_suite() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Empty", "version": "1.0.0" },
            "paths": {}
        }));

        let workflow = convert(&doc, json!({ "generator": { "fallbackSuite": "lazy" } }));
        assert!(workflow.tests.is_empty());

        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "One", "version": "1.0.0" },
            "paths": { "/ping": { "get": { "operationId": "ping" } } }
        }));

        let workflow = convert(&doc, json!({ "generator": { "fallbackSuite": "lazy" } }));
        assert_eq!(workflow.tests[FALLBACK_SUITE_KEY].steps.len(), 1);
    }

    #[test]
    fn test_untagged_operation_in_tagged_document() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Mixed", "version": "1.0.0" },
            "tags": [ { "name": "pets" } ],
            "paths": {
                "/pets": { "get": { "operationId": "listPets", "tags": ["pets"] } },
                "/health": { "get": { "operationId": "health" } }
            }
        }));

        let workflow = convert(&doc, json!({}));
        assert_eq!(workflow.tests.keys().collect::<Vec<_>>(), vec!["pets", "default"]);
        assert_eq!(workflow.tests["default"].steps[0].id.as_deref(), Some("health"));
    }

    #[test]
    fn test_undeclared_tag_creates_suite() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Loose", "version": "1.0.0" },
            "paths": { "/users": { "get": { "operationId": "listUsers", "tags": ["users"] } } }
        }));

        let workflow = convert(&doc, json!({}));
        assert_eq!(workflow.tests["users"].name, "users");
        assert_eq!(workflow.tests["users"].steps.len(), 1);
        assert!(workflow.tests[FALLBACK_SUITE_KEY].steps.is_empty());
    }

    #[test]
    fn test_operation_server_override_and_base_url() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Servers", "version": "1.0.0" },
            "servers": [ { "url": "https://api.example.com/v1" }, { "url": "https://staging.example.com" } ],
            "paths": {
                "/files/{name}": {
                    "get": {
                        "operationId": "download",
                        "servers": [ { "url": "https://cdn.example.com/{name}" } ],
                        "parameters": [ { "name": "name", "in": "path", "required": true, "example": "a.txt" } ]
                    }
                }
            }
        }));

        let workflow = convert(&doc, json!({}));
        assert_eq!(workflow.config.http.base_url.as_deref(), Some("https://api.example.com/v1"));
        assert_eq!(
            workflow.tests[FALLBACK_SUITE_KEY].steps[0].http.url,
            "https://cdn.example.com/a.txt"
        );
    }

    #[test]
    fn test_body_headers_and_payload() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Bodies", "version": "1.0.0" },
            "paths": {
                "/pets": {
                    "post": {
                        "operationId": "addPet",
                        "parameters": [ { "name": "X-Trace", "in": "header", "example": "t-1" } ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "multipart/form-data": { "example": { "photo": "file.txt" } },
                                "application/json": { "example": { "name": "doggie" } }
                            }
                        }
                    }
                }
            }
        }));

        let workflow = convert(&doc, json!({}));
        let http = &workflow.tests[FALLBACK_SUITE_KEY].steps[0].http;
        let headers = http.headers.as_ref().unwrap();

        assert_eq!(headers["X-Trace"], json!("t-1"));
        assert_eq!(headers["Content-Type"], json!("application/json"));
        assert_eq!(headers["Accept"], json!("application/json"));
        assert_eq!(http.body, Some(RequestPayload::Json(json!({ "name": "doggie" }))));
    }

    #[test]
    fn test_components_embedding() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Schemas", "version": "1.0.0" },
            "paths": {},
            "components": {
                "schemas": {
                    "Zebra": { "type": "object" },
                    "Apple": { "type": "string" }
                }
            }
        }));

        let workflow = convert(&doc, json!({}));
        let schemas = &workflow.components.as_ref().unwrap().schemas;
        assert_eq!(schemas.keys().collect::<Vec<_>>(), vec!["Zebra", "Apple"]);

        let workflow = convert(&doc, json!({ "check": { "schema": false } }));
        assert!(workflow.components.is_none());

        let workflow = convert(
            &doc,
            json!({ "check": { "schema": false }, "generator": { "inlineSchema": true } }),
        );
        assert!(workflow.components.is_some());
    }

    #[test]
    fn test_step_count_matches_operations() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Count", "version": "1.0.0" },
            "paths": {
                "/a": { "get": {}, "put": {}, "delete": {} },
                "/b": { "post": {}, "patch": {} }
            }
        }));

        let workflow = convert(&doc, json!({}));
        assert_eq!(workflow.step_count(), 5);
        let methods: Vec<&str> = workflow.tests[FALLBACK_SUITE_KEY]
            .steps
            .iter()
            .map(|s| s.http.method.as_str())
            .collect();
        assert_eq!(methods, vec!["GET", "PUT", "DELETE", "POST", "PATCH"]);
    }

    #[test]
    fn test_same_seed_same_document() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Random", "version": "1.0.0" },
            "paths": {
                "/items": {
                    "post": {
                        "parameters": [ { "name": "q", "in": "query", "schema": { "type": "string" } } ],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "id": { "type": "string", "format": "uuid" },
                                            "count": { "type": "integer" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }));

        assert_eq!(convert(&doc, json!({})), convert(&doc, json!({})));
    }

    #[test]
    fn test_unresolved_reference_aborts() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Broken", "version": "1.0.0" },
            "paths": {
                "/items": {
                    "get": {
                        "parameters": [ { "name": "q", "in": "query",
                                          "schema": { "$ref": "#/components/schemas/Nope" } } ]
                    }
                }
            }
        }));

        let result = WorkflowConverter::new().convert(&doc, &options(json!({})));
        assert!(result.is_err());
    }
}
