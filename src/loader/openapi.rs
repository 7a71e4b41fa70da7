use super::dereference::inline_component_refs;
use crate::error::{Result, WorkflowError};
use crate::models::ApiDocument;
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Where an OpenAPI document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Url(String),
    /// Document text already in memory
    Inline(String),
}

impl DocumentSource {
    /// Classify a command-line argument: http(s) URLs are fetched, anything else is a file
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            DocumentSource::Url(input.to_string())
        } else {
            DocumentSource::Path(PathBuf::from(input))
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Path(path) => write!(f, "{}", path.display()),
            DocumentSource::Url(url) => write!(f, "{}", url),
            DocumentSource::Inline(_) => write!(f, "<inline>"),
        }
    }
}

/// Load an OpenAPI document from a file, URL, or inline text
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_openapi(source: &DocumentSource) -> Result<ApiDocument> {
    let content = match source {
        DocumentSource::Path(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            WorkflowError::OpenApiLoadError(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))
        })?,
        DocumentSource::Url(url) => fetch(url).await?,
        DocumentSource::Inline(text) => text.clone(),
    };

    let document = parse_openapi(&content)?;
    tracing::info!(
        title = %document.info.title,
        paths = document.paths.len(),
        "OpenAPI document loaded"
    );
    Ok(document)
}

async fn fetch(url: &str) -> Result<String> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Parse and validate OpenAPI YAML or JSON text
pub fn parse_openapi(content: &str) -> Result<ApiDocument> {
    // Parse YAML (a superset of JSON)
    let mut raw: Value = serde_yaml::from_str(content).map_err(|e| {
        WorkflowError::OpenApiLoadError(format!("Failed to parse OpenAPI document: {}", e))
    })?;

    validate_openapi(&raw)?;
    inline_component_refs(&mut raw)?;

    serde_json::from_value(raw).map_err(|e| {
        WorkflowError::OpenApiLoadError(format!("Failed to read OpenAPI document: {}", e))
    })
}

/// Validate the structure and version of the document
fn validate_openapi(raw: &Value) -> Result<()> {
    let mut checked = raw.clone();
    let is_3_0 = raw
        .get("openapi")
        .and_then(Value::as_str)
        .is_some_and(|version| version.starts_with("3.0"));
    if is_3_0 {
        upgrade_exclusive_bounds(&mut checked);
    }

    let spec: OpenApiV3Spec = serde_json::from_value(checked).map_err(|e| {
        WorkflowError::ValidationError(format!("Invalid OpenAPI document: {}", e))
    })?;

    if !spec.openapi.starts_with("3.0") && !spec.openapi.starts_with("3.1") {
        return Err(WorkflowError::ValidationError(format!(
            "Unsupported OpenAPI version: {}. Only 3.0.x and 3.1.x are supported.",
            spec.openapi
        )));
    }

    Ok(())
}

/// Rewrite 3.0 boolean `exclusiveMinimum`/`exclusiveMaximum` into the numeric
/// 3.1 form understood by the validator. Only the validated copy is rewritten.
fn upgrade_exclusive_bounds(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (flag, bound) in [("exclusiveMinimum", "minimum"), ("exclusiveMaximum", "maximum")] {
                if let Some(Value::Bool(exclusive)) = map.get(flag).cloned() {
                    map.remove(flag);
                    if exclusive && let Some(limit) = map.remove(bound) {
                        map.insert(flag.to_string(), limit);
                    }
                }
            }
            for item in map.values_mut() {
                upgrade_exclusive_bounds(item);
            }
        }
        Value::Array(items) => {
            for item in items {
                upgrade_exclusive_bounds(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_valid_openapi() {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /test:
    get:
      operationId: getTest
      responses:
        '200':
          description: OK
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let result = load_openapi(&DocumentSource::Path(file.path().to_path_buf())).await;
        assert!(result.is_ok());

        let spec = result.unwrap();
        assert_eq!(spec.info.title, "Test API");
        assert_eq!(spec.openapi, "3.0.0");
        assert!(spec.paths["/test"].operations.contains_key("get"));
    }

    #[test]
    fn test_parse_json_text() {
        let json = r#"{
  "openapi": "3.1.0",
  "info": { "title": "Json API", "version": "2.0.0" },
  "paths": {}
}"#;

        let spec = parse_openapi(json).unwrap();
        assert_eq!(spec.info.title, "Json API");
        assert!(spec.paths.is_empty());
    }

    #[test]
    fn test_load_invalid_version() {
        let yaml = r#"
openapi: 2.0.0
info:
  title: Test API
  version: 1.0.0
paths: {}
"#;

        let result = parse_openapi(yaml);
        assert!(matches!(result, Err(WorkflowError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_text() {
        let result = parse_openapi("openapi: [unclosed");
        assert!(matches!(result, Err(WorkflowError::OpenApiLoadError(_))));
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = load_openapi(&DocumentSource::parse("/nonexistent/file.yaml")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_inline() {
        let text = r#"
openapi: 3.0.3
info:
  title: Inline
  version: 1.0.0
paths: {}
"#;
        let spec = load_openapi(&DocumentSource::Inline(text.to_string()))
            .await
            .unwrap();
        assert_eq!(spec.info.title, "Inline");
    }

    #[test]
    fn test_source_classification() {
        assert_eq!(
            DocumentSource::parse("https://example.com/openapi.yaml"),
            DocumentSource::Url("https://example.com/openapi.yaml".to_string())
        );
        assert_eq!(
            DocumentSource::parse("./openapi.yaml"),
            DocumentSource::Path(PathBuf::from("./openapi.yaml"))
        );
    }

    #[test]
    fn test_boolean_exclusive_bounds_in_3_0() {
        let yaml = r#"
openapi: 3.0.3
info:
  title: Bounded
  version: 1.0.0
paths:
  /items:
    get:
      parameters:
        - name: count
          in: query
          schema:
            type: integer
            minimum: 0
            exclusiveMinimum: true
            maximum: 10
            exclusiveMaximum: false
      responses:
        '200':
          description: OK
"#;

        let spec = parse_openapi(yaml).unwrap();
        let param = &spec.paths["/items"].operations["get"].parameters[0];
        let schema = param.schema.as_ref().unwrap();
        // The loaded model keeps the 3.0 form
        assert_eq!(schema["exclusiveMinimum"], serde_json::json!(true));
        assert_eq!(schema["minimum"], serde_json::json!(0));
    }

    #[test]
    fn test_upgrade_exclusive_bounds() {
        let mut schema = serde_json::json!({
            "properties": {
                "a": { "minimum": 1, "exclusiveMinimum": true },
                "b": { "maximum": 5, "exclusiveMaximum": false }
            }
        });

        upgrade_exclusive_bounds(&mut schema);
        assert_eq!(
            schema,
            serde_json::json!({
                "properties": {
                    "a": { "exclusiveMinimum": 1 },
                    "b": { "maximum": 5 }
                }
            })
        );
    }
}
