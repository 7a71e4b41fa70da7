//! Generation options
//!
//! Options are always built by deep-merging user overrides onto the documented
//! defaults: objects merge key-wise, arrays and scalars are replaced.

use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Options controlling how a workflow is generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateOptions {
    pub generator: GeneratorOptions,
    pub check: CheckOptions,
    /// Target content type used for body negotiation and response checks
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Substitute `{name}` placeholders in URLs
    pub path_params: bool,
    /// Synthesize request bodies
    pub request_body: bool,
    /// Include parameters and bodies not marked required
    pub optional_params: bool,
    /// Prefer schema examples over random values during synthesis
    pub use_example_values: bool,
    /// Prefer schema defaults over random values during synthesis
    pub use_default_values: bool,
    /// Embed component schemas even when schema checks are off
    pub inline_schema: bool,
    /// Seed for value synthesis; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub fallback_suite: FallbackSuitePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckOptions {
    pub status: bool,
    pub examples: bool,
    pub schema: bool,
    pub response_selection: ResponseSelection,
}

/// When the fallback suite for untagged operations is created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackSuitePolicy {
    /// Created up front when the document declares no tags, even if it stays empty
    #[default]
    Eager,
    /// Created on the first untagged step
    Lazy,
}

/// Which declared response a step's checks are derived from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSelection {
    /// Only the `"200"` entry
    Success,
    /// The first declared entry, whatever its status key
    #[default]
    First,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            generator: GeneratorOptions::default(),
            check: CheckOptions::default(),
            content_type: "application/json".to_string(),
        }
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            path_params: true,
            request_body: true,
            optional_params: true,
            use_example_values: true,
            use_default_values: true,
            inline_schema: false,
            seed: None,
            fallback_suite: FallbackSuitePolicy::Eager,
        }
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            status: true,
            examples: true,
            schema: true,
            response_selection: ResponseSelection::First,
        }
    }
}

impl GenerateOptions {
    /// Deep-merge `overrides` onto these options
    pub fn merge(&self, overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        deep_merge(&mut base, overrides);
        serde_json::from_value(base).map_err(|e| {
            WorkflowError::ConfigError(format!("Invalid generation options: {}", e))
        })
    }

    /// Deep-merge `overrides` onto the defaults
    pub fn merged(overrides: &Value) -> Result<Self> {
        Self::default().merge(overrides)
    }

    /// Load overrides from a YAML or JSON file and merge them onto the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            WorkflowError::ConfigError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let overrides: Value = serde_yaml::from_str(&content).map_err(|e| {
            WorkflowError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        // An empty file parses to null
        if overrides.is_null() {
            return Ok(Self::default());
        }

        Self::merged(&overrides)
    }

    /// Whether component schemas are embedded in the output
    pub fn embeds_schemas(&self) -> bool {
        self.check.schema || self.generator.inline_schema
    }
}

/// Merge `overlay` into `base`: objects key-wise, everything else replaced
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let options = GenerateOptions::default();
        assert!(options.generator.path_params);
        assert!(options.generator.request_body);
        assert!(options.generator.optional_params);
        assert!(options.generator.use_example_values);
        assert!(options.generator.use_default_values);
        assert!(!options.generator.inline_schema);
        assert!(options.check.status && options.check.examples && options.check.schema);
        assert_eq!(options.content_type, "application/json");
        assert_eq!(options.generator.fallback_suite, FallbackSuitePolicy::Eager);
        assert_eq!(options.check.response_selection, ResponseSelection::First);
    }

    #[test]
    fn test_partial_override_keeps_siblings() {
        let options = GenerateOptions::merged(&json!({
            "generator": { "optionalParams": false },
            "check": { "schema": false }
        }))
        .unwrap();

        assert!(!options.generator.optional_params);
        assert!(options.generator.path_params);
        assert!(!options.check.schema);
        assert!(options.check.status);
        assert_eq!(options.content_type, "application/json");
    }

    #[test]
    fn test_scalars_and_arrays_are_replaced() {
        let mut base = json!({ "a": [1, 2, 3], "b": { "c": 1, "d": 2 } });
        deep_merge(&mut base, &json!({ "a": [9], "b": { "d": 5 } }));
        assert_eq!(base, json!({ "a": [9], "b": { "c": 1, "d": 5 } }));
    }

    #[test]
    fn test_enum_fields() {
        let options = GenerateOptions::merged(&json!({
            "contentType": "application/xml",
            "generator": { "fallbackSuite": "lazy", "seed": 42 },
            "check": { "responseSelection": "success" }
        }))
        .unwrap();

        assert_eq!(options.content_type, "application/xml");
        assert_eq!(options.generator.fallback_suite, FallbackSuitePolicy::Lazy);
        assert_eq!(options.generator.seed, Some(42));
        assert_eq!(options.check.response_selection, ResponseSelection::Success);
    }

    #[test]
    fn test_ill_typed_override_is_rejected() {
        let result = GenerateOptions::merged(&json!({ "generator": { "pathParams": "yes" } }));
        assert!(matches!(result, Err(WorkflowError::ConfigError(_))));
    }

    #[test]
    fn test_from_yaml_file() {
        let yaml = r#"
generator:
  requestBody: false
check:
  examples: false
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let options = GenerateOptions::from_file(file.path()).unwrap();
        assert!(!options.generator.request_body);
        assert!(!options.check.examples);
        assert!(options.check.status);
    }

    #[test]
    fn test_embeds_schemas() {
        let mut options = GenerateOptions::default();
        assert!(options.embeds_schemas());

        options.check.schema = false;
        assert!(!options.embeds_schemas());

        options.generator.inline_schema = true;
        assert!(options.embeds_schemas());
    }
}
