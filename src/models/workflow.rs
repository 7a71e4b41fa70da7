//! Workflow document produced from an OpenAPI description
//!
//! The serialized shape is a tree of named test suites, each holding ordered
//! steps that describe one HTTP call and its expected outcome.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Format version written to every generated document
pub const WORKFLOW_VERSION: &str = "1.0";

/// Workflow document root object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDocument {
    /// Format version tag
    pub version: String,

    /// Document name, taken from the API title
    pub name: String,

    /// Shared execution configuration
    pub config: WorkflowConfig,

    /// Suite key mapped to its suite, in creation order
    pub tests: IndexMap<String, Suite>,

    /// Verbatim copy of the source component schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<WorkflowComponents>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowConfig {
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpConfig {
    #[serde(rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowComponents {
    pub schemas: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suite {
    /// Display name
    pub name: String,

    pub steps: Vec<Step>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub http: HttpStep,
}

/// The HTTP call a step performs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpStep {
    pub url: String,

    /// Upper-cased HTTP method
    pub method: String,

    /// Query parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<IndexMap<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<IndexMap<String, Value>>,

    #[serde(flatten)]
    pub body: Option<RequestPayload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<Check>,
}

impl HttpStep {
    /// Insert a header, creating the header map on first use
    pub fn set_header(&mut self, name: &str, value: impl Into<Value>) {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), value.into());
    }
}

/// The single request body representation attached to a step
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    Json(Value),
    Xml(Value),
    Form(Value),
    Multipart(Value),
    Raw(Value),
    File(Value),
}

impl RequestPayload {
    /// Field name the payload is written under
    pub fn field_name(&self) -> &'static str {
        match self {
            RequestPayload::Json(_) => "json",
            RequestPayload::Xml(_) => "xml",
            RequestPayload::Form(_) => "form",
            RequestPayload::Multipart(_) => "formData",
            RequestPayload::Raw(_) | RequestPayload::File(_) => "body",
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            RequestPayload::Json(v)
            | RequestPayload::Xml(v)
            | RequestPayload::Form(v)
            | RequestPayload::Multipart(v)
            | RequestPayload::Raw(v)
            | RequestPayload::File(v) => v,
        }
    }
}

#[derive(Serialize)]
struct FileBody<'a> {
    file: &'a Value,
}

// Written as a single map entry so it can be flattened into `HttpStep`.
impl Serialize for RequestPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            RequestPayload::File(value) => {
                map.serialize_entry(self.field_name(), &FileBody { file: value })?
            }
            other => map.serialize_entry(other.field_name(), other.value())?,
        }
        map.end()
    }
}

/// Assertions evaluated against the response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Check {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

impl Check {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.schema.is_none() && self.json.is_none()
    }
}

impl WorkflowDocument {
    /// Total number of steps across all suites, counting duplicates
    pub fn step_count(&self) -> usize {
        self.tests.values().map(|suite| suite.steps.len()).sum()
    }
}
