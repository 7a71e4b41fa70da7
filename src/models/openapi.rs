//! Order-preserving view of an OpenAPI 3.x document
//!
//! Only the parts needed to synthesize test steps are modeled. Schemas are
//! kept as raw JSON values so they can be embedded in the output verbatim.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// HTTP methods recognized inside a path item, lowercase as they appear in documents
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// OpenAPI document root object
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDocument {
    /// The OpenAPI version string (e.g., "3.0.3")
    pub openapi: String,

    /// Metadata about the API
    pub info: Info,

    /// Server base URLs, in declaration order
    #[serde(default)]
    pub servers: Vec<Server>,

    /// Path templates mapped to their operations, in document order
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components
    #[serde(default)]
    pub components: Option<Components>,

    /// Document-level tags, in declaration order
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    /// The title of the API
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    /// Named schemas, kept verbatim
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// A path item with its operations in document order.
///
/// Path-level parameters are folded into every operation while deserializing,
/// so each `Operation` carries its complete parameter list.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawPathItem")]
pub struct PathItem {
    /// Lowercase HTTP method mapped to its operation
    pub operations: IndexMap<String, Operation>,
}

#[derive(Deserialize)]
struct RawPathItem {
    #[serde(default)]
    parameters: Vec<Parameter>,

    #[serde(flatten)]
    fields: IndexMap<String, Value>,
}

impl TryFrom<RawPathItem> for PathItem {
    type Error = serde_json::Error;

    fn try_from(raw: RawPathItem) -> Result<Self, Self::Error> {
        let mut operations = IndexMap::new();

        for (key, value) in raw.fields {
            let method = key.to_lowercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }

            let mut operation: Operation = serde_json::from_value(value)?;
            operation.parameters = merge_parameters(&raw.parameters, operation.parameters);
            operations.insert(method, operation);
        }

        Ok(Self { operations })
    }
}

/// Path-level parameters first, each replaced in place by an operation-level
/// parameter with the same name and location; remaining operation parameters follow.
fn merge_parameters(shared: &[Parameter], own: Vec<Parameter>) -> Vec<Parameter> {
    if shared.is_empty() {
        return own;
    }

    let mut merged: Vec<Parameter> = shared.to_vec();
    for param in own {
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(existing) => *existing = param,
            None => merged.push(param),
        }
    }
    merged
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Unique operation identifier
    #[serde(default, rename = "operationId")]
    pub operation_id: Option<String>,

    /// Short summary of the operation
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default, rename = "requestBody")]
    pub request_body: Option<RequestBodySpec>,

    /// Status code (or "default") mapped to the response, in declaration order
    #[serde(default)]
    pub responses: IndexMap<String, ResponseSpec>,

    /// Operation-level server overrides
    #[serde(default)]
    pub servers: Option<Vec<Server>>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: Option<Value>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub examples: Option<IndexMap<String, Example>>,
}

/// A named example object; only `value` participates in resolution
#[derive(Debug, Clone, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default, rename = "externalValue")]
    pub external_value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBodySpec {
    #[serde(default)]
    pub required: bool,

    /// Media type mapped to its body variant, in declaration order
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseSpec {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl ResponseSpec {
    /// Content declared for `content_type`, compared on the media type essence
    pub fn content_for(&self, content_type: &str) -> Option<&MediaType> {
        let wanted = media_type_essence(content_type);
        self.content
            .iter()
            .find(|(media_type, _)| media_type_essence(media_type) == wanted)
            .map(|(_, media)| media)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Value>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub examples: Option<IndexMap<String, Example>>,
}

/// Borrowed (schema, literal example, named examples) triple shared by
/// parameters and media types.
#[derive(Debug, Clone, Copy, Default)]
pub struct Variant<'a> {
    pub schema: Option<&'a Value>,
    pub example: Option<&'a Value>,
    pub examples: Option<&'a IndexMap<String, Example>>,
}

impl<'a> From<&'a Parameter> for Variant<'a> {
    fn from(param: &'a Parameter) -> Self {
        Self {
            schema: param.schema.as_ref(),
            example: param.example.as_ref(),
            examples: param.examples.as_ref(),
        }
    }
}

impl<'a> From<&'a MediaType> for Variant<'a> {
    fn from(media: &'a MediaType) -> Self {
        Self {
            schema: media.schema.as_ref(),
            example: media.example.as_ref(),
            examples: media.examples.as_ref(),
        }
    }
}

/// Lowercased media type without parameters, e.g. `application/json; charset=utf-8`
/// becomes `application/json`
pub fn media_type_essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

impl ApiDocument {
    /// Component schemas, empty when the document declares none
    pub fn component_schemas(&self) -> Option<&IndexMap<String, Value>> {
        self.components.as_ref().map(|c| &c.schemas)
    }

    /// Every (path, method, operation) triple in traversal order
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (path.as_str(), method.as_str(), op))
        })
    }
}
