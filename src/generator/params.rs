//! Maps an operation's parameters onto the URL, query, headers and cookies

use super::values::ValueResolver;
use crate::config::GenerateOptions;
use crate::error::Result;
use crate::models::{Operation, ParameterLocation, Variant};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}/]+\}").expect("valid placeholder pattern"));

/// Parameters bound for one step. Maps stay `None` until a parameter of that
/// location is bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParameters {
    pub url: String,
    pub query: Option<IndexMap<String, Value>>,
    pub headers: Option<IndexMap<String, Value>>,
    pub cookies: Option<IndexMap<String, Value>>,
}

/// Bind the parameters of `operation` onto `url_template`
pub fn bind(
    operation: &Operation,
    url_template: &str,
    resolver: &mut ValueResolver<'_>,
    options: &GenerateOptions,
) -> Result<BoundParameters> {
    let mut bound = BoundParameters {
        url: url_template.to_string(),
        ..Default::default()
    };

    let retained = operation
        .parameters
        .iter()
        .filter(|param| options.generator.optional_params || param.required);

    for param in retained {
        if param.location == ParameterLocation::Unknown {
            tracing::debug!(parameter = %param.name, "Ignoring parameter with unrecognized location");
            continue;
        }

        let value = resolver.resolve(Variant::from(param))?;

        match param.location {
            ParameterLocation::Path => {
                if options.generator.path_params {
                    let placeholder = format!("{{{}}}", param.name);
                    bound.url = bound.url.replace(&placeholder, &path_segment(&value));
                }
            }
            ParameterLocation::Query => {
                bound
                    .query
                    .get_or_insert_with(IndexMap::new)
                    .insert(param.name.clone(), value);
            }
            ParameterLocation::Header => {
                bound
                    .headers
                    .get_or_insert_with(IndexMap::new)
                    .insert(param.name.clone(), value);
            }
            ParameterLocation::Cookie => {
                bound
                    .cookies
                    .get_or_insert_with(IndexMap::new)
                    .insert(param.name.clone(), value);
            }
            ParameterLocation::Unknown => {}
        }
    }

    if options.generator.path_params && PLACEHOLDER.is_match(&bound.url) {
        tracing::warn!(url = %bound.url, "URL still contains unresolved path placeholders");
    }

    Ok(bound)
}

/// Text substituted for a path placeholder: strings verbatim, anything else as JSON
fn path_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
