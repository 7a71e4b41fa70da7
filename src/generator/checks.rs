//! Response assertions attached to a step

use super::values::literal_example;
use crate::config::{GenerateOptions, ResponseSelection};
use crate::models::openapi::ResponseSpec;
use crate::models::{Check, Operation, Variant};

/// Status key checked when only the success response is considered
pub const SUCCESS_STATUS: &str = "200";

/// Derive the check block for `operation`.
///
/// Returns `None` when no response entry is selected or when every enabled
/// assertion came out empty.
pub fn compose_checks(operation: &Operation, options: &GenerateOptions) -> Option<Check> {
    let (status_key, response) = select_response(operation, options.check.response_selection)?;
    let mut check = Check::default();

    if options.check.status {
        // "default" and range keys such as "2XX" carry no single status code
        check.status = status_key.parse::<u16>().ok();
    }

    if let Some(content) = response.content_for(&options.content_type) {
        if options.check.schema {
            check.schema = content.schema.clone();
        }
        if options.check.examples {
            check.json = literal_example(Variant::from(content)).cloned();
        }
    }

    (!check.is_empty()).then_some(check)
}

fn select_response(
    operation: &Operation,
    selection: ResponseSelection,
) -> Option<(&str, &ResponseSpec)> {
    match selection {
        ResponseSelection::Success => operation
            .responses
            .get_key_value(SUCCESS_STATUS)
            .map(|(key, response)| (key.as_str(), response)),
        ResponseSelection::First => operation
            .responses
            .first()
            .map(|(key, response)| (key.as_str(), response)),
    }
}
