//! Inlining of internal `$ref`s to reusable components
//!
//! Parameters, request bodies, responses, examples and headers referenced
//! from `#/components/...` are replaced by a copy of their target. Schema
//! references are left untouched: they are resolved during value synthesis
//! and kept verbatim in response checks.

use crate::error::{Result, WorkflowError};
use serde_json::Value;

const INLINED_SECTIONS: [&str; 5] = [
    "#/components/parameters/",
    "#/components/requestBodies/",
    "#/components/responses/",
    "#/components/examples/",
    "#/components/headers/",
];

/// Chained references followed before the document is rejected as cyclic
const MAX_DEPTH: usize = 32;

/// Replace every inlinable `$ref` under `paths` with its target
pub fn inline_component_refs(document: &mut Value) -> Result<()> {
    let root = document.clone();
    if let Some(paths) = document.get_mut("paths") {
        inline(paths, &root, 0)?;
    }
    Ok(())
}

fn inline(value: &mut Value, root: &Value, depth: usize) -> Result<()> {
    if let Some(reference) = inlinable_ref(value) {
        if depth >= MAX_DEPTH {
            return Err(WorkflowError::OpenApiLoadError(format!(
                "Reference chain too deep at {}",
                reference
            )));
        }

        let pointer = reference.trim_start_matches('#');
        let target = root.pointer(pointer).cloned().ok_or_else(|| {
            WorkflowError::OpenApiLoadError(format!("Unresolvable reference: {}", reference))
        })?;

        *value = target;
        return inline(value, root, depth + 1);
    }

    match value {
        Value::Object(map) => {
            for item in map.values_mut() {
                inline(item, root, depth)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                inline(item, root, depth)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn inlinable_ref(value: &Value) -> Option<String> {
    let reference = value.get("$ref")?.as_str()?;
    INLINED_SECTIONS
        .iter()
        .any(|section| reference.starts_with(section))
        .then(|| reference.to_string())
}
