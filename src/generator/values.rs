//! Concrete values for parameters and bodies
//!
//! Candidates are tried in order and the first one present wins:
//! 1. the schema's `default`
//! 2. the variant's literal `example`
//! 3. the value of the first named entry in `examples`
//! 4. a synthesized value
//!
//! Presence is decided by the key being declared with a non-null value, so
//! `0`, `false` and `""` are honoured as literal examples.

use super::faker::{FakerOptions, SchemaFaker};
use crate::config::GeneratorOptions;
use crate::error::Result;
use crate::models::Variant;
use indexmap::IndexMap;
use serde_json::Value;

/// Resolves one value per variant. Built once per generation run from the
/// merged options and owned by the converter for that run.
pub struct ValueResolver<'a> {
    faker: SchemaFaker<'a>,
}

impl<'a> ValueResolver<'a> {
    pub fn new(schemas: &'a IndexMap<String, Value>, options: &GeneratorOptions) -> Self {
        let faker_options = FakerOptions {
            always_fake_optionals: options.optional_params,
            use_examples_value: options.use_example_values,
            use_default_value: options.use_default_values,
        };
        Self {
            faker: SchemaFaker::new(schemas, faker_options, options.seed),
        }
    }

    /// Resolve a value for `variant`, synthesizing one when nothing is declared
    pub fn resolve(&mut self, variant: Variant<'_>) -> Result<Value> {
        if let Some(value) = schema_default(variant).or_else(|| literal_example(variant)) {
            return Ok(value.clone());
        }

        match variant.schema {
            Some(schema) => self.faker.generate(schema),
            None => Ok(Value::Null),
        }
    }
}

fn schema_default(variant: Variant<'_>) -> Option<&Value> {
    variant
        .schema
        .and_then(|schema| schema.get("default"))
        .filter(|value| !value.is_null())
}

/// The literal example of a variant: `example`, else the first named example.
/// Never synthesizes.
pub fn literal_example(variant: Variant<'_>) -> Option<&Value> {
    variant.example.or_else(|| {
        variant
            .examples
            .and_then(|examples| examples.values().next())
            .and_then(|example| example.value.as_ref())
    })
}
