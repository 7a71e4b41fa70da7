//! Schema-driven fake data
//!
//! Produces a value satisfying a JSON schema. `$ref`s are resolved against the
//! document's component schemas by their `#/components/schemas/<name>` pointer.
//! All randomness comes from one seeded generator, so a fixed seed yields the
//! same values for the same sequence of calls.

use crate::error::{Result, WorkflowError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Number, Value};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Value produced for any `format: binary` string
pub const BINARY_PLACEHOLDER: &str = "file.txt";

/// Nested `$ref` hops followed before giving up on a branch
const MAX_REF_DEPTH: usize = 8;

/// Ceiling applied to `minLength`/`maxLength` of synthesized strings
const MAX_STRING_LENGTH: usize = 1024;

/// Ceiling applied to `minItems`/`maxItems` of synthesized arrays
const MAX_ARRAY_ITEMS: usize = 64;

const WORDS: [&str; 16] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "labore", "magna", "aliqua",
];

#[derive(Debug, Clone, Copy)]
pub struct FakerOptions {
    /// Populate every optional object property
    pub always_fake_optionals: bool,
    /// Use a schema's own `example` instead of random data
    pub use_examples_value: bool,
    /// Use a schema's own `default` instead of random data
    pub use_default_value: bool,
}

pub struct SchemaFaker<'a> {
    schemas: &'a IndexMap<String, Value>,
    options: FakerOptions,
    rng: StdRng,
}

impl<'a> SchemaFaker<'a> {
    pub fn new(schemas: &'a IndexMap<String, Value>, options: FakerOptions, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            schemas,
            options,
            rng,
        }
    }

    /// Generate a value for `schema`
    pub fn generate(&mut self, schema: &Value) -> Result<Value> {
        self.fake(schema, 0)
    }

    fn fake(&mut self, schema: &Value, depth: usize) -> Result<Value> {
        let Some(obj) = schema.as_object() else {
            // `true`/`{}` style schemas accept anything
            return Ok(Value::Null);
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            if depth >= MAX_REF_DEPTH {
                return Ok(Value::Null);
            }
            let target = self.lookup(reference)?;
            return self.fake(target, depth + 1);
        }

        if self.options.use_default_value
            && let Some(default) = obj.get("default")
        {
            return Ok(default.clone());
        }

        if self.options.use_examples_value {
            if let Some(example) = obj.get("example") {
                return Ok(example.clone());
            }
            if let Some(first) = obj.get("examples").and_then(Value::as_array).and_then(|a| a.first()) {
                return Ok(first.clone());
            }
        }

        if let Some(constant) = obj.get("const") {
            return Ok(constant.clone());
        }

        if let Some(choices) = obj.get("enum").and_then(Value::as_array)
            && let Some(choice) = choices.choose(&mut self.rng)
        {
            return Ok(choice.clone());
        }

        if let Some(parts) = obj.get("allOf").and_then(Value::as_array) {
            return self.fake_all_of(parts, depth);
        }

        for key in ["oneOf", "anyOf"] {
            if let Some(options) = obj.get(key).and_then(Value::as_array)
                && !options.is_empty()
            {
                let index = self.rng.gen_range(0..options.len());
                return self.fake(&options[index], depth);
            }
        }

        match schema_type(obj).as_deref() {
            Some("string") => Ok(Value::String(self.fake_string(obj))),
            Some("integer") => Ok(Value::from(self.fake_integer(obj))),
            Some("number") => Ok(self.fake_number(obj)),
            Some("boolean") => Ok(Value::Bool(self.rng.gen_bool(0.5))),
            Some("array") => self.fake_array(obj, depth),
            Some("object") => self.fake_object(obj, depth),
            _ => Ok(Value::Null),
        }
    }

    /// Resolve a schema pointer, including nested pointers such as
    /// `#/components/schemas/Pet/properties/name`
    fn lookup(&self, reference: &str) -> Result<&'a Value> {
        let unresolved = || WorkflowError::UnresolvedReference(reference.to_string());

        let rest = reference.strip_prefix(SCHEMA_REF_PREFIX).ok_or_else(unresolved)?;
        let (name, pointer) = match rest.split_once('/') {
            Some((name, pointer)) => (name, Some(pointer)),
            None => (rest, None),
        };

        let name = unescape_pointer_token(name);
        let schema = self.schemas.get(&name).ok_or_else(unresolved)?;

        match pointer {
            Some(pointer) => schema.pointer(&format!("/{}", pointer)).ok_or_else(unresolved),
            None => Ok(schema),
        }
    }

    fn fake_all_of(&mut self, parts: &[Value], depth: usize) -> Result<Value> {
        let mut merged = Map::new();
        let mut last = Value::Null;

        for part in parts {
            match self.fake(part, depth)? {
                Value::Object(map) => merged.extend(map),
                other => last = other,
            }
        }

        if merged.is_empty() {
            Ok(last)
        } else {
            Ok(Value::Object(merged))
        }
    }

    fn fake_string(&mut self, obj: &Map<String, Value>) -> String {
        let format = obj.get("format").and_then(Value::as_str).unwrap_or_default();

        match format {
            "binary" => return BINARY_PLACEHOLDER.to_string(),
            "date-time" => {
                let (date, time) = (self.fake_date(), self.fake_time());
                return format!("{}T{}Z", date, time);
            }
            "date" => return self.fake_date(),
            "time" => return self.fake_time(),
            "email" => return format!("{}@example.com", self.word()),
            "uuid" => {
                let bytes: [u8; 16] = self.rng.r#gen();
                return uuid::Builder::from_random_bytes(bytes).into_uuid().to_string();
            }
            "uri" | "url" => return format!("https://example.com/{}", self.word()),
            "hostname" => return format!("{}.example.com", self.word()),
            "ipv4" => {
                let octets: [u8; 4] = self.rng.r#gen();
                return format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3]);
            }
            "byte" => {
                let word = self.word();
                return BASE64.encode(word.as_bytes());
            }
            _ => {}
        }

        let min = bounded(obj, "minLength", MAX_STRING_LENGTH).unwrap_or(0);
        let max = bounded(obj, "maxLength", MAX_STRING_LENGTH)
            .unwrap_or(MAX_STRING_LENGTH)
            .max(min);

        let mut text = self.word();
        while text.len() < min {
            text.push(' ');
            text.push_str(&self.word());
        }
        text.truncate(max);
        text
    }

    fn fake_date(&mut self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.rng.gen_range(2000..=2030),
            self.rng.gen_range(1..=12),
            self.rng.gen_range(1..=28)
        )
    }

    fn fake_time(&mut self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.rng.gen_range(0..24),
            self.rng.gen_range(0..60),
            self.rng.gen_range(0..60)
        )
    }

    fn word(&mut self) -> String {
        WORDS.choose(&mut self.rng).copied().unwrap_or("lorem").to_string()
    }

    fn fake_integer(&mut self, obj: &Map<String, Value>) -> i64 {
        let (min, max) = numeric_bounds(obj);
        let mut low = min.map(|m| m.ceil() as i64).unwrap_or(0);
        let mut high = max.map(|m| m.floor() as i64).unwrap_or(low.saturating_add(1000));
        if exclusive(obj, "exclusiveMinimum", min) {
            low = low.saturating_add(1);
        }
        if exclusive(obj, "exclusiveMaximum", max) {
            high = high.saturating_sub(1);
        }
        if min.is_none() && max.is_some() {
            low = high.saturating_sub(1000);
        }
        if high < low {
            return low;
        }

        let value = self.rng.gen_range(low..=high);
        match obj.get("multipleOf").and_then(Value::as_i64) {
            Some(step) if step > 0 => {
                let rounded = (value / step) * step;
                if rounded < low { rounded + step } else { rounded }
            }
            _ => value,
        }
    }

    fn fake_number(&mut self, obj: &Map<String, Value>) -> Value {
        let (min, max) = numeric_bounds(obj);
        let (low, high) = match (min, max) {
            (Some(low), Some(high)) => (low, high),
            (Some(low), None) => (low, low + 1000.0),
            (None, Some(high)) => (high - 1000.0, high),
            (None, None) => (0.0, 1000.0),
        };
        if high <= low {
            return Number::from_f64(low).map(Value::Number).unwrap_or(Value::Null);
        }

        // The span of two extreme bounds overflows to infinity
        let span = (high - low).min(f64::MAX / 2.0);
        let mut value = low + self.rng.r#gen::<f64>() * span;
        if exclusive(obj, "exclusiveMinimum", min) && value <= low {
            value = low + span / 2.0;
        }

        let rounded = (value * 100.0).round() / 100.0;
        let in_bounds = rounded.is_finite()
            && rounded >= low
            && rounded <= high
            && !(exclusive(obj, "exclusiveMinimum", min) && rounded <= low)
            && !(exclusive(obj, "exclusiveMaximum", max) && rounded >= high);
        let value = if in_bounds { rounded } else { value };
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }

    fn fake_array(&mut self, obj: &Map<String, Value>, depth: usize) -> Result<Value> {
        let min = bounded(obj, "minItems", MAX_ARRAY_ITEMS).unwrap_or(1);
        let max = bounded(obj, "maxItems", MAX_ARRAY_ITEMS)
            .unwrap_or((min + 2).min(MAX_ARRAY_ITEMS))
            .max(min);
        let count = self.rng.gen_range(min..=max);

        let Some(items) = obj.get("items") else {
            return Ok(Value::Array(Vec::new()));
        };

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.fake(items, depth)?);
        }
        Ok(Value::Array(values))
    }

    fn fake_object(&mut self, obj: &Map<String, Value>, depth: usize) -> Result<Value> {
        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut result = Map::new();
        if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
            for (name, property) in properties {
                let include = required.contains(&name.as_str())
                    || self.options.always_fake_optionals
                    || self.rng.gen_bool(0.5);
                if include {
                    result.insert(name.clone(), self.fake(property, depth)?);
                }
            }
        }
        Ok(Value::Object(result))
    }
}

/// Declared type, inferred from the schema shape when absent. For type lists
/// (`["string", "null"]`) the first non-null entry wins.
fn schema_type(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("type") {
        Some(Value::String(t)) => Some(t.clone()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .map(str::to_string),
        _ if obj.contains_key("properties") => Some("object".to_string()),
        _ if obj.contains_key("items") => Some("array".to_string()),
        _ => None,
    }
}

fn numeric_bounds(obj: &Map<String, Value>) -> (Option<f64>, Option<f64>) {
    // 3.1 documents carry the bound in exclusiveMinimum/exclusiveMaximum itself
    let min = obj
        .get("minimum")
        .and_then(Value::as_f64)
        .or_else(|| obj.get("exclusiveMinimum").and_then(Value::as_f64));
    let max = obj
        .get("maximum")
        .and_then(Value::as_f64)
        .or_else(|| obj.get("exclusiveMaximum").and_then(Value::as_f64));
    (min, max)
}

/// A length keyword clamped to `ceiling`
fn bounded(obj: &Map<String, Value>, key: &str, ceiling: usize) -> Option<usize> {
    obj.get(key)
        .and_then(Value::as_u64)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX).min(ceiling))
}

fn exclusive(obj: &Map<String, Value>, key: &str, bound: Option<f64>) -> bool {
    match obj.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(_)) => bound.is_some(),
        _ => false,
    }
}

fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}
