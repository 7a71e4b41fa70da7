//! Block-style YAML rendering with double-quoted strings
//!
//! Every string scalar is written double-quoted using JSON escaping, which is
//! also valid YAML. Mapping keys stay plain unless YAML would read them as
//! something other than a string.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static PLAIN_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-/]*$").expect("valid key pattern"));

/// Plain scalars YAML resolves to booleans or null
const RESERVED_WORDS: [&str; 11] = [
    "true", "false", "null", "yes", "no", "on", "off", "y", "n", "~", "none",
];

/// Render `value` as a YAML document ending in a newline
pub fn to_yaml_string(value: &Value) -> String {
    let mut text = block_lines(value).join("\n");
    text.push('\n');
    text
}

fn block_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) if !map.is_empty() => {
            let mut lines = Vec::new();
            for (key, item) in map {
                let key = render_key(key);
                if is_block(item) {
                    lines.push(format!("{}:", key));
                    lines.extend(block_lines(item).into_iter().map(|l| format!("  {}", l)));
                } else {
                    lines.push(format!("{}: {}", key, render_scalar(item)));
                }
            }
            lines
        }
        Value::Array(items) if !items.is_empty() => {
            let mut lines = Vec::new();
            for item in items {
                if is_block(item) {
                    let mut nested = block_lines(item).into_iter();
                    if let Some(first) = nested.next() {
                        lines.push(format!("- {}", first));
                    }
                    lines.extend(nested.map(|l| format!("  {}", l)));
                } else {
                    lines.push(format!("- {}", render_scalar(item)));
                }
            }
            lines
        }
        scalar => vec![render_scalar(scalar)],
    }
}

fn is_block(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

fn render_key(key: &str) -> String {
    let reserved = RESERVED_WORDS.contains(&key.to_ascii_lowercase().as_str());
    if PLAIN_KEY.is_match(key) && !reserved {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
