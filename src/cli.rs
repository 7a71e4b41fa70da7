use crate::config::{FallbackSuitePolicy, ResponseSelection};
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oas-workflow")]
#[command(version)]
#[command(about = "Generate API test workflows from OpenAPI documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a test workflow from an OpenAPI document
    Generate(GenerateArgs),

    /// List the operations of an OpenAPI document by suite
    List {
        /// Path or http(s) URL of the OpenAPI document
        #[arg(short, long)]
        input: String,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path or http(s) URL of the OpenAPI document
    #[arg(short, long)]
    pub input: String,

    /// Output file (stdout if not specified)
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,

    /// YAML or JSON file with generation options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: FormatArg,

    /// Target content type for request bodies and response checks
    #[arg(long)]
    pub content_type: Option<String>,

    /// Seed for synthesized values
    #[arg(long)]
    pub seed: Option<u64>,

    /// Leave path placeholders unsubstituted
    #[arg(long)]
    pub no_path_params: bool,

    /// Do not synthesize request bodies
    #[arg(long)]
    pub no_request_body: bool,

    /// Only include required parameters and bodies
    #[arg(long)]
    pub required_only: bool,

    /// Ignore schema examples while synthesizing
    #[arg(long)]
    pub no_example_values: bool,

    /// Ignore schema defaults while synthesizing
    #[arg(long)]
    pub no_default_values: bool,

    /// Embed component schemas even without schema checks
    #[arg(long)]
    pub inline_schema: bool,

    /// Do not check response status codes
    #[arg(long)]
    pub no_check_status: bool,

    /// Do not check response schemas
    #[arg(long)]
    pub no_check_schema: bool,

    /// Do not check response examples
    #[arg(long)]
    pub no_check_examples: bool,

    /// Which declared response the checks are derived from
    #[arg(long)]
    pub response_selection: Option<SelectionArg>,

    /// When the suite for untagged operations is created
    #[arg(long)]
    pub fallback_suite: Option<FallbackArg>,
}

impl GenerateArgs {
    /// Options set on the command line, as a partial options object for deep merging
    pub fn option_overrides(&self) -> Value {
        let mut generator = Map::new();
        let mut check = Map::new();
        let mut root = Map::new();

        let disable = |map: &mut Map<String, Value>, flag: bool, key: &str| {
            if flag {
                map.insert(key.to_string(), json!(false));
            }
        };
        disable(&mut generator, self.no_path_params, "pathParams");
        disable(&mut generator, self.no_request_body, "requestBody");
        disable(&mut generator, self.required_only, "optionalParams");
        disable(&mut generator, self.no_example_values, "useExampleValues");
        disable(&mut generator, self.no_default_values, "useDefaultValues");
        disable(&mut check, self.no_check_status, "status");
        disable(&mut check, self.no_check_schema, "schema");
        disable(&mut check, self.no_check_examples, "examples");

        if self.inline_schema {
            generator.insert("inlineSchema".to_string(), json!(true));
        }
        if let Some(seed) = self.seed {
            generator.insert("seed".to_string(), json!(seed));
        }
        if let Some(policy) = self.fallback_suite {
            generator.insert("fallbackSuite".to_string(), json!(FallbackSuitePolicy::from(policy)));
        }
        if let Some(selection) = self.response_selection {
            check.insert(
                "responseSelection".to_string(),
                json!(ResponseSelection::from(selection)),
            );
        }
        if let Some(content_type) = &self.content_type {
            root.insert("contentType".to_string(), json!(content_type));
        }

        if !generator.is_empty() {
            root.insert("generator".to_string(), Value::Object(generator));
        }
        if !check.is_empty() {
            root.insert("check".to_string(), Value::Object(check));
        }
        Value::Object(root)
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// YAML with double-quoted strings
    Yaml,
    /// JSON format
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SelectionArg {
    /// Only the "200" response
    Success,
    /// The first declared response
    First,
}

impl From<SelectionArg> for ResponseSelection {
    fn from(selection: SelectionArg) -> Self {
        match selection {
            SelectionArg::Success => ResponseSelection::Success,
            SelectionArg::First => ResponseSelection::First,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FallbackArg {
    /// Always present when the document declares no tags
    Eager,
    /// Created on the first untagged operation
    Lazy,
}

impl From<FallbackArg> for FallbackSuitePolicy {
    fn from(policy: FallbackArg) -> Self {
        match policy {
            FallbackArg::Eager => FallbackSuitePolicy::Eager,
            FallbackArg::Lazy => FallbackSuitePolicy::Lazy,
        }
    }
}
