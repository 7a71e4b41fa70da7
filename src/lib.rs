pub mod cli;
pub mod commands;
pub mod config;
pub mod converters;
pub mod error;
pub mod generator;
pub mod loader;
pub mod models;
pub mod output;
pub mod telemetry;

pub use config::GenerateOptions;
pub use error::{Result, WorkflowError};
pub use loader::DocumentSource;
pub use output::OutputFormat;

use converters::{Converter, WorkflowConverter};
use models::WorkflowDocument;
use std::path::Path;

/// Load an OpenAPI document and generate its test workflow
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn generate_workflow(
    source: &DocumentSource,
    options: &GenerateOptions,
) -> Result<WorkflowDocument> {
    let document = loader::load_openapi(source).await?;
    WorkflowConverter::new().convert(&document, options)
}

/// Generate a test workflow and write it to `output`
pub async fn generate_workflow_file(
    source: &DocumentSource,
    output: &Path,
    format: OutputFormat,
    options: &GenerateOptions,
) -> Result<()> {
    let workflow = generate_workflow(source, options).await?;
    output::write_workflow(&workflow, output, format).await
}
