//! Serialization of generated workflows

pub mod yaml;

use crate::error::Result;
use crate::models::WorkflowDocument;
use std::path::Path;

/// Text format a workflow is written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Render a workflow document as text
pub fn render(workflow: &WorkflowDocument, format: OutputFormat) -> Result<String> {
    let value = serde_json::to_value(workflow)?;
    match format {
        OutputFormat::Yaml => Ok(yaml::to_yaml_string(&value)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
    }
}

/// Render a workflow document and write it to `path`
pub async fn write_workflow(
    workflow: &WorkflowDocument,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let content = render(workflow, format)?;
    tokio::fs::write(path, content).await?;
    tracing::info!(path = %path.display(), "Workflow written");
    Ok(())
}
