//! Generate command implementation
//!
//! Loads an OpenAPI document, converts it into a test workflow and writes the
//! result to a file or stdout. Status lines go to stderr so stdout stays clean.

use crate::config::GenerateOptions;
use crate::converters::{Converter, WorkflowConverter};
use crate::error::Result;
use crate::loader::{DocumentSource, load_openapi};
use crate::output::{self, OutputFormat};
use colored::Colorize;
use serde_json::Value;
use std::path::Path;

/// Inputs of the generate command
pub struct GenerateCommandArgs<'a> {
    pub source: &'a DocumentSource,
    /// Output file, stdout when absent
    pub output: Option<&'a Path>,
    /// Options file merged onto the defaults
    pub config: Option<&'a Path>,
    /// Command-line options merged last
    pub overrides: &'a Value,
    pub format: OutputFormat,
}

/// Execute the generate command
pub async fn execute_generate(args: GenerateCommandArgs<'_>) -> Result<()> {
    let base = match args.config {
        Some(path) => {
            let options = GenerateOptions::from_file(path)?;
            eprintln!("{} Loaded options: {}", "✓".green(), path.display());
            options
        }
        None => GenerateOptions::default(),
    };
    let options = base.merge(args.overrides)?;

    let document = load_openapi(args.source).await?;
    eprintln!(
        "{} Loaded OpenAPI document: {}",
        "✓".green(),
        args.source
    );

    let workflow = WorkflowConverter::new().convert(&document, &options)?;
    eprintln!(
        "{} Generated {} steps in {} suites",
        "✓".green(),
        workflow.step_count(),
        workflow.tests.len()
    );

    match args.output {
        Some(path) => {
            output::write_workflow(&workflow, path, args.format).await?;
            eprintln!(
                "{} Workflow written to: {}",
                "✓".green(),
                path.display().to_string().bold()
            );
        }
        None => print!("{}", output::render(&workflow, args.format)?),
    }

    Ok(())
}
