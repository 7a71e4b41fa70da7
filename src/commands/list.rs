use crate::config::GenerateOptions;
use crate::converters::{Converter, WorkflowConverter};
use crate::loader::{DocumentSource, load_openapi};
use crate::Result;
use colored::*;
use serde_json::json;

/// Print the suites and steps a document would generate, without synthesized payloads
pub async fn execute_list(source: &DocumentSource) -> Result<()> {
    println!("{}", "Loading OpenAPI document...".bright_blue());
    println!("  Source: {}", source);

    let document = load_openapi(source).await?;

    println!("\n{}", "✓ OpenAPI document loaded successfully".green());
    println!("  Title: {}", document.info.title.bold());
    println!("  Version: {}", document.info.version.as_deref().unwrap_or("-"));
    println!("  OpenAPI Version: {}", document.openapi);
    if let Some(server) = document.servers.first() {
        println!("  Base URL: {}", server.url);
    }
    println!();

    // Templates only: no placeholder substitution, bodies or checks
    let options = GenerateOptions::merged(&json!({
        "generator": { "pathParams": false, "requestBody": false, "optionalParams": false },
        "check": { "status": false, "examples": false, "schema": false }
    }))?;
    let workflow = WorkflowConverter::new().convert(&document, &options)?;

    if workflow.step_count() == 0 {
        println!("{}", "No operations found".yellow());
        return Ok(());
    }

    println!("{}", format!("Suites ({}):", workflow.tests.len()).bold());
    for (idx, (key, suite)) in workflow.tests.iter().enumerate() {
        println!();
        println!(
            "  {}. {} {} ({})",
            idx + 1,
            "Suite:".bright_cyan(),
            suite.name.bold(),
            key
        );
        println!("     Steps: {}", suite.steps.len());

        for (step_idx, step) in suite.steps.iter().enumerate() {
            println!(
                "       {}. {} {}",
                step_idx + 1,
                step.http.method.bright_yellow(),
                step.http.url
            );

            if let Some(ref id) = step.id {
                println!("          Operation: {}", id.cyan());
            }
            if let Some(ref name) = step.name {
                println!("          Summary: {}", name);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_document_without_operations() {
        let source = DocumentSource::Inline(
            r#"{ "openapi": "3.1.0", "info": { "title": "Empty", "version": "0.1.0" }, "paths": {} }"#
                .to_string(),
        );

        assert!(execute_list(&source).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_fixture() {
        let source = DocumentSource::parse("tests/fixtures/petstore.yaml");
        assert!(execute_list(&source).await.is_ok());
    }
}
