use anyhow::Context;
use clap::Parser;
use oas_workflow::{
    DocumentSource,
    cli::{Cli, Commands},
    commands::{self, GenerateCommandArgs},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let source = DocumentSource::parse(&args.input);
            let overrides = args.option_overrides();
            commands::execute_generate(GenerateCommandArgs {
                source: &source,
                output: args.output.as_deref(),
                config: args.config.as_deref(),
                overrides: &overrides,
                format: args.format.into(),
            })
            .await
            .with_context(|| format!("Failed to generate workflow from {}", source))?;
        }
        Commands::List { input } => {
            let source = DocumentSource::parse(&input);
            commands::execute_list(&source)
                .await
                .with_context(|| format!("Failed to list operations of {}", source))?;
        }
    }

    Ok(())
}
