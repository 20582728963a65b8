#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod io;
mod telemetry;

use std::process;

use anyhow::Context;
use promptc_compiler::{CompiledPrompt, GraphCompiler, WorkflowGraph};
use promptc_schema::StaticSchemaSource;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "promptc_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "promptc_cli::config";
pub const TRACING_TARGET_COMPILE: &str = "promptc_cli::compile";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_COMPILE,
            error = %format!("{error:#}"),
            "compilation failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();
    cli.validate()?;

    let workflow = io::read_workflow(cli.io.workflow_path()).await?;
    let prompt = compile(&cli, &workflow).await?;
    io::write_prompt(&prompt, cli.io.output_path(), cli.io.pretty).await?;

    Ok(())
}

/// Compiles the workflow against a saved registry file or the backend.
async fn compile(cli: &Cli, workflow: &WorkflowGraph) -> anyhow::Result<CompiledPrompt> {
    let prompt = match &cli.io.schema_file {
        Some(path) => {
            let source = StaticSchemaSource::from_file(path)
                .await
                .with_context(|| format!("failed to load schema file {}", path.display()))?;

            tracing::info!(
                target: TRACING_TARGET_COMPILE,
                path = %path.display(),
                classes = source.catalog().len(),
                "Using saved schema registry"
            );

            GraphCompiler::new(source, cli.compile.clone())
                .compile(workflow)
                .await
        }
        None => GraphCompiler::from_options(cli.compile.clone(), cli.registry.clone())
            .context("failed to create registry client")?
            .compile(workflow)
            .await,
    };

    prompt.context("failed to compile workflow")
}
