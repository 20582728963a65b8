//! Input and output locations.

use std::path::{Path, PathBuf};

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;

use crate::TRACING_TARGET_CONFIG;

/// Path value standing for stdin or stdout.
pub const STDIO_PATH: &str = "-";

/// Where the workflow is read from and the prompt is written to.
///
/// # Environment Variables
///
/// - `PROMPTC_WORKFLOW` - Workflow JSON file, `-` for stdin (default: `-`)
/// - `PROMPTC_SCHEMA_FILE` - Saved registry payload used instead of the backend
/// - `PROMPTC_OUTPUT` - Prompt JSON file, `-` for stdout (default: `-`)
///
/// # Examples
///
/// ```bash
/// promptc --workflow graph.json --output prompt.json --pretty
/// cat graph.json | promptc --schema-file object_info.json
/// ```
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct IoConfig {
    /// Workflow graph to compile, as saved by the editor.
    #[arg(short = 'w', long, env = "PROMPTC_WORKFLOW", default_value = STDIO_PATH)]
    pub workflow: PathBuf,

    /// Registry payload saved from `GET /object_info`.
    ///
    /// When set, the backend is not contacted and `--base-url` is ignored.
    #[arg(short = 's', long, env = "PROMPTC_SCHEMA_FILE")]
    pub schema_file: Option<PathBuf>,

    /// File the compiled prompt is written to.
    #[arg(short = 'o', long, env = "PROMPTC_OUTPUT", default_value = STDIO_PATH)]
    pub output: PathBuf,

    /// Pretty-print the compiled prompt.
    #[arg(long)]
    pub pretty: bool,
}

impl IoConfig {
    /// Returns the workflow path, or `None` for stdin.
    pub fn workflow_path(&self) -> Option<&Path> {
        file_path(&self.workflow)
    }

    /// Returns the output path, or `None` for stdout.
    pub fn output_path(&self) -> Option<&Path> {
        file_path(&self.output)
    }

    /// Validates the configured paths.
    pub fn validate(&self) -> AnyhowResult<()> {
        if let Some(path) = &self.schema_file
            && path.as_os_str() == STDIO_PATH
        {
            return Err(anyhow!("schema file cannot be read from stdin"));
        }

        if let (Some(workflow), Some(output)) = (self.workflow_path(), self.output_path())
            && workflow == output
        {
            return Err(anyhow!(
                "output {} would overwrite the workflow",
                output.display()
            ));
        }

        Ok(())
    }

    /// Logs the configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            workflow = %self.workflow.display(),
            schema_file = ?self.schema_file,
            output = %self.output.display(),
            pretty = self.pretty,
            "I/O configuration"
        );
    }
}

fn file_path(path: &Path) -> Option<&Path> {
    (path.as_os_str() != STDIO_PATH).then_some(path)
}
