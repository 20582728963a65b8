//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── io: IoConfig                # Workflow, schema file, output
//! ├── compile: CompileOptions     # Base URL, strict types
//! └── registry: RegistryConfig    # HTTP timeout, user agent
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Compile against a running backend
//! promptc --workflow graph.json --base-url http://127.0.0.1:8188
//!
//! # Or via environment variables
//! PROMPTC_WORKFLOW=graph.json PROMPTC_BASE_URL=http://gpu-box:8188 promptc
//! ```

mod io;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use io::IoConfig;
use promptc_compiler::CompileOptions;
use promptc_schema::reqwest::RegistryConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups of the compiler:
/// - [`IoConfig`]: where the workflow comes from and the prompt goes
/// - [`CompileOptions`]: backend location and strictness
/// - [`RegistryConfig`]: HTTP client settings for the schema registry
#[derive(Debug, Clone, Parser)]
#[command(name = "promptc")]
#[command(about = "Compiles editor workflow graphs into execution-ready prompts")]
#[command(version)]
pub struct Cli {
    /// Input and output locations.
    #[clap(flatten)]
    pub io: IoConfig,

    /// Compile options.
    #[clap(flatten)]
    pub compile: CompileOptions,

    /// Schema registry client configuration.
    #[clap(flatten)]
    pub registry: RegistryConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its variables
    /// act as defaults for options that read from the environment.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.io.validate().context("invalid I/O configuration")?;
        self.compile
            .validate()
            .context("invalid compile options")?;
        Ok(())
    }

    /// Returns whether the registry is read from a saved file.
    pub fn is_offline(&self) -> bool {
        self.io.schema_file.is_some()
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.io.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.compile.base_url,
            strict_types = self.compile.strict_types,
            fill_defaults = self.compile.fill_defaults,
            offline = self.is_offline(),
            "Compile configuration"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            http_timeout_ms = self.registry.effective_timeout().as_millis(),
            user_agent = %self.registry.effective_user_agent(),
            "Registry client configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "json-logs").then_some("json-logs"),
            cfg!(feature = "dotenv").then_some("dotenv"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
