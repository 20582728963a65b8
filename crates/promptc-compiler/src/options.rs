//! Compile options.

#[cfg(feature = "config")]
use clap::{ArgAction, Args};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Base URL of a locally running execution backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8188";

/// Options of one compile call.
///
/// ```rust
/// use promptc_compiler::CompileOptions;
///
/// let options = CompileOptions::builder()
///     .base_url("http://gpu-box:8188")
///     .strict_types(false)
///     .build()
///     .unwrap();
/// assert!(!options.strict_types);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Base URL of the backend serving the schema registry.
    #[cfg_attr(
        feature = "config",
        arg(long = "base-url", env = "PROMPTC_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[builder(default = "DEFAULT_BASE_URL.to_owned()")]
    #[serde(alias = "base_url")]
    pub base_url: String,

    /// Validate resolved values and reject missing required inputs.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "strict-types",
            env = "PROMPTC_STRICT_TYPES",
            default_value_t = true,
            action = ArgAction::Set
        )
    )]
    #[builder(default = "true")]
    #[serde(alias = "strict_types")]
    pub strict_types: bool,

    /// Reserved for broader default synthesis; currently has no effect.
    #[cfg_attr(
        feature = "config",
        arg(long = "fill-defaults", env = "PROMPTC_FILL_DEFAULTS")
    )]
    #[builder(default = "false")]
    #[serde(alias = "fill_defaults")]
    pub fill_defaults: bool,
}

impl CompileOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(base_url) = &self.base_url
            && base_url.trim().is_empty()
        {
            return Err("base_url must not be empty".into());
        }
        Ok(())
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            strict_types: true,
            fill_defaults: false,
        }
    }
}

impl CompileOptions {
    /// Creates options for the backend at `base_url`, with defaults otherwise.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Returns a builder for compile options.
    pub fn builder() -> CompileOptionsBuilder {
        CompileOptionsBuilder::default()
    }

    /// Sets the backend base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enables or disables strict type checking.
    #[must_use]
    pub fn with_strict_types(mut self, strict_types: bool) -> Self {
        self.strict_types = strict_types;
        self
    }

    /// Enables or disables default synthesis.
    #[must_use]
    pub fn with_fill_defaults(mut self, fill_defaults: bool) -> Self {
        self.fill_defaults = fill_defaults;
        self
    }

    /// Checks the options before a compile.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidOptions("base_url must not be empty".into()));
        }
        Ok(())
    }
}
