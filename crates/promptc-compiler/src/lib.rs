#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod classify;
pub mod compiler;
mod error;
mod options;
pub mod prompt;
pub mod workflow;

#[doc(hidden)]
pub mod prelude;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub use compiler::compile;
pub use compiler::{EXCLUDED_CLASSES, GraphCompiler, PRIMITIVE_CLASS};
pub use error::{Error, ErrorKind, Result};
pub use options::{CompileOptions, CompileOptionsBuilder, DEFAULT_BASE_URL};
pub use prompt::{CompiledNode, CompiledPrompt, NodeRef, ResolvedInput};
pub use workflow::WorkflowGraph;

/// Tracing target for compiler operations.
pub const TRACING_TARGET: &str = "promptc_compiler";
