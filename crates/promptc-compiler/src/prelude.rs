//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types for ergonomic imports:
//!
//! ```rust
//! use promptc_compiler::prelude::*;
//! ```

pub use crate::compiler::GraphCompiler;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::options::CompileOptions;
pub use crate::prompt::{CompiledNode, CompiledPrompt, NodeRef, ResolvedInput};
pub use crate::workflow::{GraphNode, InputSocket, Link, NodeId, ValueBuffer, WorkflowGraph};
pub use promptc_schema::{ClassSchema, SchemaSource, StaticSchemaSource, TypeDecl};
