//! Workflow graph compiler.
//!
//! # Compilation Process
//!
//! 1. **Link index**: map every destination slot to its source, once per graph
//! 2. **Node compilation**: for each node in graph order, resolve every input
//!    to a value or a reference against the node's class schema
//! 3. **Exclusion**: leave primitive and annotation nodes out of the prompt
//!
//! The schema registry is fetched lazily on the first class lookup and cached
//! for the rest of the call.

mod cursor;
mod graph;
mod index;
mod node;


pub use self::cursor::{ValueCursor, coerce, matches};
pub use self::graph::{GraphCompiler, is_excluded};
pub use self::index::LinkIndex;

/// Node class whose value is inlined into its consumers.
pub const PRIMITIVE_CLASS: &str = "PrimitiveNode";

/// Node classes that never appear in a compiled prompt.
pub const EXCLUDED_CLASSES: &[&str] = &[PRIMITIVE_CLASS, "Note", "MarkdownNote"];

/// Compiles `graph` against the registry served at `options.base_url`.
///
/// ```rust,no_run
/// # async fn run(graph: promptc_compiler::WorkflowGraph) -> promptc_compiler::Result<()> {
/// use promptc_compiler::{CompileOptions, compile};
///
/// let prompt = compile(&graph, CompileOptions::default()).await?;
/// println!("{}", prompt.to_json()?);
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub async fn compile(
    graph: &crate::WorkflowGraph,
    options: crate::CompileOptions,
) -> crate::Result<crate::CompiledPrompt> {
    let config = promptc_schema::reqwest::RegistryConfig::default();
    GraphCompiler::from_options(options, config)?
        .compile(graph)
        .await
}
