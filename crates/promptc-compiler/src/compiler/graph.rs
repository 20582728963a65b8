//! Whole-graph compilation.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use promptc_schema::{ClassSchema, SchemaRegistry, SchemaSource};

use super::index::LinkIndex;
use super::node::NodeCompiler;
use super::EXCLUDED_CLASSES;
use crate::prompt::CompiledPrompt;
use crate::workflow::{GraphNode, NodeId, WorkflowGraph};
use crate::{CompileOptions, Result, TRACING_TARGET};

/// Compiles workflow graphs into prompts.
///
/// Each call to [`compile`](Self::compile) owns its own registry cache, so
/// concurrent calls never share schema state. Nodes are compiled strictly one
/// after another in graph order.
#[derive(Debug, Clone)]
pub struct GraphCompiler<S> {
    source: S,
    options: CompileOptions,
}

impl<S: SchemaSource> GraphCompiler<S> {
    /// Creates a compiler reading class schemas from `source`.
    pub fn new(source: S, options: CompileOptions) -> Self {
        Self { source, options }
    }

    /// Returns the compile options.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Returns the schema source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Compiles a graph.
    ///
    /// The first error aborts the compile; no partial prompt is returned.
    pub async fn compile(&self, graph: &WorkflowGraph) -> Result<CompiledPrompt> {
        self.options.validate()?;

        let started_at = Instant::now();
        tracing::info!(
            target: TRACING_TARGET,
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            strict_types = self.options.strict_types,
            "Compiling workflow"
        );

        let registry = SchemaRegistry::new(&self.source);
        let index = LinkIndex::build(&graph.links);
        let nodes: HashMap<&NodeId, &GraphNode> =
            graph.nodes.iter().map(|node| (&node.id, node)).collect();
        let compiler = NodeCompiler::new(&index, &nodes, &self.options);

        let unregistered = ClassSchema::default();
        let mut warned = HashSet::new();
        let mut prompt = CompiledPrompt::new();
        let mut excluded = 0usize;

        for node in &graph.nodes {
            let dropped = is_excluded(&node.class_type);
            let schema = match registry.get_schema(&node.class_type).await? {
                Some(schema) => schema,
                None => {
                    if !dropped && warned.insert(node.class_type.as_str()) {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            class_type = %node.class_type,
                            "Node class not found in schema registry"
                        );
                    }
                    &unregistered
                }
            };

            let compiled = compiler.compile(node, schema)?;
            if dropped {
                excluded += 1;
                continue;
            }
            prompt.insert(node.id.clone(), compiled);
        }

        tracing::info!(
            target: TRACING_TARGET,
            compiled = prompt.len(),
            excluded,
            elapsed_ms = started_at.elapsed().as_millis(),
            "Workflow compiled"
        );

        Ok(prompt)
    }
}

/// Returns whether nodes of this class are left out of compiled prompts.
pub fn is_excluded(class_type: &str) -> bool {
    EXCLUDED_CLASSES.contains(&class_type)
}

#[cfg(feature = "reqwest")]
mod http {
    use promptc_schema::reqwest::{HttpSchemaSource, RegistryConfig};

    use super::GraphCompiler;
    use crate::{CompileOptions, Result};

    impl GraphCompiler<HttpSchemaSource> {
        /// Creates a compiler fetching schemas from `options.base_url`.
        pub fn from_options(options: CompileOptions, config: RegistryConfig) -> Result<Self> {
            options.validate()?;
            let source = HttpSchemaSource::new(&options.base_url, config)?;
            Ok(Self::new(source, options))
        }
    }
}
