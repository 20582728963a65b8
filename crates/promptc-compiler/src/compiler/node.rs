//! Input resolution for a single graph node.

use std::collections::HashMap;

use promptc_schema::{ClassSchema, TypeDecl};
use serde_json::Value;

use super::PRIMITIVE_CLASS;
use super::cursor::{self, ValueCursor};
use super::index::LinkIndex;
use crate::classify::{self, ScalarKind};
use crate::error::json_type_name;
use crate::prompt::{CompiledNode, NodeRef, ResolvedInput};
use crate::workflow::{GraphNode, InputSocket, NodeId};
use crate::{CompileOptions, Error, Result, TRACING_TARGET};

/// Resolves every input of one node to a value or a reference.
///
/// Explicit sockets are resolved first, in authoring order. Scalar inputs
/// left unset are then backfilled from the buffer, and required inputs still
/// unset fall back to their schema defaults.
pub(crate) struct NodeCompiler<'g> {
    index: &'g LinkIndex,
    nodes: &'g HashMap<&'g NodeId, &'g GraphNode>,
    options: &'g CompileOptions,
}

impl<'g> NodeCompiler<'g> {
    pub fn new(
        index: &'g LinkIndex,
        nodes: &'g HashMap<&'g NodeId, &'g GraphNode>,
        options: &'g CompileOptions,
    ) -> Self {
        Self {
            index,
            nodes,
            options,
        }
    }

    /// Compiles `node` against its class schema.
    pub fn compile(&self, node: &GraphNode, schema: &ClassSchema) -> Result<CompiledNode> {
        let mut cursor = ValueCursor::new(&node.values);
        let compiled = self.resolve(node, schema, &mut cursor)?;

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %node.id,
            class_type = %node.class_type,
            inputs = compiled.inputs.len(),
            consumed = cursor.consumed(),
            unread = cursor.remaining(),
            "Node compiled"
        );

        Ok(compiled)
    }

    fn resolve(
        &self,
        node: &GraphNode,
        schema: &ClassSchema,
        cursor: &mut ValueCursor<'_>,
    ) -> Result<CompiledNode> {
        let mut resolution = Resolution {
            node,
            schema,
            strict: self.options.strict_types,
            compiled: CompiledNode::new(node.class_type.clone()),
        };

        for (slot, socket) in node.input_slots() {
            if socket.is_link_bound() {
                self.resolve_link(&mut resolution, cursor, socket, slot)?;
            } else if let Some(binding) = socket.bound_value_name() {
                let expected = resolution.expected_kind(&socket.name);
                match cursor.take(binding, expected) {
                    Some(value) => resolution.accept(&socket.name, value)?,
                    None => resolution.fallback(&socket.name)?,
                }
            }
        }

        // Scalars the editor exposed no socket for still hold a buffer slot.
        for (name, decl) in schema.inputs_ordered() {
            if resolution.is_set(name) || !classify::is_scalar(decl.type_name()) {
                continue;
            }
            let expected = classify::classify(decl.type_name()).normalized();
            if let Some(value) = cursor.take(name, expected) {
                resolution.accept(name, value)?;
            }
        }

        for name in schema.required_names() {
            if resolution.is_set(name) || resolution.is_link_typed(name) {
                continue;
            }
            resolution.fallback(name)?;
        }

        Ok(resolution.compiled)
    }

    fn resolve_link(
        &self,
        resolution: &mut Resolution<'_>,
        cursor: &mut ValueCursor<'_>,
        socket: &InputSocket,
        slot: u32,
    ) -> Result<()> {
        let node = resolution.node;
        let source = self
            .index
            .resolve(&node.id, slot)
            .and_then(|(src, src_slot)| Some((*self.nodes.get(src)?, src_slot)));
        let Some((source, src_slot)) = source else {
            return Err(Error::LinkDangling {
                node_id: node.id.clone(),
                class_type: node.class_type.clone(),
                input: socket.name.clone(),
                slot,
                link: socket.link,
            });
        };

        // The editor reserves a buffer slot for every declared scalar, linked
        // or not, so one value is read and dropped to stay aligned.
        if resolution.is_scalar(&socket.name) {
            cursor.pop_matching(resolution.expected_kind(&socket.name));
        }

        if source.class_type != PRIMITIVE_CLASS {
            resolution.set(&socket.name, NodeRef(source.id.clone(), src_slot));
            return Ok(());
        }

        match source.values.first() {
            Some(value) => {
                let value = inline_primitive(value, resolution.expected_kind(&socket.name));
                tracing::debug!(
                    target: TRACING_TARGET,
                    node_id = %node.id,
                    primitive_id = %source.id,
                    input = %socket.name,
                    "Inlining primitive value"
                );
                resolution.set(&socket.name, value);
                Ok(())
            }
            None => resolution.fallback(&socket.name),
        }
    }
}

/// Converts a primitive node's value for a numeric target, else returns it
/// unchanged.
fn inline_primitive(value: &Value, expected: Option<ScalarKind>) -> Value {
    match expected {
        Some(kind) if kind.is_numeric() => {
            cursor::coerce(value, Some(kind)).unwrap_or_else(|| value.clone())
        }
        _ => value.clone(),
    }
}

/// Inputs of one node resolved so far.
struct Resolution<'a> {
    node: &'a GraphNode,
    schema: &'a ClassSchema,
    strict: bool,
    compiled: CompiledNode,
}

impl Resolution<'_> {
    fn declared_type(&self, name: &str) -> Option<&str> {
        self.schema.declared_type(name)
    }

    /// Cursor expectation for `name`; `None` matches any value.
    fn expected_kind(&self, name: &str) -> Option<ScalarKind> {
        self.declared_type(name)
            .and_then(|type_name| classify::classify(type_name).normalized())
    }

    fn is_scalar(&self, name: &str) -> bool {
        self.declared_type(name).is_some_and(classify::is_scalar)
    }

    fn is_link_typed(&self, name: &str) -> bool {
        self.declared_type(name)
            .is_some_and(|type_name| classify::classify(type_name).is_link())
    }

    fn is_set(&self, name: &str) -> bool {
        self.compiled.inputs.contains_key(name)
    }

    fn set(&mut self, name: &str, input: impl Into<ResolvedInput>) {
        self.compiled.inputs.insert(name.to_owned(), input.into());
    }

    /// Validates a resolved value under strict mode, then records it.
    fn accept(&mut self, name: &str, value: Value) -> Result<()> {
        if self.strict
            && let Some(kind) = self.expected_kind(name)
            && !cursor::matches(&value, Some(kind))
        {
            return Err(Error::TypeMismatch {
                node_id: self.node.id.clone(),
                class_type: self.node.class_type.clone(),
                input: name.to_owned(),
                expected: kind.to_string(),
                actual: json_type_name(&value),
                value,
            });
        }

        self.set(name, value);
        Ok(())
    }

    /// Applies the schema default of an unresolved input.
    ///
    /// Without a default, a required input is an error under strict mode and
    /// is otherwise left unset.
    fn fallback(&mut self, name: &str) -> Result<()> {
        if let Some(default) = self.schema.decl(name).and_then(TypeDecl::default_value) {
            let default = default.clone();
            self.set(name, default);
            return Ok(());
        }

        if self.strict && self.schema.is_required(name) {
            return Err(Error::MissingRequiredInput {
                node_id: self.node.id.clone(),
                class_type: self.node.class_type.clone(),
                input: name.to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::workflow::{Link, ValueBuffer};

    struct Fixture {
        nodes: Vec<GraphNode>,
        links: Vec<Link>,
        options: CompileOptions,
    }

    impl Fixture {
        fn new(nodes: Vec<GraphNode>, links: Vec<Link>) -> Self {
            Self {
                nodes,
                links,
                options: CompileOptions::default(),
            }
        }

        fn lenient(mut self) -> Self {
            self.options.strict_types = false;
            self
        }

        /// Compiles the node at `position`, returning how many buffer values
        /// were read.
        fn compile(&self, position: usize, schema: &ClassSchema) -> Result<(CompiledNode, usize)> {
            let index = LinkIndex::build(&self.links);
            let nodes: HashMap<_, _> = self.nodes.iter().map(|node| (&node.id, node)).collect();
            let compiler = NodeCompiler::new(&index, &nodes, &self.options);

            let node = &self.nodes[position];
            let mut cursor = ValueCursor::new(&node.values);
            let compiled = compiler.resolve(node, schema, &mut cursor)?;
            Ok((compiled, cursor.consumed()))
        }
    }

    fn keyed(values: Value) -> ValueBuffer {
        serde_json::from_value(values).unwrap()
    }

    fn value(compiled: &CompiledNode, name: &str) -> Option<Value> {
        compiled
            .input(name)
            .and_then(ResolvedInput::as_value)
            .cloned()
    }

    fn sampler_schema() -> ClassSchema {
        ClassSchema::new()
            .with_required("model", TypeDecl::new("MODEL"))
            .with_required("seed", TypeDecl::new("INT").with_default(0))
            .with_required("steps", TypeDecl::new("INT").with_default(20))
            .with_required("sampler_name", TypeDecl::combo(["euler", "dpmpp_2m"]).with_default("euler"))
            .with_optional("denoise", TypeDecl::new("FLOAT").with_default(1.0))
    }

    #[test]
    fn test_link_emits_reference() {
        let fixture = Fixture::new(
            vec![
                GraphNode::new("3", "CheckpointLoaderSimple").with_output("MODEL"),
                GraphNode::new("4", "KSampler")
                    .with_input(InputSocket::linked("model", 1))
                    .with_values(vec![json!(5), json!(30), json!("euler")]),
            ],
            vec![Link::new("3", 0, "4", 0).with_id(1)],
        );

        let (compiled, _) = fixture.compile(1, &sampler_schema()).unwrap();
        assert_eq!(
            compiled.input("model").and_then(ResolvedInput::as_reference),
            Some(&NodeRef::new("3", 0))
        );
        assert_eq!(value(&compiled, "seed"), Some(json!(5)));
        assert_eq!(value(&compiled, "steps"), Some(json!(30)));
        assert_eq!(value(&compiled, "sampler_name"), Some(json!("euler")));
        assert!(compiled.input("denoise").is_none());
    }

    #[test]
    fn test_linked_scalar_consumes_buffer_slot() {
        // Assumes the editor keeps a buffer slot for a scalar input even
        // after it is converted to a link; the 5 below is that stale slot.
        let fixture = Fixture::new(
            vec![
                GraphNode::new("2", "Seed"),
                GraphNode::new("4", "KSampler")
                    .with_input(InputSocket::linked("seed", 1).with_slot_index(1))
                    .with_values(vec![json!(5), json!(30), json!("euler")]),
            ],
            vec![Link::new("2", 0, "4", 1)],
        );

        let schema = sampler_schema();
        let (compiled, consumed) = fixture.compile(1, &schema).unwrap();
        assert_eq!(
            compiled.input("seed").and_then(ResolvedInput::as_reference),
            Some(&NodeRef::new("2", 0))
        );
        assert_eq!(value(&compiled, "steps"), Some(json!(30)));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_dangling_link() {
        let fixture = Fixture::new(
            vec![GraphNode::new("4", "KSampler").with_input(InputSocket::linked("model", 8))],
            vec![Link::new("3", 0, "4", 5)],
        );

        let error = fixture.compile(0, &sampler_schema()).unwrap_err();
        assert!(matches!(
            &error,
            Error::LinkDangling { slot: 0, input, .. } if input == "model"
        ));
        assert_eq!(error.node_id().map(NodeId::as_str), Some("4"));
    }

    #[test]
    fn test_link_to_missing_source_is_dangling() {
        let fixture = Fixture::new(
            vec![GraphNode::new("4", "KSampler").with_input(InputSocket::linked("model", 1))],
            vec![Link::new("99", 0, "4", 0)],
        );

        let error = fixture.compile(0, &sampler_schema()).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::LinkDangling);
    }

    #[test]
    fn test_primitive_inlined_with_coercion() {
        let fixture = Fixture::new(
            vec![
                GraphNode::new("5", PRIMITIVE_CLASS).with_values(vec![json!("7"), json!("fixed")]),
                GraphNode::new("6", "KSampler")
                    .with_input(InputSocket::linked("seed", 1))
                    .with_values(vec![json!(0), json!(25)]),
            ],
            vec![Link::new("5", 0, "6", 0)],
        );

        let (compiled, _) = fixture.compile(1, &sampler_schema()).unwrap();
        assert_eq!(value(&compiled, "seed"), Some(json!(7)));
        assert_eq!(value(&compiled, "steps"), Some(json!(25)));
    }

    #[test]
    fn test_empty_primitive_falls_back_to_default() {
        let fixture = Fixture::new(
            vec![
                GraphNode::new("5", PRIMITIVE_CLASS),
                GraphNode::new("6", "KSampler").with_input(InputSocket::linked("steps", 1)),
            ],
            vec![Link::new("5", 0, "6", 0)],
        );

        let (compiled, _) = fixture.compile(1, &sampler_schema()).unwrap();
        assert_eq!(value(&compiled, "steps"), Some(json!(20)));
    }

    #[test]
    fn test_value_bound_reads_keyed_by_binding() {
        let fixture = Fixture::new(
            vec![
                GraphNode::new("7", "KSampler")
                    .with_input(InputSocket::new("steps").with_binding("num_steps"))
                    .with_values(keyed(json!({"num_steps": 12, "seed": 3, "sampler_name": "dpmpp_2m"}))),
            ],
            vec![],
        );

        let (compiled, consumed) = fixture.compile(0, &sampler_schema()).unwrap();
        assert_eq!(value(&compiled, "steps"), Some(json!(12)));
        assert_eq!(value(&compiled, "seed"), Some(json!(3)));
        assert_eq!(value(&compiled, "sampler_name"), Some(json!("dpmpp_2m")));
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_missing_required_only_under_strict() {
        let schema = ClassSchema::new().with_required("ckpt_name", TypeDecl::new("STRING"));
        let nodes = vec![GraphNode::new("1", "CheckpointLoaderSimple")];

        let error = Fixture::new(nodes.clone(), vec![])
            .compile(0, &schema)
            .unwrap_err();
        assert!(matches!(
            error,
            Error::MissingRequiredInput { ref input, .. } if input == "ckpt_name"
        ));

        let (compiled, _) = Fixture::new(nodes, vec![])
            .lenient()
            .compile(0, &schema)
            .unwrap();
        assert!(compiled.inputs.is_empty());
    }

    #[test]
    fn test_unlinked_link_type_is_not_required() {
        let schema = ClassSchema::new().with_required("model", TypeDecl::new("MODEL"));
        let fixture = Fixture::new(vec![GraphNode::new("1", "KSampler")], vec![]);
        let (compiled, _) = fixture.compile(0, &schema).unwrap();
        assert!(compiled.input("model").is_none());
    }

    #[test]
    fn test_unknown_type_reads_as_string() {
        let schema = ClassSchema::new().with_required("preset", TypeDecl::new("PRESET_NAME"));
        let fixture = Fixture::new(
            vec![
                GraphNode::new("1", "CustomNode")
                    .with_input(InputSocket::bound("preset"))
                    .with_values(vec![json!(3)]),
            ],
            vec![],
        );

        let (compiled, _) = fixture.compile(0, &schema).unwrap();
        assert_eq!(value(&compiled, "preset"), Some(json!("3")));
    }

    #[test]
    fn test_keyed_mismatch() {
        let schema = ClassSchema::new().with_required("flag", TypeDecl::new("BOOLEAN"));
        let nodes = vec![
            GraphNode::new("1", "Switch")
                .with_input(InputSocket::bound("flag"))
                .with_values(keyed(json!({"flag": "maybe"}))),
        ];

        let error = Fixture::new(nodes.clone(), vec![])
            .compile(0, &schema)
            .unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::TypeMismatch);

        let (compiled, _) = Fixture::new(nodes, vec![])
            .lenient()
            .compile(0, &schema)
            .unwrap();
        assert_eq!(value(&compiled, "flag"), Some(json!("maybe")));
    }

    #[test]
    fn test_backfill_validates_keyed_values() {
        let schema = ClassSchema::new().with_optional("strength", TypeDecl::new("FLOAT"));
        let fixture = Fixture::new(
            vec![
                GraphNode::new("1", "Lora").with_values(keyed(json!({"strength": "strong"}))),
            ],
            vec![],
        );

        let error = fixture.compile(0, &schema).unwrap_err();
        assert!(matches!(error, Error::TypeMismatch { ref expected, .. } if expected == "FLOAT"));
    }

    #[test]
    fn test_unknown_class_uses_any() {
        let fixture = Fixture::new(
            vec![
                GraphNode::new("1", "NotRegistered")
                    .with_input(InputSocket::bound("anything"))
                    .with_values(vec![json!({"nested": true})]),
            ],
            vec![],
        );

        let (compiled, _) = fixture.compile(0, &ClassSchema::new()).unwrap();
        assert_eq!(value(&compiled, "anything"), Some(json!({"nested": true})));
    }
}
