//! Compiled prompt: the flat, execution-ready form of a workflow.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::workflow::NodeId;

/// Reference to an output slot of another node, serialized as `["3", 0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef(pub NodeId, pub u32);

impl NodeRef {
    /// Creates a reference.
    pub fn new(node: impl Into<NodeId>, slot: u32) -> Self {
        Self(node.into(), slot)
    }

    /// Returns the referenced node.
    #[inline]
    pub fn node(&self) -> &NodeId {
        &self.0
    }

    /// Returns the referenced output slot.
    #[inline]
    pub fn slot(&self) -> u32 {
        self.1
    }
}

/// Resolved value of one node input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedInput {
    /// Output of another node.
    Reference(NodeRef),
    /// Literal value.
    Value(Value),
}

impl ResolvedInput {
    /// Returns the reference, if this input is one.
    pub fn as_reference(&self) -> Option<&NodeRef> {
        match self {
            Self::Reference(reference) => Some(reference),
            Self::Value(_) => None,
        }
    }

    /// Returns the literal value, if this input is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Reference(_) => None,
        }
    }
}

impl From<NodeRef> for ResolvedInput {
    fn from(reference: NodeRef) -> Self {
        Self::Reference(reference)
    }
}

impl From<Value> for ResolvedInput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// One node of a compiled prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledNode {
    /// Node class.
    pub class_type: String,
    /// Resolved inputs in resolution order.
    pub inputs: IndexMap<String, ResolvedInput>,
}

impl CompiledNode {
    /// Creates a node without inputs.
    pub fn new(class_type: impl Into<String>) -> Self {
        Self {
            class_type: class_type.into(),
            inputs: IndexMap::new(),
        }
    }

    /// Returns one resolved input.
    pub fn input(&self, name: &str) -> Option<&ResolvedInput> {
        self.inputs.get(name)
    }
}

/// Compiled prompt keyed by node id, in graph order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledPrompt {
    nodes: IndexMap<NodeId, CompiledNode>,
}

impl CompiledPrompt {
    /// Creates an empty prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled node with the given id.
    pub fn get(&self, id: &str) -> Option<&CompiledNode> {
        self.nodes.get(&NodeId::from(id))
    }

    /// Returns whether a node with the given id was compiled.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of compiled nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether no node was compiled.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates compiled nodes in graph order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &CompiledNode)> {
        self.nodes.iter()
    }

    /// Inserts a node, keeping the position of an earlier node with the same id.
    pub fn insert(&mut self, id: NodeId, node: CompiledNode) -> Option<CompiledNode> {
        self.nodes.insert(id, node)
    }

    /// Serializes the prompt to a JSON value.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<'a> IntoIterator for &'a CompiledPrompt {
    type IntoIter = indexmap::map::Iter<'a, NodeId, CompiledNode>;
    type Item = (&'a NodeId, &'a CompiledNode);

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> CompiledPrompt {
        let mut sampler = CompiledNode::new("KSampler");
        sampler
            .inputs
            .insert("model".into(), NodeRef::new("3", 0).into());
        sampler.inputs.insert("steps".into(), json!(20).into());

        let mut prompt = CompiledPrompt::new();
        prompt.insert(NodeId::from("4"), sampler);
        prompt
    }

    #[test]
    fn test_output_shape() {
        assert_eq!(
            sample().to_json().unwrap(),
            json!({"4": {"class_type": "KSampler", "inputs": {"model": ["3", 0], "steps": 20}}})
        );
    }

    #[test]
    fn test_accessors() {
        let prompt = sample();
        assert_eq!(prompt.len(), 1);
        assert!(prompt.contains("4"));
        let node = prompt.get("4").unwrap();
        assert_eq!(
            node.input("model").and_then(ResolvedInput::as_reference),
            Some(&NodeRef::new("3", 0))
        );
        assert_eq!(
            node.input("steps").and_then(ResolvedInput::as_value),
            Some(&json!(20))
        );
    }

    #[test]
    fn test_deserialize_reference_before_value() {
        let input: ResolvedInput = serde_json::from_value(json!(["3", 1])).unwrap();
        assert_eq!(input, ResolvedInput::Reference(NodeRef::new("3", 1)));

        let input: ResolvedInput = serde_json::from_value(json!("euler")).unwrap();
        assert_eq!(input, ResolvedInput::Value(json!("euler")));
    }
}
