//! Workflow graph model as saved by the editor.
//!
//! The model is read-only input to a compile call. Both link encodings are
//! normalized into [`Link`] on deserialization.

mod id;
mod link;
mod node;
mod value;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use self::id::{LinkId, NodeId};
pub use self::link::{CurrentLink, LegacyLink, Link, LinkRecord};
pub use self::node::{GraphNode, InputSocket, OutputSocket, WidgetBinding};
pub use self::value::ValueBuffer;
use crate::Result;

/// An editor-authored workflow graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    /// Save format version. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<f64>,
    /// Nodes in authoring order.
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// Links between node sockets.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl WorkflowGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a graph from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a graph from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Converts a graph from a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Appends a node.
    #[must_use]
    pub fn with_node(mut self, node: GraphNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Appends a link.
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Returns the last node with the given id.
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().rev().find(|node| &node.id == id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_graph() {
        let graph = WorkflowGraph::from_value(json!({
            "last_node_id": 4,
            "version": 0.4,
            "nodes": [
                {"id": 3, "type": "CheckpointLoaderSimple", "widgets_values": ["model.safetensors"]},
                {"id": 4, "type": "KSampler", "inputs": [{"name": "model", "link": 1}]}
            ],
            "links": [[1, 3, 0, 4, 0, "MODEL"]]
        }))
        .unwrap();

        assert_eq!(graph.version, Some(0.4));
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links, [Link::new("3", 0, "4", 0).with_id(1)]);
        assert_eq!(
            graph.node(&NodeId::from("3")).map(|node| node.class_type.as_str()),
            Some("CheckpointLoaderSimple")
        );
        assert!(graph.node(&NodeId::from("99")).is_none());
    }

    #[test]
    fn test_parse_empty() {
        let graph = WorkflowGraph::from_json("{}").unwrap();
        assert!(graph.nodes.is_empty());
        assert!(graph.links.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        let error = WorkflowGraph::from_json(r#"{"nodes": [{"id": 1}]}"#).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Serialization);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let graph = WorkflowGraph::new()
            .with_node(GraphNode::new("1", "A"))
            .with_node(GraphNode::new("1", "B"));
        assert_eq!(graph.node(&NodeId::from("1")).unwrap().class_type, "B");
    }
}
