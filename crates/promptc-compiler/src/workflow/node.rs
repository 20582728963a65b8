//! Graph nodes and their sockets.

use serde::{Deserialize, Serialize};

use super::{LinkId, NodeId, ValueBuffer};

/// Named value binding of an input socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetBinding {
    /// Name of the buffer value the socket reads.
    pub name: String,
}

/// Input socket of a graph node.
///
/// A socket is link-bound when `link` is set, value-bound when it carries a
/// [`WidgetBinding`], and otherwise not materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSocket {
    /// Input name, matching the class schema.
    pub name: String,
    /// Incoming link, if any.
    #[serde(default)]
    pub link: Option<LinkId>,
    /// Explicit slot index; defaults to the socket's position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<u32>,
    /// Value binding, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetBinding>,
}

impl InputSocket {
    /// Creates an unbound socket.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: None,
            slot_index: None,
            widget: None,
        }
    }

    /// Creates a socket fed by a link.
    pub fn linked(name: impl Into<String>, link: u64) -> Self {
        Self::new(name).with_link(link)
    }

    /// Creates a socket bound to the buffer value of the same name.
    pub fn bound(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone()).with_binding(name)
    }

    /// Sets the incoming link.
    #[must_use]
    pub fn with_link(mut self, link: u64) -> Self {
        self.link = Some(LinkId::new(link));
        self
    }

    /// Sets the explicit slot index.
    #[must_use]
    pub fn with_slot_index(mut self, slot_index: u32) -> Self {
        self.slot_index = Some(slot_index);
        self
    }

    /// Sets the value binding.
    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>) -> Self {
        self.widget = Some(WidgetBinding { name: name.into() });
        self
    }

    /// Returns the name of the bound buffer value.
    pub fn bound_value_name(&self) -> Option<&str> {
        self.widget.as_ref().map(|widget| widget.name.as_str())
    }

    /// Returns whether the socket is fed by a link.
    #[inline]
    pub fn is_link_bound(&self) -> bool {
        self.link.is_some()
    }

    /// Returns whether the socket reads from the value buffer.
    #[inline]
    pub fn is_value_bound(&self) -> bool {
        !self.is_link_bound() && self.widget.is_some()
    }
}

/// Output socket of a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSocket {
    /// Output name.
    pub name: String,
    /// Explicit slot index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<u32>,
}

/// One node of a workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node identifier.
    pub id: NodeId,
    /// Node class, looked up in the schema registry.
    #[serde(rename = "type", alias = "class_type")]
    pub class_type: String,
    /// Input sockets in authoring order.
    #[serde(default)]
    pub inputs: Vec<InputSocket>,
    /// Output sockets.
    #[serde(default)]
    pub outputs: Vec<OutputSocket>,
    /// Values stored by the editor.
    #[serde(default, rename = "widgets_values")]
    pub values: ValueBuffer,
}

impl GraphNode {
    /// Creates a node without sockets or values.
    pub fn new(id: impl Into<NodeId>, class_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class_type: class_type.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            values: ValueBuffer::default(),
        }
    }

    /// Appends an input socket.
    #[must_use]
    pub fn with_input(mut self, socket: InputSocket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Appends an output socket.
    #[must_use]
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(OutputSocket {
            name: name.into(),
            slot_index: None,
        });
        self
    }

    /// Replaces the value buffer.
    #[must_use]
    pub fn with_values(mut self, values: impl Into<ValueBuffer>) -> Self {
        self.values = values.into();
        self
    }

    /// Iterates input sockets with their destination slots.
    ///
    /// A socket's slot is its explicit `slot_index`, or else its position.
    pub fn input_slots(&self) -> impl Iterator<Item = (u32, &InputSocket)> {
        self.inputs
            .iter()
            .zip(0u32..)
            .map(|(socket, position)| (socket.slot_index.unwrap_or(position), socket))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_editor_node() {
        let node: GraphNode = serde_json::from_value(json!({
            "id": 4,
            "type": "KSampler",
            "pos": [100, 200],
            "inputs": [
                {"name": "model", "type": "MODEL", "link": 1},
                {"name": "seed", "type": "INT", "link": null, "widget": {"name": "seed"}},
                {"name": "latent_image", "type": "LATENT", "link": 2, "slot_index": 3}
            ],
            "outputs": [{"name": "LATENT", "type": "LATENT", "links": [4], "slot_index": 0}],
            "widgets_values": [42, "randomize", 20]
        }))
        .unwrap();

        assert_eq!(node.id.as_str(), "4");
        assert_eq!(node.class_type, "KSampler");
        assert!(node.inputs[0].is_link_bound());
        assert!(node.inputs[1].is_value_bound());
        assert_eq!(node.inputs[1].bound_value_name(), Some("seed"));
        let slots: Vec<_> = node.input_slots().map(|(slot, _)| slot).collect();
        assert_eq!(slots, [0, 1, 3]);
        assert_eq!(node.outputs[0].slot_index, Some(0));
        assert_eq!(node.values.len(), 3);
    }

    #[test]
    fn test_class_type_alias_and_defaults() {
        let node: GraphNode =
            serde_json::from_value(json!({"id": "9", "class_type": "Note"})).unwrap();
        assert_eq!(node.class_type, "Note");
        assert!(node.inputs.is_empty());
        assert!(node.values.is_empty());
    }

    #[test]
    fn test_socket_constructors() {
        let linked = InputSocket::linked("model", 1);
        assert!(linked.is_link_bound());
        assert!(!linked.is_value_bound());

        let linked_with_widget = InputSocket::bound("seed").with_link(3);
        assert!(!linked_with_widget.is_value_bound());

        let unbound = InputSocket::new("extra");
        assert!(!unbound.is_link_bound());
        assert!(!unbound.is_value_bound());
    }
}
