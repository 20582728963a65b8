//! Node and link identifiers.

use derive_more::{Debug, Display, From, Into};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Identifier of a node in a workflow graph.
///
/// Editors write node ids as JSON numbers or strings; both are normalized to
/// their string form so `3` and `"3"` name the same node.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id from its string form.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawNodeId {
            Int(i64),
            Text(String),
        }

        Ok(match RawNodeId::deserialize(deserializer)? {
            RawNodeId::Int(id) => Self::from(id),
            RawNodeId::Text(id) => Self(id),
        })
    }
}

/// Identifier of a link in a workflow graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct LinkId(u64);

impl LinkId {
    /// Creates a link id.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_node_id_from_number_or_string() {
        let from_number: NodeId = serde_json::from_value(json!(3)).unwrap();
        let from_string: NodeId = serde_json::from_value(json!("3")).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "3");
        assert_eq!(serde_json::to_value(&from_number).unwrap(), json!("3"));
    }

    #[test]
    fn test_node_id_display() {
        let id = NodeId::new("12:4");
        assert_eq!(id.to_string(), "12:4");
        assert_eq!(format!("{id:?}"), "12:4");
    }

    #[test]
    fn test_link_id() {
        let id: LinkId = serde_json::from_value(json!(9)).unwrap();
        assert_eq!(id.get(), 9);
        assert_eq!(id, LinkId::new(9));
        assert_eq!(u64::from(id), 9);
    }
}
