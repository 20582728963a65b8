//! Links between node sockets.
//!
//! Two encodings of the same relation exist on the wire:
//!
//! - legacy: `[link_id, origin_id, origin_slot, target_id, target_slot, type]`
//! - current: `{ "id", "origin_id", "origin_slot", "target_id", "target_slot", "type" }`
//!
//! Both are normalized into [`Link`] during deserialization; nothing past
//! ingestion knows which encoding a graph used.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LinkId, NodeId};

/// A directed connection from an output slot to an input slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LinkRecord")]
pub struct Link {
    /// Link identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<LinkId>,
    /// Source node.
    #[serde(rename = "origin_id")]
    pub src: NodeId,
    /// Output slot on the source node.
    #[serde(rename = "origin_slot")]
    pub src_slot: u32,
    /// Destination node.
    #[serde(rename = "target_id")]
    pub dst: NodeId,
    /// Input slot on the destination node.
    #[serde(rename = "target_slot")]
    pub dst_slot: u32,
}

impl Link {
    /// Creates a link.
    pub fn new(
        src: impl Into<NodeId>,
        src_slot: u32,
        dst: impl Into<NodeId>,
        dst_slot: u32,
    ) -> Self {
        Self {
            id: None,
            src: src.into(),
            src_slot,
            dst: dst.into(),
            dst_slot,
        }
    }

    /// Sets the link identifier.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(LinkId::new(id));
        self
    }
}

/// A link as found on the wire, in either encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkRecord {
    /// Ordered tuple encoding.
    Legacy(LegacyLink),
    /// Keyed record encoding.
    Current(CurrentLink),
}

/// Tuple-encoded link. The trailing type tag is not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyLink {
    /// Link identifier.
    pub id: LinkId,
    /// Source node.
    pub origin_id: NodeId,
    /// Source slot.
    pub origin_slot: u32,
    /// Destination node.
    pub target_id: NodeId,
    /// Destination slot.
    pub target_slot: u32,
}

/// Record-encoded link.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentLink {
    /// Link identifier.
    #[serde(default)]
    pub id: Option<LinkId>,
    /// Source node.
    pub origin_id: NodeId,
    /// Source slot.
    pub origin_slot: u32,
    /// Destination node.
    pub target_id: NodeId,
    /// Destination slot.
    pub target_slot: u32,
}

impl From<LinkRecord> for Link {
    fn from(record: LinkRecord) -> Self {
        match record {
            LinkRecord::Legacy(link) => Self {
                id: Some(link.id),
                src: link.origin_id,
                src_slot: link.origin_slot,
                dst: link.target_id,
                dst_slot: link.target_slot,
            },
            LinkRecord::Current(link) => Self {
                id: link.id,
                src: link.origin_id,
                src_slot: link.origin_slot,
                dst: link.target_id,
                dst_slot: link.target_slot,
            },
        }
    }
}

impl LegacyLink {
    fn from_items(items: Vec<Value>) -> Result<Self, String> {
        if items.len() < 5 {
            return Err(format!(
                "legacy link needs at least 5 elements, found {}",
                items.len()
            ));
        }

        let mut items = items.into_iter();
        let mut next = |field: &str| {
            let item = items.next().unwrap_or(Value::Null);
            (field.to_owned(), item)
        };

        Ok(Self {
            id: parse_item(next("id"))?,
            origin_id: parse_item(next("origin_id"))?,
            origin_slot: parse_item(next("origin_slot"))?,
            target_id: parse_item(next("target_id"))?,
            target_slot: parse_item(next("target_slot"))?,
        })
    }
}

fn parse_item<T>((field, item): (String, Value)) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(item).map_err(|error| format!("invalid link {field}: {error}"))
}

impl<'de> Deserialize<'de> for LinkRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => LegacyLink::from_items(items)
                .map(Self::Legacy)
                .map_err(de::Error::custom),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(Self::Current)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "link must be an array or an object, found {other}"
            ))),
        }
    }
}
