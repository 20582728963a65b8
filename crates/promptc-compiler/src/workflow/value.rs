//! Per-node value buffers.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key read from a keyed buffer when a primitive node's value is inlined.
const PRIMITIVE_VALUE_KEY: &str = "value";

/// Free-form values stored on a node by the editor.
///
/// A sequence buffer is read front to back, one value per scalar input. A
/// keyed buffer is read by input name and never consumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValueBuffer {
    /// Ordered values, read positionally.
    Sequence(Vec<Value>),
    /// Named values, read by input name.
    Keyed(Map<String, Value>),
}

impl Default for ValueBuffer {
    fn default() -> Self {
        Self::Sequence(Vec::new())
    }
}

impl ValueBuffer {
    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(values) => values.len(),
            Self::Keyed(values) => values.len(),
        }
    }

    /// Returns whether the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the buffer is read positionally.
    #[inline]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns the value a primitive node exposes to its consumers.
    ///
    /// Sequence buffers expose their first element; keyed buffers expose the
    /// `value` entry, or their first entry when there is none.
    pub fn first(&self) -> Option<&Value> {
        match self {
            Self::Sequence(values) => values.first(),
            Self::Keyed(values) => values
                .get(PRIMITIVE_VALUE_KEY)
                .or_else(|| values.values().next()),
        }
    }
}

impl From<Vec<Value>> for ValueBuffer {
    fn from(values: Vec<Value>) -> Self {
        Self::Sequence(values)
    }
}

impl From<Map<String, Value>> for ValueBuffer {
    fn from(values: Map<String, Value>) -> Self {
        Self::Keyed(values)
    }
}

impl<'de> Deserialize<'de> for ValueBuffer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(values) => Ok(Self::Sequence(values)),
            Value::Object(values) => Ok(Self::Keyed(values)),
            Value::Null => Ok(Self::default()),
            other => Err(de::Error::custom(format!(
                "value buffer must be an array or an object, found {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_forms() {
        let sequence: ValueBuffer = serde_json::from_value(json!([20, "euler"])).unwrap();
        assert!(sequence.is_sequence());
        assert_eq!(sequence.len(), 2);

        let keyed: ValueBuffer = serde_json::from_value(json!({"steps": 20})).unwrap();
        assert!(!keyed.is_sequence());

        let empty: ValueBuffer = serde_json::from_value(json!(null)).unwrap();
        assert!(empty.is_empty());
        assert!(empty.is_sequence());

        assert!(serde_json::from_value::<ValueBuffer>(json!(5)).is_err());
    }

    #[test]
    fn test_first() {
        let sequence = ValueBuffer::from(vec![json!(7), json!("fixed")]);
        assert_eq!(sequence.first(), Some(&json!(7)));

        let keyed: ValueBuffer =
            serde_json::from_value(json!({"control": "fixed", "value": 7})).unwrap();
        assert_eq!(keyed.first(), Some(&json!(7)));

        let unnamed: ValueBuffer = serde_json::from_value(json!({"seed": 3})).unwrap();
        assert_eq!(unnamed.first(), Some(&json!(3)));

        assert_eq!(ValueBuffer::default().first(), None);
    }

    #[test]
    fn test_serialize_keeps_shape() {
        let keyed: ValueBuffer = serde_json::from_value(json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(
            serde_json::to_string(&keyed).unwrap(),
            r#"{"b":1,"a":2}"#
        );
    }
}
