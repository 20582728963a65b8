//! Declared input types.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type name used for inputs declared as an inline list of choices.
pub const COMBO_TYPE: &str = "COMBO";

/// A single input declaration: a type name plus optional metadata.
///
/// On the wire a declaration is one of:
/// - `["INT", { "default": 20, "min": 1 }]`
/// - `[["euler", "ddim"], { "default": "euler" }]` (inline choices)
/// - `"PROMPT"` (bare type name, typical for hidden inputs)
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    type_name: String,
    choices: Option<Vec<Value>>,
    metadata: Map<String, Value>,
}

impl TypeDecl {
    /// Creates a declaration with the given type name and no metadata.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            choices: None,
            metadata: Map::new(),
        }
    }

    /// Creates a combo declaration from a list of literal choices.
    pub fn combo(choices: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self {
            type_name: COMBO_TYPE.to_owned(),
            choices: Some(choices.into_iter().map(Into::into).collect()),
            metadata: Map::new(),
        }
    }

    /// Sets the schema-provided default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.metadata.insert("default".to_owned(), value.into());
        self
    }

    /// Adds an arbitrary metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the declared type name.
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the inline choices of a combo declaration.
    #[inline]
    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    /// Returns the declaration metadata.
    #[inline]
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Returns the schema-provided default, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.metadata.get("default")
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::String(type_name) => Ok(Self::new(type_name)),
            Value::Array(items) => {
                let mut items = items.into_iter();
                let mut decl = match items.next() {
                    Some(Value::String(type_name)) => Self::new(type_name),
                    Some(Value::Array(choices)) => Self::combo(choices),
                    Some(other) => {
                        return Err(format!("unsupported type name: {other}"));
                    }
                    None => return Err("empty type declaration".into()),
                };
                match items.next() {
                    Some(Value::Object(metadata)) => decl.metadata = metadata,
                    Some(Value::Null) | None => {}
                    Some(other) => {
                        return Err(format!("unsupported declaration metadata: {other}"));
                    }
                }
                Ok(decl)
            }
            other => Err(format!("unsupported type declaration: {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for TypeDecl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

impl Serialize for TypeDecl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.metadata.is_empty() { 1 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        match &self.choices {
            Some(choices) => seq.serialize_element(choices)?,
            None => seq.serialize_element(&self.type_name)?,
        }
        if !self.metadata.is_empty() {
            seq.serialize_element(&self.metadata)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decl_with_metadata() {
        let decl: TypeDecl =
            serde_json::from_value(json!(["INT", {"default": 20, "min": 1}])).unwrap();
        assert_eq!(decl.type_name(), "INT");
        assert_eq!(decl.default_value(), Some(&json!(20)));
        assert_eq!(decl.metadata().get("min"), Some(&json!(1)));
        assert!(decl.choices().is_none());
    }

    #[test]
    fn test_decl_inline_choices() {
        let decl: TypeDecl = serde_json::from_value(json!([["euler", "ddim"]])).unwrap();
        assert_eq!(decl.type_name(), COMBO_TYPE);
        assert_eq!(decl.choices(), Some(&[json!("euler"), json!("ddim")][..]));
        assert!(decl.default_value().is_none());
    }

    #[test]
    fn test_decl_bare_string() {
        let decl: TypeDecl = serde_json::from_value(json!("PROMPT")).unwrap();
        assert_eq!(decl.type_name(), "PROMPT");
        assert!(decl.metadata().is_empty());
    }

    #[test]
    fn test_decl_rejects_garbage() {
        assert!(serde_json::from_value::<TypeDecl>(json!(42)).is_err());
        assert!(serde_json::from_value::<TypeDecl>(json!([])).is_err());
        assert!(serde_json::from_value::<TypeDecl>(json!(["INT", 3])).is_err());
    }

    #[test]
    fn test_decl_serialization() {
        let decl = TypeDecl::new("FLOAT").with_default(1.0);
        assert_eq!(serde_json::to_value(&decl).unwrap(), json!(["FLOAT", {"default": 1.0}]));

        let combo = TypeDecl::combo(["a", "b"]);
        assert_eq!(serde_json::to_value(&combo).unwrap(), json!([["a", "b"]]));
    }
}
