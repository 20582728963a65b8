//! Per-class input declarations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::TypeDecl;

/// Declared inputs of one node class.
///
/// Entry order within `required` and `optional` follows the registry payload
/// and is significant: it is the order in which a node's positional value
/// buffer was authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSchema {
    /// Inputs that must resolve to a value or a reference.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub required: IndexMap<String, TypeDecl>,
    /// Inputs that may be left unset.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub optional: IndexMap<String, TypeDecl>,
    /// Inputs supplied by the execution host, never by the graph.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub hidden: IndexMap<String, TypeDecl>,
}

impl ClassSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required input.
    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>, decl: TypeDecl) -> Self {
        self.required.insert(name.into(), decl);
        self
    }

    /// Adds an optional input.
    #[must_use]
    pub fn with_optional(mut self, name: impl Into<String>, decl: TypeDecl) -> Self {
        self.optional.insert(name.into(), decl);
        self
    }

    /// Adds a hidden input.
    #[must_use]
    pub fn with_hidden(mut self, name: impl Into<String>, decl: TypeDecl) -> Self {
        self.hidden.insert(name.into(), decl);
        self
    }

    /// Iterates required then optional inputs in declaration order.
    pub fn inputs_ordered(&self) -> impl Iterator<Item = (&str, &TypeDecl)> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(|(name, decl)| (name.as_str(), decl))
    }

    /// Looks up a declaration: required, then optional, then hidden.
    pub fn decl(&self, name: &str) -> Option<&TypeDecl> {
        self.required
            .get(name)
            .or_else(|| self.optional.get(name))
            .or_else(|| self.hidden.get(name))
    }

    /// Returns the declared type name of an input.
    pub fn declared_type(&self, name: &str) -> Option<&str> {
        self.decl(name).map(TypeDecl::type_name)
    }

    /// Returns whether the input is declared required.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains_key(name)
    }

    /// Iterates the names of required inputs in declaration order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.required.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sampler() -> ClassSchema {
        serde_json::from_value(json!({
            "required": {
                "model": ["MODEL"],
                "seed": ["INT", {"default": 0}],
                "steps": ["INT", {"default": 20}],
                "sampler_name": [["euler", "ddim"]]
            },
            "optional": {
                "denoise": ["FLOAT", {"default": 1.0}]
            },
            "hidden": {
                "unique_id": "UNIQUE_ID"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_inputs_ordered_keeps_payload_order() {
        let schema = sampler();
        let names: Vec<_> = schema.inputs_ordered().map(|(name, _)| name).collect();
        assert_eq!(names, ["model", "seed", "steps", "sampler_name", "denoise"]);
    }

    #[test]
    fn test_decl_lookup_order() {
        let schema = sampler();
        assert_eq!(schema.declared_type("steps"), Some("INT"));
        assert_eq!(schema.declared_type("denoise"), Some("FLOAT"));
        assert_eq!(schema.declared_type("unique_id"), Some("UNIQUE_ID"));
        assert_eq!(schema.declared_type("missing"), None);
    }

    #[test]
    fn test_is_required() {
        let schema = sampler();
        assert!(schema.is_required("seed"));
        assert!(!schema.is_required("denoise"));
        assert!(!schema.is_required("unique_id"));
        assert_eq!(schema.required_names().count(), 4);
    }

    #[test]
    fn test_builder_helpers() {
        let schema = ClassSchema::new()
            .with_required("ckpt_name", TypeDecl::new("STRING"))
            .with_optional("strength", TypeDecl::new("FLOAT").with_default(1.0))
            .with_hidden("prompt", TypeDecl::new("PROMPT"));
        assert!(schema.is_required("ckpt_name"));
        assert_eq!(
            schema.decl("strength").and_then(TypeDecl::default_value),
            Some(&json!(1.0))
        );
        assert_eq!(schema.inputs_ordered().count(), 2);
    }
}
