//! Compile error types.

use serde_json::Value;
use strum::{AsRefStr, Display, IntoStaticStr};
use thiserror::Error;

use crate::workflow::{LinkId, NodeId};

/// Result type for compile operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that abort a compile.
///
/// There is no partial output: the first error ends the whole compile.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema registry could not be fetched or decoded.
    #[error("failed to fetch schema registry: {0}")]
    RegistryFetch(#[from] promptc_schema::Error),

    /// A link-bound input has no link targeting it, or the link's source
    /// node is not in the graph.
    #[error("node {node_id} ({class_type}): input '{input}' on slot {slot} has a dangling link")]
    LinkDangling {
        /// Node owning the input.
        node_id: NodeId,
        /// Class of that node.
        class_type: String,
        /// Input socket name.
        input: String,
        /// Destination slot looked up in the link index.
        slot: u32,
        /// Link id recorded on the socket.
        link: Option<LinkId>,
    },

    /// A required scalar input resolved to nothing.
    #[error("node {node_id} ({class_type}): required input '{input}' has no value")]
    MissingRequiredInput {
        /// Node owning the input.
        node_id: NodeId,
        /// Class of that node.
        class_type: String,
        /// Input name.
        input: String,
    },

    /// A resolved value does not fit its declared scalar type.
    #[error(
        "node {node_id} ({class_type}): input '{input}' expected {expected}, got {actual} {value}"
    )]
    TypeMismatch {
        /// Node owning the input.
        node_id: NodeId,
        /// Class of that node.
        class_type: String,
        /// Input name.
        input: String,
        /// Declared (normalized) type.
        expected: String,
        /// JSON type of the offending value.
        actual: &'static str,
        /// The offending value.
        value: Value,
    },

    /// Compile options are invalid.
    #[error("invalid compile options: {0}")]
    InvalidOptions(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Categories of compile errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The registry was unavailable.
    RegistryFetch,
    /// A link did not resolve.
    LinkDangling,
    /// A required input had no value.
    MissingRequiredInput,
    /// A value failed structural validation.
    TypeMismatch,
    /// Options were rejected.
    InvalidOptions,
    /// Input or output JSON was malformed.
    Serialization,
}

impl Error {
    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RegistryFetch(_) => ErrorKind::RegistryFetch,
            Self::LinkDangling { .. } => ErrorKind::LinkDangling,
            Self::MissingRequiredInput { .. } => ErrorKind::MissingRequiredInput,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::InvalidOptions(_) => ErrorKind::InvalidOptions,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Returns the id of the node the error is about, if any.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::LinkDangling { node_id, .. }
            | Self::MissingRequiredInput { node_id, .. }
            | Self::TypeMismatch { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}

/// Returns the JSON type name of a value.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mismatch_display() {
        let error = Error::TypeMismatch {
            node_id: NodeId::from("7"),
            class_type: "SaveImage".into(),
            input: "flag".into(),
            expected: "BOOLEAN".into(),
            actual: json_type_name(&json!("maybe")),
            value: json!("maybe"),
        };
        let display = error.to_string();
        assert!(display.contains("node 7"));
        assert!(display.contains("expected BOOLEAN, got string \"maybe\""));
        assert_eq!(error.kind(), ErrorKind::TypeMismatch);
        assert_eq!(error.node_id().map(NodeId::as_str), Some("7"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::LinkDangling.as_ref(), "link_dangling");
        assert_eq!(
            ErrorKind::MissingRequiredInput.to_string(),
            "missing_required_input"
        );
    }

    #[test]
    fn test_registry_error_conversion() {
        let error: Error = promptc_schema::Error::malformed("bad").into();
        assert_eq!(error.kind(), ErrorKind::RegistryFetch);
        assert!(error.node_id().is_none());
    }
}
